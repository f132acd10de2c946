use crate::application::ApplicationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use validator::ValidationErrors;

use super::types::ErrorResponse;

/// 貸出時にISBNに該当する書籍がない場合のメッセージ
pub const BOOK_NOT_FOUND_FOR_ISBN: &str = "Book not found for passed isbn";

/// API層のエラー型
///
/// アプリケーション層のエラーとリクエスト起因のエラーをHTTPレスポンスへマッピングする。
/// 利用者に返すエラーはすべて `{"errors": [...]}` の形にそろえる。
#[derive(Debug)]
pub enum ApiError {
    /// 入力値の検証エラー（項目ごとに1メッセージ）
    Validation(Vec<String>),
    /// リクエスト起因のエラー
    BadRequest(String),
    /// 対象が存在しない（本文なし）
    NotFound,
    /// アプリケーション層のエラー
    Application(ApplicationError),
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        ApiError::Application(err)
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, field_errors)| {
                field_errors.iter().map(move |error| {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| error.code.to_string());
                    format!("{}: {}", field, message)
                })
            })
            .collect();
        messages.sort();

        ApiError::Validation(messages)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, errors) = match self {
            ApiError::Validation(messages) => (StatusCode::BAD_REQUEST, messages),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, vec![message]),
            ApiError::NotFound => return StatusCode::NOT_FOUND.into_response(),

            // 400 Bad Request - ビジネスルール違反
            ApiError::Application(err) if err.is_business_rule_violation() => {
                (StatusCode::BAD_REQUEST, vec![err.to_string()])
            }

            // 500 Internal Server Error - 呼び出し側の誤り・システム障害
            // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
            ApiError::Application(err) => {
                tracing::error!(error = ?err, "unhandled application error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    vec!["An unexpected error occurred".to_string()],
                )
            }
        };

        (status, Json(ErrorResponse::new(errors))).into_response()
    }
}
