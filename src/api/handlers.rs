use crate::application::{ServiceDependencies, book, loan};
use crate::domain::{BookId, Loan, LoanId};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use chrono::Utc;
use std::sync::Arc;

use super::{
    error::{ApiError, BOOK_NOT_FOUND_FOR_ISBN},
    extract::{ApiPath, ApiQuery, ValidatedJson},
    types::{
        BookFilterQuery, BookRequest, BookResponse, ErrorResponse, LoanFilterQuery, LoanRequest,
        LoanResponse, PageQuery, PageResponse, ReturnedLoanRequest,
    },
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

// ============================================================================
// Book handlers
// ============================================================================

/// POST /api/books - 書籍を登録
///
/// 強制されるビジネスルール:
/// - ISBNが登録済みでないこと
#[utoipa::path(
    post,
    path = "/api/books",
    tag = "books",
    request_body = BookRequest,
    responses(
        (status = 201, description = "登録された書籍", body = BookResponse),
        (status = 400, description = "検証エラーまたはISBN重複", body = ErrorResponse),
    )
)]
pub async fn create_book(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<BookRequest>,
) -> Result<(StatusCode, Json<BookResponse>), ApiError> {
    tracing::info!(isbn = %req.isbn, "creating a book");

    let saved = book::save_book(&state.service_deps, req.to_book()).await?;

    Ok((StatusCode::CREATED, Json(BookResponse::from(saved))))
}

/// GET /api/books/:id - 書籍をIDで取得
#[utoipa::path(
    get,
    path = "/api/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "書籍ID")),
    responses(
        (status = 200, description = "書籍", body = BookResponse),
        (status = 404, description = "書籍が存在しない"),
    )
)]
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<BookResponse>, ApiError> {
    tracing::debug!(id, "getting book");

    book::get_book_by_id(&state.service_deps, BookId::new(id))
        .await?
        .map(|found| Json(BookResponse::from(found)))
        .ok_or(ApiError::NotFound)
}

/// PUT /api/books/:id - 書籍を更新
///
/// タイトル・著者・ISBNを置き換える。IDは変更されない。
#[utoipa::path(
    put,
    path = "/api/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "書籍ID")),
    request_body = BookRequest,
    responses(
        (status = 200, description = "更新後の書籍", body = BookResponse),
        (status = 400, description = "検証エラーまたはISBN重複", body = ErrorResponse),
        (status = 404, description = "書籍が存在しない"),
    )
)]
pub async fn update_book(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(req): ValidatedJson<BookRequest>,
) -> Result<Json<BookResponse>, ApiError> {
    let mut current = book::get_book_by_id(&state.service_deps, BookId::new(id))
        .await?
        .ok_or(ApiError::NotFound)?;

    current.title = req.title;
    current.author = req.author;
    current.isbn = req.isbn;

    let updated = book::update_book(&state.service_deps, current).await?;

    Ok(Json(BookResponse::from(updated)))
}

/// DELETE /api/books/:id - 書籍を削除
#[utoipa::path(
    delete,
    path = "/api/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "書籍ID")),
    responses(
        (status = 204, description = "削除済み"),
        (status = 404, description = "書籍が存在しない"),
    )
)]
pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    tracing::info!(id, "deleting book");

    let current = book::get_book_by_id(&state.service_deps, BookId::new(id))
        .await?
        .ok_or(ApiError::NotFound)?;

    book::delete_book(&state.service_deps, &current).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/books - 書籍の例示検索
///
/// クエリパラメータ:
/// - title, author, isbn: 部分一致（大文字小文字を区別しない）
/// - page, size: ページ指定
#[utoipa::path(
    get,
    path = "/api/books",
    tag = "books",
    params(BookFilterQuery, PageQuery),
    responses(
        (status = 200, description = "書籍のページ", body = PageResponse<BookResponse>),
        (status = 400, description = "不正なクエリ", body = ErrorResponse),
    )
)]
pub async fn find_books(
    State(state): State<Arc<AppState>>,
    ApiQuery(filter): ApiQuery<BookFilterQuery>,
    ApiQuery(page): ApiQuery<PageQuery>,
) -> Result<Json<PageResponse<BookResponse>>, ApiError> {
    let result = book::find_books(&state.service_deps, filter.into(), page.to_request()).await?;

    Ok(Json(PageResponse::from_page(result)))
}

/// GET /api/books/:id/loans - 書籍の貸出履歴
#[utoipa::path(
    get,
    path = "/api/books/{id}/loans",
    tag = "books",
    params(("id" = i64, Path, description = "書籍ID"), PageQuery),
    responses(
        (status = 200, description = "貸出のページ", body = PageResponse<LoanResponse>),
        (status = 404, description = "書籍が存在しない"),
    )
)]
pub async fn loans_by_book(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    ApiQuery(page): ApiQuery<PageQuery>,
) -> Result<Json<PageResponse<LoanResponse>>, ApiError> {
    let found = book::get_book_by_id(&state.service_deps, BookId::new(id))
        .await?
        .ok_or(ApiError::NotFound)?;

    let result = loan::get_loans_by_book(&state.service_deps, &found, page.to_request()).await?;

    Ok(Json(PageResponse::from_page(result)))
}

// ============================================================================
// Loan handlers
// ============================================================================

/// POST /api/loans - 貸出を作成
///
/// ISBNで書籍を特定し、本日付の貸出を作成する。作成された貸出IDを返す。
///
/// 強制されるビジネスルール:
/// - ISBNに該当する書籍が存在すること
/// - 書籍に未返却の貸出がないこと
#[utoipa::path(
    post,
    path = "/api/loans",
    tag = "loans",
    request_body = LoanRequest,
    responses(
        (status = 201, description = "作成された貸出のID", body = i64),
        (status = 400, description = "検証エラー、書籍なし、または貸出中", body = ErrorResponse),
    )
)]
pub async fn create_loan(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<LoanRequest>,
) -> Result<(StatusCode, Json<Option<LoanId>>), ApiError> {
    let found = book::get_book_by_isbn(&state.service_deps, &req.isbn)
        .await?
        .ok_or_else(|| ApiError::BadRequest(BOOK_NOT_FOUND_FOR_ISBN.to_string()))?;

    let new_loan = Loan::new(found, req.customer, req.email, Utc::now().date_naive());
    let saved = loan::save_loan(&state.service_deps, new_loan).await?;

    Ok((StatusCode::CREATED, Json(saved.id)))
}

/// PATCH /api/loans/:id - 返却状態を更新
#[utoipa::path(
    patch,
    path = "/api/loans/{id}",
    tag = "loans",
    params(("id" = i64, Path, description = "貸出ID")),
    request_body = ReturnedLoanRequest,
    responses(
        (status = 200, description = "更新済み"),
        (status = 400, description = "書籍が別の貸出で貸出中", body = ErrorResponse),
        (status = 404, description = "貸出が存在しない"),
    )
)]
pub async fn return_book(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(req): ValidatedJson<ReturnedLoanRequest>,
) -> Result<StatusCode, ApiError> {
    let mut current = loan::get_loan_by_id(&state.service_deps, LoanId::new(id))
        .await?
        .ok_or(ApiError::NotFound)?;

    current.returned = req.returned;
    loan::update_loan(&state.service_deps, current).await?;

    Ok(StatusCode::OK)
}

/// GET /api/loans - ISBNまたは利用者名で貸出を検索
#[utoipa::path(
    get,
    path = "/api/loans",
    tag = "loans",
    params(LoanFilterQuery, PageQuery),
    responses(
        (status = 200, description = "貸出のページ", body = PageResponse<LoanResponse>),
        (status = 400, description = "不正なクエリ", body = ErrorResponse),
    )
)]
pub async fn find_loans(
    State(state): State<Arc<AppState>>,
    ApiQuery(filter): ApiQuery<LoanFilterQuery>,
    ApiQuery(page): ApiQuery<PageQuery>,
) -> Result<Json<PageResponse<LoanResponse>>, ApiError> {
    let result = loan::find_loans(&state.service_deps, filter.into(), page.to_request()).await?;

    Ok(Json(PageResponse::from_page(result)))
}
