use axum::Json;
use utoipa::OpenApi;

use super::handlers;
use super::types::{
    BookRequest, BookResponse, ErrorResponse, LoanRequest, LoanResponse, PageableResponse,
    ReturnedLoanRequest,
};

/// 書籍・貸出APIのOpenAPI定義
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Rusty Library Loans API",
        version = "0.1.0",
        description = "書籍の登録と貸出・返却を扱うAPI"
    ),
    paths(
        handlers::create_book,
        handlers::find_books,
        handlers::get_book,
        handlers::update_book,
        handlers::delete_book,
        handlers::loans_by_book,
        handlers::create_loan,
        handlers::find_loans,
        handlers::return_book,
    ),
    components(schemas(
        BookRequest,
        BookResponse,
        LoanRequest,
        LoanResponse,
        ReturnedLoanRequest,
        PageableResponse,
        ErrorResponse,
    )),
    tags(
        (name = "books", description = "書籍の登録・検索"),
        (name = "loans", description = "貸出と返却"),
    )
)]
pub struct ApiDoc;

/// GET /api-docs/openapi.json - OpenAPI定義
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
