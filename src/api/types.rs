use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::{Book, BookFilter, Loan, LoanFilter, Page, PageRequest};

// ============================================================================
// Requests
// ============================================================================

/// 書籍の登録・更新リクエスト（POST /api/books, PUT /api/books/:id）
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct BookRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "must not be empty"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "must not be empty"))]
    pub author: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "must not be empty"))]
    pub isbn: String,
}

impl BookRequest {
    pub fn to_book(&self) -> Book {
        Book::new(self.title.clone(), self.author.clone(), self.isbn.clone())
    }
}

/// 貸出リクエスト（POST /api/loans）
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoanRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "must not be empty"))]
    pub isbn: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "must not be empty"))]
    pub customer: String,
    #[validate(email(message = "must be a valid email"))]
    pub email: Option<String>,
}

/// 返却リクエスト（PATCH /api/loans/:id）
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ReturnedLoanRequest {
    pub returned: bool,
}

// ============================================================================
// Query parameters
// ============================================================================

/// ページ指定のクエリパラメータ
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 0始まりのページ番号（既定 0）
    pub page: Option<u32>,
    /// 1ページの件数（既定 20、最大 1000）
    pub size: Option<u32>,
}

impl PageQuery {
    pub fn to_request(&self) -> PageRequest {
        let default = PageRequest::default();
        PageRequest::new(
            self.page.unwrap_or(default.page()),
            self.size.unwrap_or(default.size()),
        )
    }
}

/// 書籍検索のクエリパラメータ
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookFilterQuery {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
}

impl From<BookFilterQuery> for BookFilter {
    fn from(query: BookFilterQuery) -> Self {
        Self {
            title: query.title,
            author: query.author,
            isbn: query.isbn,
        }
    }
}

/// 貸出検索のクエリパラメータ
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LoanFilterQuery {
    pub isbn: Option<String>,
    pub customer: Option<String>,
}

impl From<LoanFilterQuery> for LoanFilter {
    fn from(query: LoanFilterQuery) -> Self {
        Self {
            isbn: query.isbn,
            customer: query.customer,
        }
    }
}

// ============================================================================
// Responses
// ============================================================================

/// 書籍レスポンス
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct BookResponse {
    pub id: Option<i64>,
    pub title: String,
    pub author: String,
    pub isbn: String,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id.map(|id| id.value()),
            title: book.title,
            author: book.author,
            isbn: book.isbn,
        }
    }
}

/// 貸出レスポンス
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoanResponse {
    pub id: Option<i64>,
    pub isbn: String,
    pub customer: String,
    pub email: Option<String>,
    pub loan_date: NaiveDate,
    pub returned: bool,
    pub book: BookResponse,
}

impl From<Loan> for LoanResponse {
    fn from(loan: Loan) -> Self {
        Self {
            id: loan.id.map(|id| id.value()),
            isbn: loan.book.isbn.clone(),
            customer: loan.customer,
            email: loan.customer_email,
            loan_date: loan.loan_date,
            returned: loan.returned,
            book: BookResponse::from(loan.book),
        }
    }
}

/// ページ情報
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageableResponse {
    pub page_number: u32,
    pub page_size: u32,
}

/// ページ単位のレスポンス
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u64,
    pub pageable: PageableResponse,
}

impl<T> PageResponse<T> {
    pub fn from_page<U>(page: Page<U>) -> Self
    where
        T: From<U>,
    {
        let total_pages = page.total_pages();
        let pageable = PageableResponse {
            page_number: page.request.page(),
            page_size: page.request.size(),
        };

        Self {
            content: page.content.into_iter().map(T::from).collect(),
            total_elements: page.total_elements,
            total_pages,
            pageable,
        }
    }
}

/// エラーレスポンス
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct ErrorResponse {
    pub errors: Vec<String>,
}

impl ErrorResponse {
    pub fn new(errors: Vec<String>) -> Self {
        Self { errors }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BookId, LoanId};

    #[test]
    fn test_empty_book_request_reports_every_field() {
        let errors = BookRequest::default().validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 3);
    }

    #[test]
    fn test_loan_request_rejects_invalid_email() {
        let request = LoanRequest {
            isbn: "123".to_string(),
            customer: "Fulano".to_string(),
            email: Some("not-an-email".to_string()),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_loan_request_email_is_optional() {
        let request = LoanRequest {
            isbn: "123".to_string(),
            customer: "Fulano".to_string(),
            email: None,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_page_query_defaults() {
        let request = PageQuery::default().to_request();
        assert_eq!(request, PageRequest::default());
    }

    #[test]
    fn test_page_response_serializes_camel_case() {
        let book = Book::new("terminal", "Vim", "321").with_id(BookId::new(1));
        let page = Page::new(vec![book], PageRequest::new(0, 100), 1);
        let json = serde_json::to_value(PageResponse::<BookResponse>::from_page(page)).unwrap();

        assert_eq!(json["totalElements"], 1);
        assert_eq!(json["totalPages"], 1);
        assert_eq!(json["pageable"]["pageSize"], 100);
        assert_eq!(json["pageable"]["pageNumber"], 0);
        assert_eq!(json["content"][0]["isbn"], "321");
    }

    #[test]
    fn test_loan_response_carries_book_isbn() {
        let book = Book::new("terminal", "Vim", "321").with_id(BookId::new(1));
        let mut loan = Loan::new(
            book,
            "Fulano",
            Some("f@x.com".to_string()),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        );
        loan.id = Some(LoanId::new(9));

        let response = LoanResponse::from(loan);
        assert_eq!(response.id, Some(9));
        assert_eq!(response.isbn, "321");
        assert_eq!(response.email.as_deref(), Some("f@x.com"));
        assert_eq!(response.book.id, Some(1));
    }
}
