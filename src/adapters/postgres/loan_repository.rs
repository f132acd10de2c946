use crate::domain::{Book, BookId, Loan, LoanFilter, LoanId, Page, PageRequest};
use crate::ports::errors::{RepositoryError, Result};
use crate::ports::loan_repository::LoanRepository as LoanRepositoryTrait;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Row, postgres::PgRow};

use super::to_i64;

/// 貸出と書籍を結合して取得するSELECT句
const SELECT_LOAN_WITH_BOOK: &str = r#"
    SELECT
        l.id,
        l.customer,
        l.customer_email,
        l.loan_date,
        l.returned,
        b.id AS book_id,
        b.title,
        b.author,
        b.isbn
    FROM loans l
    JOIN books b ON b.id = l.book_id
"#;

/// PostgreSQLの行データをLoanに変換する
fn map_row_to_loan(row: &PgRow) -> Loan {
    Loan {
        id: Some(LoanId::new(row.get("id"))),
        book: Book {
            id: Some(BookId::new(row.get("book_id"))),
            title: row.get("title"),
            author: row.get("author"),
            isbn: row.get("isbn"),
        },
        customer: row.get("customer"),
        customer_email: row.get("customer_email"),
        loan_date: row.get("loan_date"),
        returned: row.get("returned"),
    }
}

fn book_id_of(loan: &Loan) -> Result<BookId> {
    loan.book
        .id
        .ok_or_else(|| RepositoryError::Backend("loan references an unsaved book".into()))
}

/// LoanRepositoryのPostgreSQL実装
///
/// 未返却の貸出の一意性は部分一意インデックス
/// `loans_one_outstanding_per_book` で保証する。
pub struct LoanRepository {
    pool: PgPool,
}

impl LoanRepository {
    /// PostgreSQLコネクションプールから新しいLoanRepositoryを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LoanRepositoryTrait for LoanRepository {
    async fn insert(&self, loan: Loan) -> Result<Loan> {
        let book_id = book_id_of(&loan)?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO loans (book_id, customer, customer_email, loan_date, returned)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(book_id.value())
        .bind(&loan.customer)
        .bind(&loan.customer_email)
        .bind(loan.loan_date)
        .bind(loan.returned)
        .fetch_one(&self.pool)
        .await?;

        Ok(Loan {
            id: Some(LoanId::new(id)),
            ..loan
        })
    }

    async fn find_by_id(&self, id: LoanId) -> Result<Option<Loan>> {
        let row = sqlx::query(&format!("{SELECT_LOAN_WITH_BOOK} WHERE l.id = $1"))
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(map_row_to_loan))
    }

    async fn update(&self, id: LoanId, loan: Loan) -> Result<Loan> {
        let book_id = book_id_of(&loan)?;

        let result = sqlx::query(
            r#"
            UPDATE loans
            SET book_id = $2,
                customer = $3,
                customer_email = $4,
                loan_date = $5,
                returned = $6
            WHERE id = $1
            "#,
        )
        .bind(id.value())
        .bind(book_id.value())
        .bind(&loan.customer)
        .bind(&loan.customer_email)
        .bind(loan.loan_date)
        .bind(loan.returned)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(Loan {
            id: Some(id),
            ..loan
        })
    }

    async fn exists_outstanding_for_book(&self, book_id: BookId) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM loans WHERE book_id = $1 AND NOT returned)",
        )
        .bind(book_id.value())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn find_by_isbn_or_customer(
        &self,
        filter: LoanFilter,
        page: PageRequest,
    ) -> Result<Page<Loan>> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM loans l
            JOIN books b ON b.id = l.book_id
            WHERE b.isbn = $1 OR l.customer = $2
            "#,
        )
        .bind(&filter.isbn)
        .bind(&filter.customer)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query(&format!(
            "{SELECT_LOAN_WITH_BOOK} WHERE b.isbn = $1 OR l.customer = $2 \
             ORDER BY l.id LIMIT $3 OFFSET $4"
        ))
        .bind(&filter.isbn)
        .bind(&filter.customer)
        .bind(i64::from(page.size()))
        .bind(to_i64(page.offset()))
        .fetch_all(&self.pool)
        .await?;

        let content = rows.iter().map(map_row_to_loan).collect();

        Ok(Page::new(content, page, total.max(0) as u64))
    }

    async fn find_by_book(&self, book_id: BookId, page: PageRequest) -> Result<Page<Loan>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE book_id = $1")
            .bind(book_id.value())
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query(&format!(
            "{SELECT_LOAN_WITH_BOOK} WHERE l.book_id = $1 ORDER BY l.id LIMIT $2 OFFSET $3"
        ))
        .bind(book_id.value())
        .bind(i64::from(page.size()))
        .bind(to_i64(page.offset()))
        .fetch_all(&self.pool)
        .await?;

        let content = rows.iter().map(map_row_to_loan).collect();

        Ok(Page::new(content, page, total.max(0) as u64))
    }

    /// 延滞候補を検索（日次の督促バッチ用）
    async fn find_outstanding_loaned_on_or_before(&self, cutoff: NaiveDate) -> Result<Vec<Loan>> {
        let rows = sqlx::query(&format!(
            "{SELECT_LOAN_WITH_BOOK} WHERE l.loan_date <= $1 AND NOT l.returned \
             ORDER BY l.loan_date, l.id"
        ))
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_row_to_loan).collect())
    }
}
