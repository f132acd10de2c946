use crate::domain::{Book, BookFilter, BookId, Page, PageRequest};
use crate::ports::book_repository::BookRepository as BookRepositoryTrait;
use crate::ports::errors::{RepositoryError, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

use super::{contains_pattern, to_i64};

/// PostgreSQLの行データをBookに変換する
fn map_row_to_book(row: &PgRow) -> Book {
    Book {
        id: Some(BookId::new(row.get("id"))),
        title: row.get("title"),
        author: row.get("author"),
        isbn: row.get("isbn"),
    }
}

/// BookRepositoryのPostgreSQL実装
///
/// ISBNの一意性は `books_isbn_unique` 制約で保証する。
pub struct BookRepository {
    pool: PgPool,
}

impl BookRepository {
    /// PostgreSQLコネクションプールから新しいBookRepositoryを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepositoryTrait for BookRepository {
    async fn insert(&self, book: Book) -> Result<Book> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO books (title, author, isbn)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .fetch_one(&self.pool)
        .await?;

        Ok(book.with_id(BookId::new(id)))
    }

    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, author, isbn
            FROM books
            WHERE id = $1
            "#,
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_row_to_book))
    }

    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, author, isbn
            FROM books
            WHERE isbn = $1
            "#,
        )
        .bind(isbn)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_row_to_book))
    }

    async fn exists_by_isbn(&self, isbn: &str) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM books WHERE isbn = $1)")
                .bind(isbn)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn update(&self, id: BookId, book: Book) -> Result<Book> {
        let row = sqlx::query(
            r#"
            UPDATE books
            SET title = $2, author = $3, isbn = $4
            WHERE id = $1
            RETURNING id, title, author, isbn
            "#,
        )
        .bind(id.value())
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref()
            .map(map_row_to_book)
            .ok_or(RepositoryError::NotFound)
    }

    async fn delete(&self, id: BookId) -> Result<()> {
        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// 例示検索
    ///
    /// NULLの条件は無視し、それ以外はILIKEによる部分一致で絞り込む。
    async fn find_by_example(&self, filter: BookFilter, page: PageRequest) -> Result<Page<Book>> {
        let title = filter.title.as_deref().map(contains_pattern);
        let author = filter.author.as_deref().map(contains_pattern);
        let isbn = filter.isbn.as_deref().map(contains_pattern);

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM books
            WHERE ($1::text IS NULL OR title ILIKE $1)
              AND ($2::text IS NULL OR author ILIKE $2)
              AND ($3::text IS NULL OR isbn ILIKE $3)
            "#,
        )
        .bind(&title)
        .bind(&author)
        .bind(&isbn)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query(
            r#"
            SELECT id, title, author, isbn
            FROM books
            WHERE ($1::text IS NULL OR title ILIKE $1)
              AND ($2::text IS NULL OR author ILIKE $2)
              AND ($3::text IS NULL OR isbn ILIKE $3)
            ORDER BY id
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(&title)
        .bind(&author)
        .bind(&isbn)
        .bind(i64::from(page.size()))
        .bind(to_i64(page.offset()))
        .fetch_all(&self.pool)
        .await?;

        let content = rows.iter().map(map_row_to_book).collect();

        Ok(Page::new(content, page, total.max(0) as u64))
    }
}
