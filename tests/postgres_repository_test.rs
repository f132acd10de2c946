//! PostgreSQLアダプターのテスト
//!
//! 実データベースが必要なため既定では実行しない。
//! `DATABASE_URL` を設定して `cargo test -- --ignored` で実行する。

mod common;

use chrono::{Duration, Utc};
use rusty_library_loans::adapters::postgres::{PostgresBookRepository, PostgresLoanRepository};
use rusty_library_loans::domain::{Book, BookFilter, Loan, LoanFilter, PageRequest};
use rusty_library_loans::ports::{BookRepository, LoanRepository, RepositoryError};
use serial_test::serial;
use sqlx::PgPool;

/// テストの独立性を保つため、各テスト前にすべてのデータを削除します。
async fn cleanup_database(pool: &PgPool) {
    sqlx::query("TRUNCATE TABLE loans, books RESTART IDENTITY CASCADE")
        .execute(pool)
        .await
        .expect("Failed to truncate tables");
}

async fn setup() -> (PgPool, PostgresBookRepository, PostgresLoanRepository) {
    let pool = common::create_test_pool().await;
    cleanup_database(&pool).await;
    (
        pool.clone(),
        PostgresBookRepository::new(pool.clone()),
        PostgresLoanRepository::new(pool),
    )
}

#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
async fn test_book_insert_and_find() {
    let (_pool, books, _loans) = setup().await;

    let saved = books
        .insert(Book::new("terminal", "Vim", "321"))
        .await
        .expect("Failed to insert book");

    let by_id = books.find_by_id(saved.id.unwrap()).await.unwrap();
    let by_isbn = books.find_by_isbn("321").await.unwrap();

    assert_eq!(by_id, Some(saved.clone()));
    assert_eq!(by_isbn, Some(saved));
    assert!(books.exists_by_isbn("321").await.unwrap());
    assert!(!books.exists_by_isbn("999").await.unwrap());
}

#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
async fn test_book_isbn_is_unique() {
    let (_pool, books, _loans) = setup().await;
    books.insert(Book::new("a", "b", "123")).await.unwrap();

    let result = books.insert(Book::new("c", "d", "123")).await;

    assert!(matches!(result, Err(RepositoryError::UniqueViolation(_))));
}

#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
async fn test_book_update_and_delete() {
    let (_pool, books, _loans) = setup().await;
    let saved = books.insert(Book::new("a", "b", "123")).await.unwrap();
    let id = saved.id.unwrap();

    let updated = books
        .update(id, Book::new("novo", "autor", "321"))
        .await
        .unwrap();
    assert_eq!(updated.id, Some(id));
    assert_eq!(updated.isbn, "321");

    books.delete(id).await.unwrap();
    assert!(books.find_by_id(id).await.unwrap().is_none());

    let missing = books.update(id, Book::new("x", "y", "z")).await;
    assert!(matches!(missing, Err(RepositoryError::NotFound)));
}

#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
async fn test_book_find_by_example() {
    let (_pool, books, _loans) = setup().await;
    books
        .insert(Book::new("Rust in Action", "McNamara", "1"))
        .await
        .unwrap();
    books
        .insert(Book::new("Programming Rust", "Blandy", "2"))
        .await
        .unwrap();
    books
        .insert(Book::new("100% Rust", "Someone", "3"))
        .await
        .unwrap();

    let filter = BookFilter {
        title: Some("rust".to_string()),
        ..Default::default()
    };
    let page = books
        .find_by_example(filter, PageRequest::new(0, 2))
        .await
        .unwrap();
    assert_eq!(page.total_elements, 3);
    assert_eq!(page.content.len(), 2);

    let literal_percent = BookFilter {
        title: Some("100%".to_string()),
        ..Default::default()
    };
    let page = books
        .find_by_example(literal_percent, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.total_elements, 1);
}

#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
async fn test_outstanding_loan_is_unique_per_book() {
    let (_pool, books, loans) = setup().await;
    let book = books.insert(Book::new("a", "b", "123")).await.unwrap();
    let today = Utc::now().date_naive();

    let first = loans
        .insert(Loan::new(book.clone(), "Fulano", None, today))
        .await
        .unwrap();
    assert!(loans.exists_outstanding_for_book(book.id.unwrap()).await.unwrap());

    let second = loans
        .insert(Loan::new(book.clone(), "Beltrano", None, today))
        .await;
    assert!(matches!(second, Err(RepositoryError::UniqueViolation(_))));

    let mut returned = first.clone();
    returned.returned = true;
    loans.update(first.id.unwrap(), returned).await.unwrap();
    assert!(!loans.exists_outstanding_for_book(book.id.unwrap()).await.unwrap());

    let third = loans
        .insert(Loan::new(book, "Beltrano", None, today))
        .await;
    assert!(third.is_ok());
}

#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
async fn test_loan_find_by_isbn_or_customer_and_book() {
    let (_pool, books, loans) = setup().await;
    let book = books.insert(Book::new("a", "b", "123")).await.unwrap();
    let other = books.insert(Book::new("c", "d", "456")).await.unwrap();
    let today = Utc::now().date_naive();

    let saved = loans
        .insert(Loan::new(book.clone(), "Fulano", Some("f@x.com".into()), today))
        .await
        .unwrap();
    loans
        .insert(Loan::new(other, "Ciclano", None, today))
        .await
        .unwrap();

    let filter = LoanFilter {
        isbn: Some("123".to_string()),
        customer: Some("Fulano".to_string()),
    };
    let page = loans
        .find_by_isbn_or_customer(filter, PageRequest::new(0, 10))
        .await
        .unwrap();
    assert_eq!(page.total_elements, 1);
    assert_eq!(page.content, vec![saved.clone()]);

    let by_book = loans
        .find_by_book(book.id.unwrap(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(by_book.content, vec![saved.clone()]);

    let by_id = loans.find_by_id(saved.id.unwrap()).await.unwrap();
    assert_eq!(by_id, Some(saved));
}

#[tokio::test]
#[serial]
#[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
async fn test_find_outstanding_loaned_on_or_before() {
    let (_pool, books, loans) = setup().await;
    let today = Utc::now().date_naive();
    let cutoff = today - Duration::days(3);

    let late_book = books.insert(Book::new("a", "b", "1")).await.unwrap();
    let fresh_book = books.insert(Book::new("c", "d", "2")).await.unwrap();
    let returned_book = books.insert(Book::new("e", "f", "3")).await.unwrap();

    let late = loans
        .insert(Loan::new(late_book, "A", None, today - Duration::days(5)))
        .await
        .unwrap();
    loans
        .insert(Loan::new(fresh_book, "B", None, today))
        .await
        .unwrap();
    let mut returned = Loan::new(returned_book, "C", None, today - Duration::days(5));
    returned.returned = true;
    loans.insert(returned).await.unwrap();

    let result = loans.find_outstanding_loaned_on_or_before(cutoff).await.unwrap();

    assert_eq!(result, vec![late]);
}
