pub mod book_repository;
pub mod loan_repository;

use crate::ports::RepositoryError;

// パブリックに型を再エクスポート
pub use book_repository::BookRepository as PostgresBookRepository;
pub use loan_repository::LoanRepository as PostgresLoanRepository;

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                RepositoryError::UniqueViolation(db.message().to_string())
            }
            other => RepositoryError::Backend(Box::new(other)),
        }
    }
}

/// ILIKE用の部分一致パターンを作る（`%` と `_` はエスケープする）
pub(crate) fn contains_pattern(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// u64の件数をPostgreSQLのBIGINTへ変換する
pub(crate) fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
