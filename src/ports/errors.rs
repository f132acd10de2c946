use thiserror::Error;

/// ストア（リポジトリ）のエラー
///
/// 一意制約違反はビジネスルール違反に変換できるよう他の障害と区別する。
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// 一意制約違反（ISBN重複、未返却の貸出の重複）
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// 更新・削除対象が存在しない
    #[error("Record not found")]
    NotFound,

    /// バックエンドの障害
    #[error("Repository backend error")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
