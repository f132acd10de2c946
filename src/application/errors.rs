use crate::ports::RepositoryError;
use thiserror::Error;

/// アプリケーション層のエラー
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 同じISBNの書籍が登録済み
    #[error("ISBN already registered")]
    IsbnAlreadyRegistered,

    /// 書籍に未返却の貸出がある
    #[error("Book already loaned")]
    BookAlreadyLoaned,

    /// IDを持たないエンティティを更新・削除しようとした（呼び出し側の誤り）
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// ストアのエラー
    #[error("Repository error")]
    RepositoryError(#[source] RepositoryError),

    /// メール送信のエラー
    #[error("Mailer error")]
    MailerError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApplicationError {
    /// 利用者に提示すべきビジネスルール違反か
    pub fn is_business_rule_violation(&self) -> bool {
        matches!(
            self,
            ApplicationError::IsbnAlreadyRegistered | ApplicationError::BookAlreadyLoaned
        )
    }
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, ApplicationError>;
