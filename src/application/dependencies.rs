use crate::ports::{BookRepository, LoanRepository, Mailer};
use std::sync::Arc;

/// サービスの依存関係
///
/// 起動時に一度だけ組み立て、参照で各サービス関数に渡す。
/// 振る舞いは持たない。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub book_repository: Arc<dyn BookRepository>,
    pub loan_repository: Arc<dyn LoanRepository>,
    pub mailer: Arc<dyn Mailer>,
}
