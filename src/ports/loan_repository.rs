use crate::domain::{BookId, Loan, LoanFilter, LoanId, Page, PageRequest};
use async_trait::async_trait;
use chrono::NaiveDate;

use super::errors::Result;

/// 貸出ストアポート
///
/// 1冊につき未返却の貸出は1件まで。ストアはこれを一意制約として保証し、
/// 違反時は `RepositoryError::UniqueViolation` を返す。
#[async_trait]
pub trait LoanRepository: Send + Sync {
    /// 貸出を登録し、採番されたIDを持つ貸出を返す
    async fn insert(&self, loan: Loan) -> Result<Loan>;

    async fn find_by_id(&self, id: LoanId) -> Result<Option<Loan>>;

    /// 貸出を上書きする（返却フラグの更新に使用される）
    async fn update(&self, id: LoanId, loan: Loan) -> Result<Loan>;

    /// 書籍に未返却の貸出があるか
    async fn exists_outstanding_for_book(&self, book_id: BookId) -> Result<bool>;

    /// ISBNまたは利用者名で検索する
    async fn find_by_isbn_or_customer(
        &self,
        filter: LoanFilter,
        page: PageRequest,
    ) -> Result<Page<Loan>>;

    /// 書籍の貸出履歴（返却済みを含む）
    async fn find_by_book(&self, book_id: BookId, page: PageRequest) -> Result<Page<Loan>>;

    /// `cutoff` 以前に貸し出された未返却の貸出
    async fn find_outstanding_loaned_on_or_before(&self, cutoff: NaiveDate) -> Result<Vec<Loan>>;
}
