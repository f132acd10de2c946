use crate::domain::{Book, BookFilter, BookId, Page, PageRequest};
use async_trait::async_trait;

use super::errors::Result;

/// 書籍ストアポート
///
/// ISBNの一意性はストア側でも保証する（`RepositoryError::UniqueViolation`）。
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// 書籍を登録し、採番されたIDを持つ書籍を返す
    async fn insert(&self, book: Book) -> Result<Book>;

    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>>;

    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>>;

    async fn exists_by_isbn(&self, isbn: &str) -> Result<bool>;

    /// 書籍全体を上書きする
    ///
    /// 対象が存在しない場合は `RepositoryError::NotFound`。
    async fn update(&self, id: BookId, book: Book) -> Result<Book>;

    async fn delete(&self, id: BookId) -> Result<()>;

    /// 例示検索（空でない項目のみで絞り込む）
    async fn find_by_example(&self, filter: BookFilter, page: PageRequest) -> Result<Page<Book>>;
}
