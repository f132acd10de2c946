use crate::application::{ApplicationError, Result, ServiceDependencies};
use crate::domain::{Book, BookFilter, BookId, Page, PageRequest};
use crate::ports::RepositoryError;

/// ISBNの一意制約違反をビジネスルール違反に読み替える
fn map_book_write_error(err: RepositoryError) -> ApplicationError {
    match err {
        RepositoryError::UniqueViolation(_) => ApplicationError::IsbnAlreadyRegistered,
        other => ApplicationError::RepositoryError(other),
    }
}

/// 書籍を登録する
///
/// ビジネスルール：
/// - 同じISBNの書籍が登録されていないこと
///
/// 事前確認と登録の間に別のリクエストが割り込んだ場合も、
/// ストアの一意制約違反を同じエラーとして返す。
pub async fn save_book(deps: &ServiceDependencies, book: Book) -> Result<Book> {
    let exists = deps
        .book_repository
        .exists_by_isbn(&book.isbn)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    if exists {
        return Err(ApplicationError::IsbnAlreadyRegistered);
    }

    let saved = deps
        .book_repository
        .insert(book)
        .await
        .map_err(map_book_write_error)?;

    tracing::info!(isbn = %saved.isbn, id = ?saved.id, "book registered");

    Ok(saved)
}

/// IDで書籍を取得する（存在しなければ `None`）
pub async fn get_book_by_id(deps: &ServiceDependencies, id: BookId) -> Result<Option<Book>> {
    deps.book_repository
        .find_by_id(id)
        .await
        .map_err(ApplicationError::RepositoryError)
}

/// ISBNで書籍を取得する（存在しなければ `None`）
pub async fn get_book_by_isbn(deps: &ServiceDependencies, isbn: &str) -> Result<Option<Book>> {
    deps.book_repository
        .find_by_isbn(isbn)
        .await
        .map_err(ApplicationError::RepositoryError)
}

/// 書籍を更新する
///
/// IDを持たない書籍はストアに渡さず `InvalidArgument` とする。
pub async fn update_book(deps: &ServiceDependencies, book: Book) -> Result<Book> {
    let id = book
        .id
        .ok_or(ApplicationError::InvalidArgument("book id must be set to update"))?;

    deps.book_repository
        .update(id, book)
        .await
        .map_err(map_book_write_error)
}

/// 書籍を削除する
///
/// IDを持たない書籍はストアに渡さず `InvalidArgument` とする。
pub async fn delete_book(deps: &ServiceDependencies, book: &Book) -> Result<()> {
    let id = book
        .id
        .ok_or(ApplicationError::InvalidArgument("book id must be set to delete"))?;

    deps.book_repository
        .delete(id)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    tracing::info!(%id, "book deleted");

    Ok(())
}

/// 例示検索
pub async fn find_books(
    deps: &ServiceDependencies,
    filter: BookFilter,
    page: PageRequest,
) -> Result<Page<Book>> {
    deps.book_repository
        .find_by_example(filter.normalized(), page)
        .await
        .map_err(ApplicationError::RepositoryError)
}
