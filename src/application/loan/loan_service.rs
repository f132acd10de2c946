use crate::application::{ApplicationError, Result, ServiceDependencies};
use crate::domain::{Book, Loan, LoanFilter, LoanId, Page, PageRequest};
use crate::ports::RepositoryError;

/// 未返却の貸出の一意制約違反をビジネスルール違反に読み替える
fn map_loan_write_error(err: RepositoryError) -> ApplicationError {
    match err {
        RepositoryError::UniqueViolation(_) => ApplicationError::BookAlreadyLoaned,
        other => ApplicationError::RepositoryError(other),
    }
}

/// 書籍を貸し出す
///
/// ビジネスルール：
/// - 書籍に未返却の貸出がないこと
///
/// 未返却の貸出の有無はストアを唯一の情報源とする。
/// 事前確認と登録の間の競合はストアの一意制約で検出し、同じエラーを返す。
pub async fn save_loan(deps: &ServiceDependencies, loan: Loan) -> Result<Loan> {
    let book_id = loan
        .book
        .id
        .ok_or(ApplicationError::InvalidArgument("loaned book id must be set"))?;

    let already_loaned = deps
        .loan_repository
        .exists_outstanding_for_book(book_id)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    if already_loaned {
        return Err(ApplicationError::BookAlreadyLoaned);
    }

    let saved = deps
        .loan_repository
        .insert(loan)
        .await
        .map_err(map_loan_write_error)?;

    tracing::info!(
        id = ?saved.id,
        isbn = %saved.book.isbn,
        customer = %saved.customer,
        "book loaned"
    );

    Ok(saved)
}

/// IDで貸出を取得する（存在しなければ `None`）
pub async fn get_loan_by_id(deps: &ServiceDependencies, id: LoanId) -> Result<Option<Loan>> {
    deps.loan_repository
        .find_by_id(id)
        .await
        .map_err(ApplicationError::RepositoryError)
}

/// 貸出を更新する（返却の記録に使用される）
pub async fn update_loan(deps: &ServiceDependencies, loan: Loan) -> Result<Loan> {
    let id = loan
        .id
        .ok_or(ApplicationError::InvalidArgument("loan id must be set to update"))?;

    let updated = deps
        .loan_repository
        .update(id, loan)
        .await
        .map_err(map_loan_write_error)?;

    tracing::info!(%id, returned = updated.returned, "loan updated");

    Ok(updated)
}

/// ISBNまたは利用者名で貸出を検索する
pub async fn find_loans(
    deps: &ServiceDependencies,
    filter: LoanFilter,
    page: PageRequest,
) -> Result<Page<Loan>> {
    deps.loan_repository
        .find_by_isbn_or_customer(filter, page)
        .await
        .map_err(ApplicationError::RepositoryError)
}

/// 書籍の貸出履歴を取得する
pub async fn get_loans_by_book(
    deps: &ServiceDependencies,
    book: &Book,
    page: PageRequest,
) -> Result<Page<Loan>> {
    let book_id = book
        .id
        .ok_or(ApplicationError::InvalidArgument("book id must be set to list loans"))?;

    deps.loan_repository
        .find_by_book(book_id, page)
        .await
        .map_err(ApplicationError::RepositoryError)
}
