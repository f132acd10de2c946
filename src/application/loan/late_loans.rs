use chrono::{NaiveDate, Utc};

use crate::application::{ApplicationError, Result, ServiceDependencies};
use crate::domain::{self, Loan};

/// 延滞中の貸出をすべて取得する
///
/// 本日（UTC）から `LATE_LOAN_THRESHOLD_DAYS` 日以上前に貸し出され、
/// 未返却の貸出を返す。
pub async fn get_all_late_loans(deps: &ServiceDependencies) -> Result<Vec<Loan>> {
    get_late_loans_as_of(deps, Utc::now().date_naive()).await
}

/// `today` を基準に延滞中の貸出を取得する
///
/// ちょうど3日前の貸出も延滞に含まれる。
pub async fn get_late_loans_as_of(
    deps: &ServiceDependencies,
    today: NaiveDate,
) -> Result<Vec<Loan>> {
    let cutoff = domain::late_loan_cutoff(today);

    let loans = deps
        .loan_repository
        .find_outstanding_loaned_on_or_before(cutoff)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    tracing::debug!(%cutoff, count = loans.len(), "late loans fetched");

    Ok(loans)
}
