use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{Book, LoanId};

/// 貸出から何日経過したら延滞とみなすか
///
/// `loan_date <= today - LATE_LOAN_THRESHOLD_DAYS` の貸出が延滞となる。
pub const LATE_LOAN_THRESHOLD_DAYS: i64 = 3;

/// 貸出
///
/// 不変条件：1冊の書籍に対して未返却の貸出は同時に1件まで。
/// 作成後に変更されるのは `returned` のみ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub id: Option<LoanId>,
    pub book: Book,
    pub customer: String,
    pub customer_email: Option<String>,
    pub loan_date: NaiveDate,
    pub returned: bool,
}

impl Loan {
    /// 本日付の新しい貸出を作成する
    pub fn new(
        book: Book,
        customer: impl Into<String>,
        customer_email: Option<String>,
        loan_date: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            book,
            customer: customer.into(),
            customer_email,
            loan_date,
            returned: false,
        }
    }

    /// 未返却か
    pub fn is_outstanding(&self) -> bool {
        !self.returned
    }

    /// 基準日 `cutoff` 以前に貸し出されたまま未返却か
    ///
    /// `cutoff` は [`late_loan_cutoff`] で求める。
    pub fn is_late_at(&self, cutoff: NaiveDate) -> bool {
        self.is_outstanding() && self.loan_date <= cutoff
    }
}

/// 延滞判定の基準日（この日以前の貸出が延滞）
pub fn late_loan_cutoff(today: NaiveDate) -> NaiveDate {
    today - Duration::days(LATE_LOAN_THRESHOLD_DAYS)
}

/// 貸出の検索条件
///
/// 書籍のISBNが一致する、または利用者名が一致する貸出を対象とする。
/// 指定されていない項目は何にも一致しない。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoanFilter {
    pub isbn: Option<String>,
    pub customer: Option<String>,
}

impl LoanFilter {
    pub fn matches(&self, loan: &Loan) -> bool {
        self.isbn.as_deref() == Some(loan.book.isbn.as_str())
            || self.customer.as_deref() == Some(loan.customer.as_str())
    }
}
