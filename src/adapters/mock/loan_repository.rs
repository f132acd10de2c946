use crate::domain::{BookId, Loan, LoanFilter, LoanId, Page, PageRequest};
use crate::ports::errors::{RepositoryError, Result};
use crate::ports::loan_repository::LoanRepository as LoanRepositoryTrait;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct State {
    next_id: i64,
    loans: BTreeMap<LoanId, Loan>,
    updated: Vec<Loan>,
}

/// LoanRepositoryのインメモリ実装
///
/// 1冊につき未返却の貸出1件の制約をロック内で確認する。
pub struct LoanRepository {
    state: Mutex<State>,
}

impl LoanRepository {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|e| RepositoryError::Backend(e.to_string().into()))
    }

    /// `update` に渡された貸出（呼び出し順）
    pub fn updated_loans(&self) -> Vec<Loan> {
        self.lock().map(|s| s.updated.clone()).unwrap_or_default()
    }

    /// 登録済みの全貸出
    pub fn all_loans(&self) -> Vec<Loan> {
        self.lock()
            .map(|s| s.loans.values().cloned().collect())
            .unwrap_or_default()
    }
}

impl Default for LoanRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn book_id_of(loan: &Loan) -> Result<BookId> {
    loan.book
        .id
        .ok_or_else(|| RepositoryError::Backend("loan references an unsaved book".into()))
}

fn has_outstanding(
    loans: &BTreeMap<LoanId, Loan>,
    book_id: BookId,
    except: Option<LoanId>,
) -> bool {
    loans.iter().any(|(id, loan)| {
        Some(*id) != except && loan.book.id == Some(book_id) && loan.is_outstanding()
    })
}

#[async_trait]
impl LoanRepositoryTrait for LoanRepository {
    async fn insert(&self, loan: Loan) -> Result<Loan> {
        let book_id = book_id_of(&loan)?;
        let mut state = self.lock()?;

        if loan.is_outstanding() && has_outstanding(&state.loans, book_id, None) {
            return Err(RepositoryError::UniqueViolation(format!(
                "outstanding loan for book {book_id}"
            )));
        }

        state.next_id += 1;
        let id = LoanId::new(state.next_id);
        let stored = Loan {
            id: Some(id),
            ..loan
        };
        state.loans.insert(id, stored.clone());

        Ok(stored)
    }

    async fn find_by_id(&self, id: LoanId) -> Result<Option<Loan>> {
        Ok(self.lock()?.loans.get(&id).cloned())
    }

    async fn update(&self, id: LoanId, loan: Loan) -> Result<Loan> {
        let book_id = book_id_of(&loan)?;
        let mut state = self.lock()?;
        state.updated.push(loan.clone());

        if !state.loans.contains_key(&id) {
            return Err(RepositoryError::NotFound);
        }
        if loan.is_outstanding() && has_outstanding(&state.loans, book_id, Some(id)) {
            return Err(RepositoryError::UniqueViolation(format!(
                "outstanding loan for book {book_id}"
            )));
        }

        let stored = Loan {
            id: Some(id),
            ..loan
        };
        state.loans.insert(id, stored.clone());

        Ok(stored)
    }

    async fn exists_outstanding_for_book(&self, book_id: BookId) -> Result<bool> {
        Ok(has_outstanding(&self.lock()?.loans, book_id, None))
    }

    async fn find_by_isbn_or_customer(
        &self,
        filter: LoanFilter,
        page: PageRequest,
    ) -> Result<Page<Loan>> {
        let matching: Vec<Loan> = self
            .lock()?
            .loans
            .values()
            .filter(|loan| filter.matches(loan))
            .cloned()
            .collect();

        Ok(Page::from_all(matching, page))
    }

    async fn find_by_book(&self, book_id: BookId, page: PageRequest) -> Result<Page<Loan>> {
        let matching: Vec<Loan> = self
            .lock()?
            .loans
            .values()
            .filter(|loan| loan.book.id == Some(book_id))
            .cloned()
            .collect();

        Ok(Page::from_all(matching, page))
    }

    async fn find_outstanding_loaned_on_or_before(&self, cutoff: NaiveDate) -> Result<Vec<Loan>> {
        Ok(self
            .lock()?
            .loans
            .values()
            .filter(|loan| loan.is_late_at(cutoff))
            .cloned()
            .collect())
    }
}
