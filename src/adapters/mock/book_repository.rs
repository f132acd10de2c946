use crate::domain::{Book, BookFilter, BookId, Page, PageRequest};
use crate::ports::book_repository::BookRepository as BookRepositoryTrait;
use crate::ports::errors::{RepositoryError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct State {
    next_id: i64,
    books: BTreeMap<BookId, Book>,
    updated: Vec<Book>,
    deleted: Vec<BookId>,
}

/// BookRepositoryのインメモリ実装
///
/// ISBNの一意性はロック内で確認するため、同時登録でも重複しない。
/// テストから更新・削除の呼び出し履歴を参照できる。
pub struct BookRepository {
    state: Mutex<State>,
}

impl BookRepository {
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

    /// `update` に渡された書籍（呼び出し順）
    pub fn updated_books(&self) -> Vec<Book> {
        self.lock().map(|s| s.updated.clone()).unwrap_or_default()
    }

    /// `delete` に渡されたID（呼び出し順）
    pub fn deleted_ids(&self) -> Vec<BookId> {
        self.lock().map(|s| s.deleted.clone()).unwrap_or_default()
    }
}

impl Default for BookRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn isbn_taken(books: &BTreeMap<BookId, Book>, isbn: &str, except: Option<BookId>) -> bool {
    books
        .iter()
        .any(|(id, book)| Some(*id) != except && book.isbn == isbn)
}

#[async_trait]
impl BookRepositoryTrait for BookRepository {
    async fn insert(&self, book: Book) -> Result<Book> {
        let mut state = self.lock()?;

        if isbn_taken(&state.books, &book.isbn, None) {
            return Err(RepositoryError::UniqueViolation(format!("isbn {}", book.isbn)));
        }

        state.next_id += 1;
        let id = BookId::new(state.next_id);
        let stored = book.with_id(id);
        state.books.insert(id, stored.clone());

        Ok(stored)
    }

    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>> {
        Ok(self.lock()?.books.get(&id).cloned())
    }

    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>> {
        Ok(self
            .lock()?
            .books
            .values()
            .find(|book| book.isbn == isbn)
            .cloned())
    }

    async fn exists_by_isbn(&self, isbn: &str) -> Result<bool> {
        Ok(isbn_taken(&self.lock()?.books, isbn, None))
    }

    async fn update(&self, id: BookId, book: Book) -> Result<Book> {
        let mut state = self.lock()?;
        state.updated.push(book.clone());

        if !state.books.contains_key(&id) {
            return Err(RepositoryError::NotFound);
        }
        if isbn_taken(&state.books, &book.isbn, Some(id)) {
            return Err(RepositoryError::UniqueViolation(format!("isbn {}", book.isbn)));
        }

        let stored = book.with_id(id);
        state.books.insert(id, stored.clone());

        Ok(stored)
    }

    async fn delete(&self, id: BookId) -> Result<()> {
        let mut state = self.lock()?;
        state.deleted.push(id);
        state.books.remove(&id);
        Ok(())
    }

    async fn find_by_example(
        &self,
        filter: BookFilter,
        page: PageRequest,
    ) -> Result<Page<Book>> {
        let matching: Vec<Book> = self
            .lock()?
            .books
            .values()
            .filter(|book| filter.matches(book))
            .cloned()
            .collect();

        Ok(Page::from_all(matching, page))
    }
}
