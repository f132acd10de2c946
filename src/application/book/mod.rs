mod book_service;

pub use book_service::{
    delete_book, find_books, get_book_by_id, get_book_by_isbn, save_book, update_book,
};
