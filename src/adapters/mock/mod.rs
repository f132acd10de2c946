pub mod book_repository;
pub mod loan_repository;
pub mod mailer;

pub use book_repository::BookRepository;
pub use loan_repository::LoanRepository;
pub use mailer::{Mailer, SentMail};
