pub mod book_repository;
pub mod errors;
pub mod loan_repository;
pub mod mailer;

pub use book_repository::*;
pub use errors::*;
pub use loan_repository::*;
pub use mailer::{MailSettings, Mailer};
