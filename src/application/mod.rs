pub mod book;
mod dependencies;
mod errors;
pub mod loan;
pub mod notification;

pub use dependencies::ServiceDependencies;
pub use errors::{ApplicationError, Result};
