pub mod book;
pub mod loan;
pub mod page;
pub mod value_objects;

pub use book::*;
pub use loan::*;
pub use page::*;
pub use value_objects::*;
