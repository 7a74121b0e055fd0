pub mod error;
pub mod parser;
pub mod program;

pub use error::Error;
pub use program::{Entry, Program};
