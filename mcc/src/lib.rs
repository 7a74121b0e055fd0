pub mod codegen;
pub mod compile;
pub mod error;
pub mod grammer;
pub mod regalloc;
pub mod semantic;
pub mod symbols;

pub use compile::{compile, Compilation, Stats, TokenView};
pub use error::{Error, Phase};
pub use grammer::lexer::Lexer;
pub use grammer::parsercore::Parser;
