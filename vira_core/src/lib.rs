//! Front end of the Vira language: a text preprocessor, lexer,
//! recursive-descent parser with panic-mode recovery, AST printer and
//! symbol checker.

pub mod language;
pub mod preprocessor;

pub use language::{Error, ErrorKind, Result};
