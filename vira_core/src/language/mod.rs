pub mod token;
pub mod ast;
pub mod lexer;
pub mod parser;
pub mod error;
pub mod checker;
pub mod printer;
pub mod diagnostic;

pub use error::{Error, ErrorKind, Result};
pub use ast::{AstVisitor, BinaryOperator, Expression, Program, Statement};
pub use token::{Token, TokenType};
pub use lexer::{filter_tokens, lex, Lexer};
pub use parser::{parse, Parsed, Parser};
pub use checker::{check, Checker};
pub use printer::AstPrinter;
