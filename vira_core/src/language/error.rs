use std::fmt;
use derive_more::Display;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum ErrorKind {
    #[display("Lexer")]
    Lexer,
    #[display("Parser")]
    Parser,
    #[display("Semantic")]
    Semantic,
    #[display("Preprocessor")]
    Preprocessor,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
    pub line: Option<usize>,
    pub column: Option<usize>,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>, line: Option<usize>, column: Option<usize>) -> Self {
        Error {
            kind,
            message: message.into(),
            line,
            column,
        }
    }

    /// Single-line form used by the driver, e.g. `Expected ';' after write at line 3`.
    pub fn brief(&self) -> String {
        match self.line {
            Some(line) => format!("{} at line {}", self.message, line),
            None => self.message.clone(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.line, &self.column) {
            (Some(line), Some(column)) => {
                write!(f, "{} error: {} (line {}, column {})", self.kind, self.message, line, column)
            }
            (Some(line), None) => {
                write!(f, "{} error: {} (line {})", self.kind, self.message, line)
            }
            _ => {
                write!(f, "{} error: {}", self.kind, self.message)
            }
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

#[macro_export]
macro_rules! lexer_error {
    ($msg:expr, $line:expr, $col:expr) => {
        Err($crate::language::error::Error {
            kind: $crate::language::error::ErrorKind::Lexer,
            message: $msg.to_string(),
            line: Some($line),
            column: Some($col),
        })
    };
}

#[macro_export]
macro_rules! parser_error {
    ($msg:expr, $line:expr, $col:expr) => {
        Err($crate::language::error::Error {
            kind: $crate::language::error::ErrorKind::Parser,
            message: $msg.to_string(),
            line: Some($line),
            column: Some($col),
        })
    };
}

#[macro_export]
macro_rules! semantic_error {
    ($msg:expr, $line:expr) => {
        $crate::language::error::Error {
            kind: $crate::language::error::ErrorKind::Semantic,
            message: $msg.to_string(),
            line: $line,
            column: None,
        }
    };
}

#[macro_export]
macro_rules! preprocessor_error {
    ($msg:expr) => {
        Err($crate::language::error::Error {
            kind: $crate::language::error::ErrorKind::Preprocessor,
            message: $msg.to_string(),
            line: None,
            column: None,
        })
    };
    ($msg:expr, $line:expr) => {
        Err($crate::language::error::Error {
            kind: $crate::language::error::ErrorKind::Preprocessor,
            message: $msg.to_string(),
            line: Some($line),
            column: None,
        })
    };
}
