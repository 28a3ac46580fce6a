use std::fmt;
use std::ops::Range;
use serde::Serialize;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub enum TokenType {
    EOF,                // end of input
    // -------- //
    Identifier,         // name
    Number,             // 1234...
    String,             // "..."
    // -------- //
    Colon,              // :
    Assign,             // =
    Plus,               // +
    Minus,              // -
    Star,               // *
    Slash,              // /
    LParen,             // (
    RParen,             // )
    LBrace,             // {
    RBrace,             // }
    Semicolon,          // ;
    Comma,              // ,
    // -------- //
    Let,                // let
    Def,                // def
    Write,              // write
    ImportStart,        // :lib:
    // -------- //
    Comment,            // < ...
    Unknown,
}

impl TokenType {
    pub fn keyword(ident: &str) -> Option<TokenType> {
        match ident {
            "let" => Some(TokenType::Let),
            "def" => Some(TokenType::Def),
            "write" => Some(TokenType::Write),
            _ => None,
        }
    }

    pub fn punctuation(ch: char) -> Option<TokenType> {
        match ch {
            '=' => Some(TokenType::Assign),
            '+' => Some(TokenType::Plus),
            '-' => Some(TokenType::Minus),
            '*' => Some(TokenType::Star),
            '/' => Some(TokenType::Slash),
            '(' => Some(TokenType::LParen),
            ')' => Some(TokenType::RParen),
            '{' => Some(TokenType::LBrace),
            '}' => Some(TokenType::RBrace),
            ';' => Some(TokenType::Semicolon),
            ',' => Some(TokenType::Comma),
            _ => None,
        }
    }

    /// Tokens at which panic-mode recovery stops without consuming.
    pub fn starts_declaration(&self) -> bool {
        matches!(self, TokenType::Let | TokenType::Def | TokenType::Write)
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenType::EOF => write!(f, "EOF"),
            TokenType::Identifier => write!(f, "identifier"),
            TokenType::Number => write!(f, "number"),
            TokenType::String => write!(f, "string"),
            TokenType::Colon => write!(f, "':'"),
            TokenType::Assign => write!(f, "'='"),
            TokenType::Plus => write!(f, "'+'"),
            TokenType::Minus => write!(f, "'-'"),
            TokenType::Star => write!(f, "'*'"),
            TokenType::Slash => write!(f, "'/'"),
            TokenType::LParen => write!(f, "'('"),
            TokenType::RParen => write!(f, "')'"),
            TokenType::LBrace => write!(f, "'{{'"),
            TokenType::RBrace => write!(f, "'}}'"),
            TokenType::Semicolon => write!(f, "';'"),
            TokenType::Comma => write!(f, "','"),
            TokenType::Let => write!(f, "'let'"),
            TokenType::Def => write!(f, "'def'"),
            TokenType::Write => write!(f, "'write'"),
            TokenType::ImportStart => write!(f, "import"),
            TokenType::Comment => write!(f, "comment"),
            TokenType::Unknown => write!(f, "unknown"),
        }
    }
}

/// A classified lexeme. `text` is the token's value (string contents with
/// escapes resolved, the library name of an import marker); `span` is the
/// byte range of the raw lexeme in the source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub token_type: TokenType,
    pub text: String,
    pub line: usize,
    pub column: usize,
    pub span: Range<usize>,
}

impl Token {
    pub fn new(token_type: TokenType, text: impl Into<String>, line: usize, column: usize, span: Range<usize>) -> Self {
        Token {
            token_type,
            text: text.into(),
            line,
            column,
            span,
        }
    }

    pub fn is(&self, token_type: TokenType) -> bool {
        self.token_type == token_type
    }

    /// The raw source slice this token was lexed from.
    pub fn lexeme<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.clone()]
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.token_type {
            TokenType::EOF => write!(f, "EOF"),
            TokenType::String => write!(f, "\"{}\"", self.text),
            TokenType::ImportStart => write!(f, ":{}:", self.text),
            TokenType::Comment => write!(f, "<{}", self.text),
            _ => write!(f, "'{}'", self.text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_exact() {
        assert_eq!(TokenType::keyword("let"), Some(TokenType::Let));
        assert_eq!(TokenType::keyword("write"), Some(TokenType::Write));
        assert_eq!(TokenType::keyword("Let"), None);
        assert_eq!(TokenType::keyword("define"), None);
    }

    #[test]
    fn display_quotes_by_kind() {
        let s = Token::new(TokenType::String, "hi", 1, 1, 0..4);
        let imp = Token::new(TokenType::ImportStart, "math", 1, 1, 0..6);
        let semi = Token::new(TokenType::Semicolon, ";", 1, 1, 0..1);
        assert_eq!(s.to_string(), "\"hi\"");
        assert_eq!(imp.to_string(), ":math:");
        assert_eq!(semi.to_string(), "';'");
    }
}
