use log::{debug, trace};
use crate::language::token::{Token, TokenType};
use crate::language::error::Result;
use crate::lexer_error;

/// Saved cursor state for the lexer's single speculative lookahead.
#[derive(Debug, Clone, Copy)]
struct Checkpoint {
    position: usize,
    offset: usize,
    line: usize,
    column: usize,
}

pub struct Lexer {
    pub(crate) input: Vec<char>,
    pub(crate) position: usize,
    pub(crate) offset: usize,
    pub(crate) line: usize,
    pub(crate) column: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    pub fn consume(&mut self) -> Option<char> {
        if self.position < self.input.len() {
            let ch = self.input[self.position];
            self.position += 1;
            self.offset += ch.len_utf8();

            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }

            Some(ch)
        } else {
            None
        }
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            position: self.position,
            offset: self.offset,
            line: self.line,
            column: self.column,
        }
    }

    fn rewind(&mut self, checkpoint: Checkpoint) {
        self.position = checkpoint.position;
        self.offset = checkpoint.offset;
        self.line = checkpoint.line;
        self.column = checkpoint.column;
    }

    pub fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.consume();
            } else {
                break;
            }
        }
    }

    fn read_while(&mut self, accept: impl Fn(char) -> bool) -> String {
        let mut text = String::new();

        while let Some(ch) = self.peek() {
            if accept(ch) {
                text.push(ch);
                self.consume();
            } else {
                break;
            }
        }

        text
    }

    pub fn read_identifier(&mut self) -> String {
        self.read_while(|ch| ch.is_alphanumeric() || ch == '_')
    }

    fn read_number(&mut self) -> String {
        self.read_while(|ch| ch.is_ascii_digit())
    }

    /// Reads a string literal. A backslash takes the following character
    /// verbatim; there is no escape table.
    pub fn read_string(&mut self) -> Result<String> {
        let line = self.line;
        let column = self.column;
        self.consume();

        let mut string = String::new();

        while let Some(ch) = self.peek() {
            match ch {
                '"' => {
                    self.consume();
                    return Ok(string);
                }
                '\\' => {
                    self.consume();
                    if let Some(escaped) = self.consume() {
                        string.push(escaped);
                    }
                }
                _ => {
                    string.push(ch);
                    self.consume();
                }
            }
        }

        lexer_error!("Unterminated string", line, column)
    }

    pub fn read_comment(&mut self) -> String {
        self.consume();
        self.read_while(|ch| ch != '\n')
    }

    /// `:name:` is an import marker. Anything else after a colon is rewound
    /// so that only the colon itself is consumed.
    fn read_colon(&mut self) -> (TokenType, String) {
        self.consume();

        if !self.peek().is_some_and(|ch| ch.is_alphabetic()) {
            return (TokenType::Colon, ":".to_string());
        }

        let after_colon = self.checkpoint();
        let name = self.read_identifier();

        if self.peek() == Some(':') {
            self.consume();
            (TokenType::ImportStart, name)
        } else {
            trace!("'{}' after ':' is not an import marker, rewinding", name);
            self.rewind(after_colon);
            (TokenType::Colon, ":".to_string())
        }
    }

    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();

        let line = self.line;
        let column = self.column;
        let start = self.offset;

        let Some(ch) = self.peek() else {
            return Ok(Token::new(TokenType::EOF, "", line, column, start..start));
        };

        let (token_type, text) = match ch {
            '0'..='9' => (TokenType::Number, self.read_number()),
            '"' => (TokenType::String, self.read_string()?),
            '<' => (TokenType::Comment, self.read_comment()),
            ':' => self.read_colon(),
            _ if ch.is_alphabetic() || ch == '_' => {
                let ident = self.read_identifier();
                let token_type = TokenType::keyword(&ident).unwrap_or(TokenType::Identifier);
                (token_type, ident)
            }
            _ => {
                self.consume();
                let token_type = TokenType::punctuation(ch).unwrap_or(TokenType::Unknown);
                (token_type, ch.to_string())
            }
        };

        let token = Token::new(token_type, text, line, column, start..self.offset);
        trace!("{}:{} {:?} {}", line, column, token.token_type, token);
        Ok(token)
    }

    /// Lexes the whole input, up to and including the EOF token. Comments and
    /// unknown characters are kept; see [`filter_tokens`].
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token()?;
            let done = token.is(TokenType::EOF);
            tokens.push(token);

            if done {
                break;
            }
        }

        debug!("Tokenized {} tokens over {} lines", tokens.len(), self.line);
        Ok(tokens)
    }
}

/// Prepares a raw token stream for the parser: drops comments and the EOF
/// marker, and rejects the first unknown character.
pub fn filter_tokens(tokens: Vec<Token>) -> Result<Vec<Token>> {
    let mut filtered = Vec::with_capacity(tokens.len());

    for token in tokens {
        match token.token_type {
            TokenType::Comment | TokenType::EOF => continue,
            TokenType::Unknown => {
                return lexer_error!(format!("Unknown token: {}", token.text), token.line, token.column);
            }
            _ => filtered.push(token),
        }
    }

    Ok(filtered)
}

/// Convenience wrapper: lex and filter in one step.
pub fn lex(source: &str) -> Result<Vec<Token>> {
    let tokens = Lexer::new(source).tokenize()?;
    filter_tokens(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::error::ErrorKind;

    fn kinds(source: &str) -> Vec<TokenType> {
        Lexer::new(source)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.token_type)
            .collect()
    }

    #[test]
    fn classifies_statement_tokens() {
        assert_eq!(
            kinds("let x = foo(1, \"a\");"),
            vec![
                TokenType::Let,
                TokenType::Identifier,
                TokenType::Assign,
                TokenType::Identifier,
                TokenType::LParen,
                TokenType::Number,
                TokenType::Comma,
                TokenType::String,
                TokenType::RParen,
                TokenType::Semicolon,
                TokenType::EOF,
            ]
        );
    }

    #[test]
    fn keywords_need_exact_match() {
        let tokens = Lexer::new("letter define write_ write").tokenize().unwrap();
        assert_eq!(tokens[0].token_type, TokenType::Identifier);
        assert_eq!(tokens[1].token_type, TokenType::Identifier);
        assert_eq!(tokens[2].token_type, TokenType::Identifier);
        assert_eq!(tokens[3].token_type, TokenType::Write);
    }

    #[test]
    fn tracks_line_and_column_of_token_start() {
        let tokens = Lexer::new("let a;\n  write a;").tokenize().unwrap();
        let write = &tokens[3];
        assert_eq!(write.token_type, TokenType::Write);
        assert_eq!((write.line, write.column), (2, 3));
        let semi = &tokens[5];
        assert_eq!((semi.line, semi.column), (2, 10));
    }

    #[test]
    fn number_stops_at_non_digit() {
        let tokens = Lexer::new("12.5").tokenize().unwrap();
        assert_eq!(tokens[0].text, "12");
        assert_eq!(tokens[1].token_type, TokenType::Unknown);
        assert_eq!(tokens[1].text, ".");
        assert_eq!(tokens[2].text, "5");
    }

    #[test]
    fn backslash_takes_next_char_verbatim() {
        let tokens = Lexer::new(r#""a\"b\nc\\""#).tokenize().unwrap();
        assert_eq!(tokens[0].token_type, TokenType::String);
        assert_eq!(tokens[0].text, "a\"bnc\\");
    }

    #[test]
    fn unterminated_string_is_fatal() {
        let err = Lexer::new("write \"abc;").tokenize().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Lexer);
        assert_eq!(err.line, Some(1));
        assert_eq!(err.message, "Unterminated string");
        assert_eq!(err.column, Some(7));
    }

    #[test]
    fn unterminated_string_after_trailing_backslash() {
        assert!(Lexer::new("\"abc\\").tokenize().is_err());
    }

    #[test]
    fn comment_runs_to_end_of_line() {
        let tokens = Lexer::new("< note here\nwrite 1;").tokenize().unwrap();
        assert_eq!(tokens[0].token_type, TokenType::Comment);
        assert_eq!(tokens[0].text, " note here");
        assert_eq!(tokens[1].token_type, TokenType::Write);
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn import_marker_is_one_token() {
        let tokens = Lexer::new(":mathlib:").tokenize().unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].token_type, TokenType::ImportStart);
        assert_eq!(tokens[0].text, "mathlib");
        assert_eq!(tokens[0].span, 0..9);
    }

    #[test]
    fn colon_without_closing_colon_rewinds() {
        let tokens = Lexer::new(":abc x").tokenize().unwrap();
        assert_eq!(tokens[0].token_type, TokenType::Colon);
        assert_eq!(tokens[0].span, 0..1);
        assert_eq!(tokens[1].token_type, TokenType::Identifier);
        assert_eq!(tokens[1].text, "abc");
        assert_eq!((tokens[1].line, tokens[1].column), (1, 2));
        assert_eq!(tokens[2].text, "x");
    }

    #[test]
    fn colon_before_non_letter_is_plain() {
        assert_eq!(
            kinds(":: :1"),
            vec![TokenType::Colon, TokenType::Colon, TokenType::Colon, TokenType::Number, TokenType::EOF]
        );
    }

    #[test]
    fn eof_is_idempotent() {
        let mut lexer = Lexer::new("x  ");
        assert_eq!(lexer.next_token().unwrap().token_type, TokenType::Identifier);
        let first = lexer.next_token().unwrap();
        for _ in 0..5 {
            let again = lexer.next_token().unwrap();
            assert_eq!(again, first);
        }
        assert_eq!(first.token_type, TokenType::EOF);
        assert_eq!(lexer.position, 3);
    }

    #[test]
    fn filter_drops_comments_and_eof() {
        let tokens = Lexer::new("< c\nwrite 1; < d").tokenize().unwrap();
        let filtered = filter_tokens(tokens).unwrap();
        let kinds: Vec<_> = filtered.iter().map(|t| t.token_type).collect();
        assert_eq!(kinds, vec![TokenType::Write, TokenType::Number, TokenType::Semicolon]);
    }

    #[test]
    fn filter_rejects_unknown_character() {
        let err = lex("let a = 1;\nwrite a @ 2;").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Lexer);
        assert_eq!(err.line, Some(2));
        assert_eq!(err.column, Some(9));
        assert_eq!(err.message, "Unknown token: @");
        assert_eq!(err.brief(), "Unknown token: @ at line 2");
    }

    #[test]
    fn spans_cover_multibyte_text() {
        let source = "write \"héllo\";";
        let tokens = Lexer::new(source).tokenize().unwrap();
        assert_eq!(tokens[1].lexeme(source), "\"héllo\"");
        assert_eq!(tokens[2].lexeme(source), ";");
    }
}
