use log::{debug, info, trace};
use crate::language::token::{Token, TokenType};
use crate::language::ast::{BinaryOperator, Expression, Program, Statement};
use crate::language::lexer::{filter_tokens, Lexer};
use crate::language::error::{Error, Result};
use crate::parser_error;

/// Recursive-descent parser over a filtered token sequence.
///
/// `parse` never fails: a malformed declaration is reported, skipped up to
/// the next synchronisation point, and left out of the resulting [`Program`].
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    eof: Token,
    errors: Vec<Error>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        let eof = match tokens.last() {
            Some(last) if last.is(TokenType::EOF) => last.clone(),
            Some(last) => Token::new(TokenType::EOF, "", last.line, last.column + last.span.len(), last.span.end..last.span.end),
            None => Token::new(TokenType::EOF, "", 1, 1, 0..0),
        };

        Parser {
            tokens,
            current: 0,
            eof,
            errors: Vec::new(),
        }
    }

    /// Replaces the synthesized end-of-input token with the one the lexer
    /// produced, so errors at EOF carry its exact position.
    pub fn with_eof(mut self, eof: Token) -> Self {
        self.eof = eof;
        self
    }

    pub fn parse(&mut self) -> Program {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        debug!("Parsed {} statements with {} errors", statements.len(), self.errors.len());
        Program::new(statements)
    }

    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<Error> {
        self.errors
    }

    fn declaration(&mut self) -> Option<Statement> {
        let start = self.current;

        let result = if self.match_token(TokenType::Let) {
            self.var_declaration()
        } else if self.match_token(TokenType::Def) {
            self.function_definition()
        } else if self.match_token(TokenType::ImportStart) {
            self.import()
        } else {
            self.statement()
        };

        match result {
            Ok(stmt) => Some(stmt),
            Err(e) => {
                debug!("{}", e);
                self.errors.push(e);
                self.synchronize(start);
                None
            }
        }
    }

    /// Skips to just past the next `;`, or up to the next `let`/`def`/`write`
    /// or EOF. Always leaves the cursor past `start`.
    fn synchronize(&mut self, start: usize) {
        while !self.is_at_end() {
            if self.match_token(TokenType::Semicolon) {
                break;
            }
            if self.peek().token_type.starts_declaration() && self.current > start {
                break;
            }
            self.advance();
        }

        trace!("Resynchronized at token {} ({})", self.current, self.peek());
    }

    fn var_declaration(&mut self) -> Result<Statement> {
        let name = self.consume(TokenType::Identifier, "Expected variable name")?.text.clone();

        let initializer = if self.match_token(TokenType::Assign) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(TokenType::Semicolon, "Expected ';' after variable declaration")?;

        Ok(Statement::VarDeclaration { name, initializer })
    }

    fn function_definition(&mut self) -> Result<Statement> {
        let name = self.consume(TokenType::Identifier, "Expected function name")?.text.clone();
        self.consume(TokenType::LParen, "Expected '(' after function name")?;

        let mut params = Vec::new();
        if !self.match_token(TokenType::RParen) {
            loop {
                params.push(self.consume(TokenType::Identifier, "Expected parameter name")?.text.clone());
                if !self.match_token(TokenType::Comma) {
                    break;
                }
            }
            self.consume(TokenType::RParen, "Expected ')' after parameters")?;
        }

        self.consume(TokenType::LBrace, "Expected '{' before function body")?;

        let mut body = Vec::new();
        while !self.check(TokenType::RBrace) && !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                body.push(stmt);
            }
        }

        self.consume(TokenType::RBrace, "Expected '}' after function body")?;

        Ok(Statement::FunctionDefinition { name, params, body })
    }

    fn import(&mut self) -> Result<Statement> {
        let lib_name = self.previous().text.clone();
        self.consume(TokenType::Semicolon, "Expected ';' after import")?;

        Ok(Statement::Import { lib_name, alias: None })
    }

    fn statement(&mut self) -> Result<Statement> {
        if self.match_token(TokenType::Write) {
            return self.write_statement();
        }

        self.expression_statement()
    }

    fn write_statement(&mut self) -> Result<Statement> {
        let expr = self.expression()?;
        self.consume(TokenType::Semicolon, "Expected ';' after write")?;

        Ok(Statement::Write(expr))
    }

    fn expression_statement(&mut self) -> Result<Statement> {
        let expr = self.expression()?;
        self.consume(TokenType::Semicolon, "Expected ';' after expression")?;

        Ok(Statement::Expression(expr))
    }

    fn expression(&mut self) -> Result<Expression> {
        self.additive()
    }

    fn additive(&mut self) -> Result<Expression> {
        let mut expr = self.multiplicative()?;

        while self.match_token(TokenType::Plus) || self.match_token(TokenType::Minus) {
            let operator = match self.previous().token_type {
                TokenType::Plus => BinaryOperator::Add,
                _ => BinaryOperator::Subtract,
            };

            let right = self.multiplicative()?;
            expr = Expression::binary(expr, operator, right);
        }

        Ok(expr)
    }

    fn multiplicative(&mut self) -> Result<Expression> {
        let mut expr = self.unary()?;

        while self.match_token(TokenType::Star) || self.match_token(TokenType::Slash) {
            let operator = match self.previous().token_type {
                TokenType::Star => BinaryOperator::Multiply,
                _ => BinaryOperator::Divide,
            };

            let right = self.unary()?;
            expr = Expression::binary(expr, operator, right);
        }

        Ok(expr)
    }

    /// Prefix minus is sugar for `0 - operand`.
    fn unary(&mut self) -> Result<Expression> {
        if self.match_token(TokenType::Minus) {
            let operand = self.unary()?;
            return Ok(Expression::binary(Expression::NumberLiteral(0.0), BinaryOperator::Subtract, operand));
        }

        self.primary()
    }

    fn primary(&mut self) -> Result<Expression> {
        if self.match_token(TokenType::Number) {
            let token = self.previous();
            return match token.text.parse::<f64>() {
                Ok(value) => Ok(Expression::NumberLiteral(value)),
                Err(_) => parser_error!(format!("Invalid number literal '{}'", token.text), token.line, token.column),
            };
        }

        if self.match_token(TokenType::String) {
            return Ok(Expression::StringLiteral(self.previous().text.clone()));
        }

        if self.match_token(TokenType::Identifier) {
            let name = self.previous().text.clone();

            if self.match_token(TokenType::LParen) {
                let args = self.arguments()?;
                return Ok(Expression::Call { callee: name, args });
            }

            return Ok(Expression::Identifier(name));
        }

        if self.match_token(TokenType::LParen) {
            let expr = self.expression()?;
            self.consume(TokenType::RParen, "Expected ')' after expression")?;
            return Ok(expr);
        }

        let token = self.peek();
        parser_error!(format!("Unexpected token {}", token), token.line, token.column)
    }

    fn arguments(&mut self) -> Result<Vec<Expression>> {
        let mut args = Vec::new();

        if self.match_token(TokenType::RParen) {
            return Ok(args);
        }

        loop {
            args.push(self.expression()?);
            if !self.match_token(TokenType::Comma) {
                break;
            }
        }

        self.consume(TokenType::RParen, "Expected ')' after arguments")?;

        Ok(args)
    }

    fn is_at_end(&self) -> bool {
        self.peek().is(TokenType::EOF)
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.current).unwrap_or(&self.eof)
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn check(&self, token_type: TokenType) -> bool {
        !self.is_at_end() && self.peek().is(token_type)
    }

    fn match_token(&mut self, token_type: TokenType) -> bool {
        if self.check(token_type) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume(&mut self, token_type: TokenType, error_message: &str) -> Result<&Token> {
        if self.check(token_type) {
            Ok(self.advance())
        } else {
            let token = self.peek();
            parser_error!(format!("{}, found {}", error_message, token), token.line, token.column)
        }
    }
}

/// Output of [`parse`]: the recovered program and every syntax error met on
/// the way.
#[derive(Debug, Clone)]
pub struct Parsed {
    pub program: Program,
    pub errors: Vec<Error>,
}

impl Parsed {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Runs lex, filter and parse over `input`. Only fatal lexer errors are
/// returned as `Err`.
pub fn parse(input: &str) -> Result<Parsed> {
    debug!("Parsing {} bytes of source", input.len());

    let mut lexer = Lexer::new(input);
    let raw = match lexer.tokenize() {
        Ok(raw) => raw,
        Err(e) => {
            debug!("Tokenization failed: {}", e);
            return Err(e);
        }
    };
    let eof = raw.last().filter(|t| t.is(TokenType::EOF)).cloned();

    let tokens = match filter_tokens(raw) {
        Ok(tokens) => {
            info!("Tokenized successfully, {} tokens", tokens.len());
            tokens
        }
        Err(e) => {
            debug!("Tokenization failed: {}", e);
            return Err(e);
        }
    };

    let mut parser = Parser::new(tokens);
    if let Some(eof) = eof {
        parser = parser.with_eof(eof);
    }
    let program = parser.parse();
    let errors = parser.into_errors();

    if errors.is_empty() {
        info!("Parsed successfully, {} statements", program.len());
    } else {
        info!("Parsed {} statements, {} errors reported", program.len(), errors.len());
    }

    Ok(Parsed { program, errors })
}
