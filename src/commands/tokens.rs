use std::io::{self, Write};
use std::path::Path;
use vira_core::language::{filter_tokens, Lexer, Token, TokenType};
use crate::commands::read_source;
use crate::error::CliError;

pub fn tokens(input: &Path, json: bool, comments: bool) -> Result<(), CliError> {
    let source = read_source(input)?;
    let tokens: Vec<Token> = Lexer::new(&source)
        .tokenize()?
        .into_iter()
        .filter(|token| comments || !token.is(TokenType::Comment))
        .collect();

    let mut out = io::stdout().lock();
    if json {
        let rendered = serde_json::to_string_pretty(&tokens)?;
        writeln!(out, "{}", rendered).map_err(CliError::Output)?;
    } else {
        for token in &tokens {
            writeln!(
                out,
                "{:>4}:{:<4} {:<12} {}",
                token.line,
                token.column,
                format!("{:?}", token.token_type),
                token
            )
            .map_err(CliError::Output)?;
        }
    }

    // An unknown character still fails the run once the listing is out.
    filter_tokens(tokens)?;
    Ok(())
}
