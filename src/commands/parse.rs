use std::io::{self, Write};
use std::path::Path;
use colored::Colorize;
use log::info;
use vira_core::language::{check, diagnostic, parse as parse_source, AstPrinter, Error};
use crate::commands::{preprocessor, read_source};
use crate::config::Config;
use crate::error::CliError;

pub struct ParseOptions {
    pub ast: bool,
    pub check: bool,
    pub json: bool,
    pub preprocess: bool,
    pub snippets: bool,
}

fn report<E: Write>(err: &mut E, error: &Error, file_name: &str, source: &str, snippets: bool) -> Result<(), CliError> {
    writeln!(err, "{} {}", "Error:".red().bold(), error.brief()).map_err(CliError::Output)?;
    if snippets {
        write!(err, "{}", diagnostic::render(error, file_name, source)).map_err(CliError::Output)?;
    }
    Ok(())
}

/// Syntax errors are reported but do not fail the run. Lexer and
/// preprocessor failures, and a failed `--check`, do.
pub fn parse(input: &Path, options: &ParseOptions, config: &Config) -> Result<(), CliError> {
    parse_to(input, options, config, &mut io::stdout().lock(), &mut io::stderr().lock())
}

pub fn parse_to<O: Write, E: Write>(
    input: &Path,
    options: &ParseOptions,
    config: &Config,
    out: &mut O,
    err: &mut E,
) -> Result<(), CliError> {
    let mut source = read_source(input)?;
    let mut file_name = input.display().to_string();
    if options.preprocess {
        source = preprocessor(&config.preprocessor).process(&source, Some(input))?;
        // Line numbers now refer to the expanded text.
        file_name.push_str(" (preprocessed)");
    }

    let parsed = parse_source(&source)?;

    for error in &parsed.errors {
        report(err, error, &file_name, &source, options.snippets)?;
    }
    if !parsed.is_clean() {
        info!("{} syntax error(s) in '{}'", parsed.errors.len(), file_name);
    }

    if options.json {
        let json = parsed.program.to_json()?;
        writeln!(out, "{}", json).map_err(CliError::Output)?;
    }

    if options.ast {
        AstPrinter::new(&mut *out)
            .print(&parsed.program)
            .map_err(CliError::Output)?;
    }

    if options.check {
        let errors = check(&parsed.program);
        if !errors.is_empty() {
            for error in &errors {
                report(err, error, &file_name, &source, options.snippets)?;
            }
            return Err(CliError::CheckFailed(errors.len()));
        }
        writeln!(out, "Syntax check passed.").map_err(CliError::Output)?;
    }

    info!("Parsed {} statement(s) from '{}'", parsed.program.len(), file_name);
    Ok(())
}
