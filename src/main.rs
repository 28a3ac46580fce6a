use std::path::PathBuf;
use std::process::ExitCode;
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use log::{debug, LevelFilter};
use commands::parse::{parse, ParseOptions};
use commands::preprocess::preprocess;
use commands::tokens::tokens;
use crate::config::{load_config, Config};
use crate::error::CliError;

mod commands;
mod config;
mod error;

#[derive(Parser, Debug)]
#[command(name = "vira")]
#[command(about = "Preprocess, tokenize, parse and check Vira source files.")]
struct Cli {
    /// Configuration file. Defaults to ./vira.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Raise console logging: -v for debug, -vv for trace.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Also write a timestamped log file into this directory.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a source file and report syntax errors
    Parse {
        input: PathBuf,

        /// Print the syntax tree
        #[arg(long)]
        ast: bool,

        /// Run the symbol checker after parsing
        #[arg(long)]
        check: bool,

        /// Print the syntax tree as JSON
        #[arg(long)]
        json: bool,

        /// Run the preprocessor before lexing. Reported lines then refer
        /// to the expanded text.
        #[arg(long)]
        preprocess: bool,
    },
    /// List the tokens of a source file
    Tokens {
        input: PathBuf,

        #[arg(long)]
        json: bool,

        /// Keep comment tokens in the listing
        #[arg(long)]
        comments: bool,
    },
    /// Expand directives and macros into an output file
    Preprocess {
        input: PathBuf,
        output: PathBuf,
    },
}

fn init_logging(cli: &Cli, config: &Config) -> Result<(), CliError> {
    let configured = config.logger.console_filter().map_err(CliError::Logger)?;
    let console_level = match cli.verbose {
        0 => configured,
        1 => configured.max(LevelFilter::Debug),
        _ => LevelFilter::Trace,
    };
    let file_level = config.logger.file_filter().map_err(CliError::Logger)?;
    let log_dir = cli.log_dir.as_ref().or(config.logger.directory.as_ref());

    vira_logger::init(log_dir, console_level, file_level)
        .map_err(|e| CliError::Logger(e.to_string()))?;
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_config(cli.config.as_deref())?;
    init_logging(&cli, &config)?;

    match cli.command {
        Commands::Parse { input, ast, check, json, preprocess } => {
            let options = ParseOptions { ast, check, json, preprocess, snippets: cli.verbose > 0 };
            parse(&input, &options, &config)
        },
        Commands::Tokens { input, json, comments } => tokens(&input, json, comments),
        Commands::Preprocess { input, output } => preprocess(&input, &output, &config),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("Run failed: {}", e);
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from(["vira", "parse", "main.vira", "--ast", "-vv", "--config", "x.toml"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
        match cli.command {
            Commands::Parse { input, ast, check, .. } => {
                assert_eq!(input, PathBuf::from("main.vira"));
                assert!(ast);
                assert!(!check);
            },
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn preprocess_needs_an_output() {
        assert!(Cli::try_parse_from(["vira", "preprocess", "in.vira"]).is_err());
    }
}
