use std::io;
use std::path::PathBuf;
use derive_more::Display;

#[derive(Debug, Display)]
pub enum CliError {
    #[display("Could not open file: {} ({})", _0.display(), _1)]
    Open(PathBuf, io::Error),
    #[display("Could not write file: {} ({})", _0.display(), _1)]
    Write(PathBuf, io::Error),
    #[display("Invalid config '{}': {}", _0.display(), _1)]
    Config(PathBuf, String),
    #[display("Failed to initialise logger: {}", _0)]
    Logger(String),
    #[display("{}", _0)]
    Core(vira_core::Error),
    #[display("Semantic check failed with {} error(s)", _0)]
    CheckFailed(usize),
    #[display("Failed to serialize output: {}", _0)]
    Json(serde_json::Error),
    #[display("Failed to write output: {}", _0)]
    Output(io::Error),
}

impl std::error::Error for CliError {}

impl From<vira_core::Error> for CliError {
    fn from(error: vira_core::Error) -> Self {
        CliError::Core(error)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(error: serde_json::Error) -> Self {
        CliError::Json(error)
    }
}
