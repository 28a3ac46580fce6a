pub mod parse;
pub mod tokens;
pub mod preprocess;

use std::fs;
use std::path::Path;
use log::debug;
use vira_core::preprocessor::{FsResolver, Preprocessor};
use crate::config::PreprocessorConfig;
use crate::error::CliError;

pub fn read_source(path: &Path) -> Result<String, CliError> {
    let source = fs::read_to_string(path).map_err(|e| CliError::Open(path.to_path_buf(), e))?;
    debug!("Read {} bytes from '{}'", source.len(), path.display());
    Ok(source)
}

pub fn preprocessor(config: &PreprocessorConfig) -> Preprocessor<FsResolver> {
    let mut pp = Preprocessor::new(FsResolver::new(config.include_paths.clone()))
        .with_max_include_depth(config.max_include_depth);

    for (name, value) in &config.defines {
        pp.define(name.as_str(), value.as_str());
    }

    pp
}
