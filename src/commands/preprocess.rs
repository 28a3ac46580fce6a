use std::fs;
use std::path::Path;
use log::info;
use crate::commands::{preprocessor, read_source};
use crate::config::Config;
use crate::error::CliError;

pub fn preprocess(input: &Path, output: &Path, config: &Config) -> Result<(), CliError> {
    let source = read_source(input)?;
    let expanded = preprocessor(&config.preprocessor).process(&source, Some(input))?;

    fs::write(output, &expanded).map_err(|e| CliError::Write(output.to_path_buf(), e))?;
    info!("Preprocessed '{}' into '{}'", input.display(), output.display());

    Ok(())
}
