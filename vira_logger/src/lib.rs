use chrono::Local;
use colored::*;
use log::{Level, LevelFilter};
use std::path::{Path, PathBuf};
use std::io::ErrorKind;

const LOGS_PREFIX: &str = "vira";
const SEPARATOR: &str = "_";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";
const LOG_EXTENSION: &str = "log";
const CONSOLE_TIMESTAMP_FORMAT: &str = "%H:%M:%S%.3f";
const FILE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

fn generate_filename_only() -> String {
    let now = Local::now();
    let timestamp = now.format(TIMESTAMP_FORMAT).to_string();
    format!("{}{}{}.{}", LOGS_PREFIX, SEPARATOR, timestamp, LOG_EXTENSION)
}

fn ensure_log_directory_exists(log_dir: &Path) -> std::io::Result<()> {
    if !log_dir.exists() {
        std::fs::create_dir_all(log_dir)?;
    }
    Ok(())
}

/// Parses a level name from configuration (`"off"`, `"error"` … `"trace"`),
/// case-insensitively.
pub fn parse_level(name: &str) -> Option<LevelFilter> {
    name.trim().parse::<LevelFilter>().ok()
}

/// Installs the global logger. Console output goes to stderr so that tool
/// output on stdout stays machine-readable. When `log_dir` is given, a
/// timestamped log file is created there and receives records up to
/// `file_level`.
pub fn init(
    log_dir: Option<impl AsRef<Path>>,
    console_level: LevelFilter,
    file_level: LevelFilter,
) -> Result<Option<PathBuf>, fern::InitError> {

    let mut log_file_path: Option<PathBuf> = None;

    if let Some(dir) = log_dir {
        let dir_path = dir.as_ref();
        if let Err(e) = ensure_log_directory_exists(dir_path) {
            return Err(fern::InitError::Io(std::io::Error::new(
                ErrorKind::Other,
                format!("Failed to create log directory '{}': {}", dir_path.display(), e),
            )));
        }
        log_file_path = Some(dir_path.join(generate_filename_only()));
    }

    let console_dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            let level_str = match record.level() {
                Level::Error => "ERROR".red().bold(),
                Level::Warn => "WARN ".yellow().bold(),
                Level::Info => "INFO ".green().bold(),
                Level::Debug => "DEBUG".blue().bold(),
                Level::Trace => "TRACE".magenta().bold(),
            };

            let timestamp = Local::now().format(CONSOLE_TIMESTAMP_FORMAT).to_string();

            out.finish(format_args!(
                "[{}] [{}] [{}] {}",
                timestamp,
                level_str,
                record.target(),
                message
            ))
        })
        .level(console_level)
        .chain(std::io::stderr());

    let mut base_dispatch = fern::Dispatch::new()
        .level(console_level.max(if log_file_path.is_some() { file_level } else { LevelFilter::Off }))
        .chain(console_dispatch);

    if let Some(path) = &log_file_path {
        let file_dispatch = fern::Dispatch::new()
            .format(|out, message, record| {
                let timestamp = Local::now().format(FILE_TIMESTAMP_FORMAT).to_string();
                out.finish(format_args!(
                    "[{}] [{:<5}] [{}] [{}:{}] {}",
                    timestamp,
                    record.level(),
                    record.target(),
                    record.file().unwrap_or("?"),
                    record.line().unwrap_or(0),
                    message
                ))
            })
            .level(file_level)
            .chain(fern::log_file(path)?);

        base_dispatch = base_dispatch.chain(file_dispatch);
    }

    base_dispatch.apply()?;

    log::debug!("Logger initialised. Console level: {}, file level: {}", console_level, file_level);
    if let Some(path) = &log_file_path {
        log::debug!("Writing log file: {}", path.display());
    }

    Ok(log_file_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names_parse_case_insensitively() {
        assert_eq!(parse_level("warn"), Some(LevelFilter::Warn));
        assert_eq!(parse_level(" DEBUG "), Some(LevelFilter::Debug));
        assert_eq!(parse_level("off"), Some(LevelFilter::Off));
        assert_eq!(parse_level("loud"), None);
    }

    #[test]
    fn log_file_names_are_timestamped() {
        let name = generate_filename_only();
        assert!(name.starts_with("vira_"));
        assert!(name.ends_with(".log"));
    }
}
