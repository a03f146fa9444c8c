//! File logging.
//!
//! The TUI owns the terminal, so log records only ever go to a rotating file
//! under the state directory. Initialization happens once per process; a
//! second call with the same settings is a no-op.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;

use crate::model::config::LogConfig;

const LOG_FILE_BASENAME: &str = "phaseboard";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;
pub const DEFAULT_LEVEL: &str = "info";

struct LoggingState {
    level: &'static str,
    dir: PathBuf,
    handle: LoggerHandle,
}

static LOGGING: OnceLock<Mutex<Option<LoggingState>>> = OnceLock::new();

/// Accepts the usual spellings of a log level.
pub fn normalize_level(level: &str) -> Result<&'static str, String> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        "off" => Ok("off"),
        other => Err(format!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error|off"
        )),
    }
}

/// `$XDG_STATE_HOME/phaseboard`, falling back to `~/.local/state/phaseboard`
pub fn default_log_dir() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .ok()
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| super::config_io::home_dir().join(".local").join("state"))
        .join("phaseboard")
}

/// Resolve the level and directory a [`LogConfig`] asks for.
pub fn resolve(config: &LogConfig) -> Result<(&'static str, PathBuf), String> {
    let level = normalize_level(config.level.as_deref().unwrap_or(DEFAULT_LEVEL))?;
    let dir = match config.dir.as_deref().map(str::trim) {
        Some(dir) if !dir.is_empty() => {
            let path = Path::new(dir);
            if !path.is_absolute() {
                return Err(format!("log dir must be an absolute path, got `{dir}`"));
            }
            path.to_path_buf()
        }
        _ => default_log_dir(),
    };
    Ok((level, dir))
}

/// Start file logging. Never panics; errors come back as text for the
/// caller to report.
pub fn init_logging(config: &LogConfig) -> Result<(), String> {
    let (level, dir) = resolve(config)?;
    let cell = LOGGING.get_or_init(|| Mutex::new(None));
    let mut state = cell.lock().map_err(|_| "logging state poisoned".to_string())?;

    if let Some(existing) = state.as_ref() {
        if existing.dir == dir && existing.level == level {
            return Ok(());
        }
        return Err(format!(
            "logging already initialized ({} at {})",
            existing.level,
            existing.dir.display()
        ));
    }

    std::fs::create_dir_all(&dir)
        .map_err(|e| format!("failed to create log directory `{}`: {e}", dir.display()))?;
    let handle = Logger::try_with_str(level)
        .map_err(|e| format!("invalid log level `{level}`: {e}"))?
        .log_to_file(
            FileSpec::default()
                .directory(dir.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|e| format!("failed to start logger: {e}"))?;

    info!(
        "pb {} started level={} dir={}",
        env!("CARGO_PKG_VERSION"),
        level,
        dir.display()
    );
    *state = Some(LoggingState {
        level,
        dir,
        handle,
    });
    Ok(())
}

/// Write out buffered records. Call before `process::exit`, which skips
/// destructors.
pub fn flush_logging() {
    if let Some(cell) = LOGGING.get()
        && let Ok(state) = cell.lock()
        && let Some(state) = state.as_ref()
    {
        state.handle.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_spellings() {
        assert_eq!(normalize_level(" WARNING "), Ok("warn"));
        assert_eq!(normalize_level("Debug"), Ok("debug"));
        assert!(normalize_level("loud").is_err());
    }

    #[test]
    fn explicit_dir_must_be_absolute() {
        let config = LogConfig {
            level: None,
            dir: Some("logs".into()),
        };
        assert!(resolve(&config).is_err());

        let config = LogConfig {
            level: Some("error".into()),
            dir: Some("/var/tmp/pb".into()),
        };
        assert_eq!(
            resolve(&config),
            Ok(("error", PathBuf::from("/var/tmp/pb")))
        );
    }

    #[test]
    fn defaults_to_info_in_state_dir() {
        let (level, dir) = resolve(&LogConfig::default()).unwrap();
        assert_eq!(level, "info");
        assert!(dir.ends_with("phaseboard"));
    }
}
