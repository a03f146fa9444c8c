use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use toml_edit::DocumentMut;

use crate::model::config::AppConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("unknown config key `{0}` (expected api.base_url, api.timeout_secs, ui.show_key_hints, ui.colors.<name>, log.level or log.dir)")]
    UnknownKey(String),
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Config file path, respecting XDG_CONFIG_HOME
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .ok()
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| home_dir().join(".config"));
    config_dir.join("phaseboard").join("config.toml")
}

pub(crate) fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

/// Read the config, returning both the parsed config and the raw document
/// for formatting-preserving edits. A missing file reads as defaults.
pub fn read_config_from(path: &Path) -> Result<(AppConfig, DocumentMut), ConfigError> {
    if !path.exists() {
        return Ok((AppConfig::default(), DocumentMut::new()));
    }
    let text = fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let parse_error = |message: String| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    };
    let config: AppConfig = toml::from_str(&text).map_err(|e| parse_error(e.to_string()))?;
    let doc: DocumentMut = text.parse().map_err(|e: toml_edit::TomlError| parse_error(e.to_string()))?;
    Ok((config, doc))
}

pub fn read_config() -> Result<(AppConfig, DocumentMut), ConfigError> {
    read_config_from(&config_path())
}

/// Write the document back through a temp file in the same directory, so a
/// crash never leaves a half-written config.
pub fn write_config_to(path: &Path, doc: &DocumentMut) -> Result<(), ConfigError> {
    let write_error = |source: std::io::Error| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).map_err(write_error)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_error)?;
    tmp.write_all(doc.to_string().as_bytes())
        .map_err(write_error)?;
    tmp.persist(path).map_err(|e| write_error(e.error))?;
    Ok(())
}

/// Set one dotted key in the document. The edited document must still parse
/// as a valid config; on error the document is left untouched.
pub fn set_value(doc: &mut DocumentMut, key: &str, raw: &str) -> Result<(), ConfigError> {
    let invalid = |message: String| ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    };
    let mut edited = doc.clone();
    match key.split('.').collect::<Vec<_>>().as_slice() {
        ["api", "base_url"] => {
            let url = raw.trim();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(invalid("expected an http:// or https:// URL".into()));
            }
            ensure_table(&mut edited, "api")["base_url"] = toml_edit::value(url);
        }
        ["api", "timeout_secs"] => {
            let secs: i64 = raw
                .trim()
                .parse()
                .map_err(|_| invalid(format!("`{raw}` is not a whole number")))?;
            if secs < 0 {
                return Err(invalid("must not be negative".into()));
            }
            ensure_table(&mut edited, "api")["timeout_secs"] = toml_edit::value(secs);
        }
        ["ui", "show_key_hints"] => {
            let flag: bool = raw
                .trim()
                .parse()
                .map_err(|_| invalid(format!("`{raw}` is not true or false")))?;
            ensure_table(&mut edited, "ui")["show_key_hints"] = toml_edit::value(flag);
        }
        ["ui", "colors", name] => {
            let ui = ensure_table(&mut edited, "ui");
            if ui.get("colors").is_none() {
                ui["colors"] = toml_edit::Item::Table(toml_edit::Table::new());
            }
            ui["colors"][*name] = toml_edit::value(raw.trim());
        }
        ["log", "level"] => {
            let level = crate::io::logging::normalize_level(raw).map_err(invalid)?;
            ensure_table(&mut edited, "log")["level"] = toml_edit::value(level);
        }
        ["log", "dir"] => {
            if !Path::new(raw.trim()).is_absolute() {
                return Err(invalid("must be an absolute path".into()));
            }
            ensure_table(&mut edited, "log")["dir"] = toml_edit::value(raw.trim());
        }
        _ => return Err(ConfigError::UnknownKey(key.to_string())),
    }
    toml::from_str::<AppConfig>(&edited.to_string()).map_err(|e| invalid(e.to_string()))?;
    *doc = edited;
    Ok(())
}

fn ensure_table<'a>(doc: &'a mut DocumentMut, name: &str) -> &'a mut toml_edit::Item {
    if !doc.contains_key(name) {
        doc[name] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    &mut doc[name]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r##"# phaseboard settings
[api]
base_url = "http://pm.internal:8080/api"  # staging

[ui.colors]
highlight = "#FB4196"
"##;

    #[test]
    fn missing_file_reads_as_defaults() {
        let tmp = TempDir::new().unwrap();
        let (config, doc) = read_config_from(&tmp.path().join("config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(doc.to_string(), "");
    }

    #[test]
    fn round_trip_preserves_comments() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, SAMPLE).unwrap();

        let (config, doc) = read_config_from(&path).unwrap();
        assert_eq!(config.api.base_url, "http://pm.internal:8080/api");
        write_config_to(&path, &doc).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), SAMPLE);
    }

    #[test]
    fn set_value_edits_in_place() {
        let mut doc: DocumentMut = SAMPLE.parse().unwrap();
        set_value(&mut doc, "api.timeout_secs", "5").unwrap();
        set_value(&mut doc, "log.level", "WARNING").unwrap();
        set_value(&mut doc, "ui.colors.border", "#333333").unwrap();
        let text = doc.to_string();
        assert!(text.contains("# staging"));
        let config: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.log.level.as_deref(), Some("warn"));
        assert_eq!(config.ui.colors.get("border").unwrap(), "#333333");
        assert_eq!(config.ui.colors.get("highlight").unwrap(), "#FB4196");
    }

    #[test]
    fn color_override_creates_missing_tables() {
        let mut doc: DocumentMut = "[api]\ntimeout_secs = 5\n".parse().unwrap();
        set_value(&mut doc, "ui.colors.border", "#333333").unwrap();
        set_value(&mut doc, "ui.colors.red", "#FF0000").unwrap();
        let config: AppConfig = toml::from_str(&doc.to_string()).unwrap();
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.ui.colors.get("border").unwrap(), "#333333");
        assert_eq!(config.ui.colors.get("red").unwrap(), "#FF0000");
    }

    #[test]
    fn rejected_values_leave_document_alone() {
        let mut doc: DocumentMut = SAMPLE.parse().unwrap();
        assert!(matches!(
            set_value(&mut doc, "api.timeout_secs", "soon"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            set_value(&mut doc, "api.base_url", "localhost"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            set_value(&mut doc, "api.retries", "3"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert_eq!(doc.to_string(), SAMPLE);
    }

    #[test]
    fn write_creates_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("config.toml");
        let mut doc = DocumentMut::new();
        set_value(&mut doc, "api.base_url", "https://pm.example.com/api").unwrap();
        write_config_to(&path, &doc).unwrap();
        let (config, _) = read_config_from(&path).unwrap();
        assert_eq!(config.api.base_url, "https://pm.example.com/api");
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[api\nbase_url = 1").unwrap();
        assert!(matches!(
            read_config_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
