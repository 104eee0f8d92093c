//! Layered server settings
//!
//! Loading order (later overrides earlier):
//! 1. Built-in defaults
//! 2. `settings/porkbun-domain.toml` (committed production defaults)
//! 3. `settings/local.toml` (developer overrides, not committed)
//! 4. `.env` in the working directory (never overrides variables already set)
//! 5. Environment variables `PORKBUN_DOMAIN_<FIELD>` (names are case-insensitive)

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use porkbun_domain_provider::{
    Credentials, DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES, PorkbunClient, mask_secret,
};
use serde::{Deserialize, Serialize};

/// Prefix of all environment overrides.
pub const ENV_PREFIX: &str = "PORKBUN_DOMAIN_";
/// Settings directory, relative to the working directory.
pub const SETTINGS_DIR: &str = "settings";
/// Committed settings file.
pub const BASE_FILE: &str = "porkbun-domain.toml";
/// Developer settings file.
pub const LOCAL_FILE: &str = "local.toml";

/// Dotenv file, relative to the working directory.
pub const DOTENV_FILE: &str = ".env";

const TIMEOUT_RANGE: (f64, f64) = (1.0, 120.0);
const MAX_RETRIES_LIMIT: u32 = 5;
/// Longest wait between two attempts (the client caps `Retry-After` at 30 s).
const RETRY_WAIT_ALLOWANCE_SECS: f64 = 30.0;
/// Floor of the per-tool timeout.
const MIN_TOOL_TIMEOUT_SECS: u64 = 60;
const LOG_LEVELS: &[&str] = &["TRACE", "DEBUG", "INFO", "WARNING", "WARN", "ERROR"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {key}: {value:?} ({expected})")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: String,
        max: String,
        value: String,
    },

    #[error("failed to load {path}: {source}")]
    Dotenv {
        path: PathBuf,
        #[source]
        source: dotenv::Error,
    },

    #[error("invalid settings: {0}")]
    Deserialize(#[from] toml::de::Error),
}

/// Server settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Porkbun API key.
    pub api_key: String,
    /// Porkbun secret API key.
    pub secret_key: String,
    /// Porkbun API base URL.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout: f64,
    /// Retries for transient API failures.
    pub max_retries: u32,
    /// Serve streamable HTTP instead of stdio.
    pub enable_http_transport: bool,
    pub http_host: String,
    pub http_port: u16,
    /// `TRACE`, `DEBUG`, `INFO`, `WARNING` or `ERROR`.
    pub log_level: String,
    /// Emit logs as JSON lines.
    pub log_json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            secret_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: 30.0,
            max_retries: DEFAULT_MAX_RETRIES,
            enable_http_transport: false,
            http_host: "127.0.0.1".to_string(),
            http_port: 3043,
            log_level: "INFO".to_string(),
            log_json: true,
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &mask_secret(&self.api_key))
            .field("secret_key", &"***")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("enable_http_transport", &self.enable_http_transport)
            .field("http_host", &self.http_host)
            .field("http_port", &self.http_port)
            .field("log_level", &self.log_level)
            .field("log_json", &self.log_json)
            .finish()
    }
}

/// Value kind of a settings field, used to type environment overrides.
#[derive(Clone, Copy)]
enum Kind {
    Str,
    Float,
    Int,
    Bool,
}

const FIELDS: &[(&str, Kind)] = &[
    ("api_key", Kind::Str),
    ("secret_key", Kind::Str),
    ("base_url", Kind::Str),
    ("timeout", Kind::Float),
    ("max_retries", Kind::Int),
    ("enable_http_transport", Kind::Bool),
    ("http_host", Kind::Str),
    ("http_port", Kind::Int),
    ("log_level", Kind::Str),
    ("log_json", Kind::Bool),
];

impl Settings {
    /// Load settings from the working directory and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        load_dotenv(Path::new(DOTENV_FILE))?;
        Self::load_from(Path::new("."), std::env::vars())
    }

    /// Load settings from `root/settings/*.toml` and the given environment.
    pub fn load_from(
        root: &Path,
        env: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Self, ConfigError> {
        let mut table = toml::Table::new();

        let dir = root.join(SETTINGS_DIR);
        for name in [BASE_FILE, LOCAL_FILE] {
            if let Some(layer) = read_layer(&dir.join(name))? {
                table.extend(layer);
            }
        }

        table.extend(env_layer(env)?);
        check_integer_ranges(&table)?;

        let settings: Self = toml::Value::Table(table).try_into()?;
        settings.validated()
    }

    /// Check ranges and normalize the base URL and log level.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        if !(TIMEOUT_RANGE.0..=TIMEOUT_RANGE.1).contains(&self.timeout) {
            return Err(ConfigError::OutOfRange {
                field: "timeout",
                min: TIMEOUT_RANGE.0.to_string(),
                max: TIMEOUT_RANGE.1.to_string(),
                value: self.timeout.to_string(),
            });
        }
        if self.max_retries > MAX_RETRIES_LIMIT {
            return Err(ConfigError::OutOfRange {
                field: "max_retries",
                min: "0".to_string(),
                max: MAX_RETRIES_LIMIT.to_string(),
                value: self.max_retries.to_string(),
            });
        }
        if self.http_port == 0 {
            return Err(ConfigError::OutOfRange {
                field: "http_port",
                min: "1".to_string(),
                max: u16::MAX.to_string(),
                value: "0".to_string(),
            });
        }

        let level = self.log_level.trim().to_uppercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "log_level".to_string(),
                value: self.log_level,
                expected: "one of TRACE, DEBUG, INFO, WARNING, ERROR",
            });
        }
        self.log_level = level;

        let base_url = self.base_url.trim().trim_end_matches('/');
        self.base_url = if base_url.is_empty() {
            DEFAULT_BASE_URL.to_string()
        } else {
            base_url.to_string()
        };

        Ok(self)
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials().is_configured()
    }

    pub fn masked_api_key(&self) -> String {
        mask_secret(&self.api_key)
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.api_key.clone(), self.secret_key.clone())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout)
    }

    /// Time allowed for one tool call: every attempt may use the full request
    /// timeout, and every retry may wait up to the `Retry-After` cap first.
    pub fn tool_timeout(&self) -> Duration {
        let attempts = f64::from(self.max_retries) + 1.0;
        let waits = f64::from(self.max_retries) * RETRY_WAIT_ALLOWANCE_SECS;
        Duration::from_secs_f64(self.timeout * attempts + waits)
            .max(Duration::from_secs(MIN_TOOL_TIMEOUT_SECS))
    }

    /// Copy with both secrets masked, for display.
    pub fn redacted(&self) -> Self {
        Self {
            api_key: self.masked_api_key(),
            secret_key: "***".to_string(),
            ..self.clone()
        }
    }

    /// Build the Porkbun client described by these settings.
    pub fn build_client(&self) -> porkbun_domain_provider::Result<PorkbunClient> {
        PorkbunClient::builder(self.credentials())
            .base_url(self.base_url.as_str())
            .timeout(self.timeout())
            .max_retries(self.max_retries)
            .build()
    }
}

/// Export `.env` entries into the process environment, never overriding
/// variables that are already set. A missing file is not an error.
fn load_dotenv(path: &Path) -> Result<(), ConfigError> {
    match dotenv::from_path(path) {
        Ok(()) => Ok(()),
        Err(dotenv::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(ConfigError::Dotenv {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Range-check integer fields before they are narrowed to their Rust types.
fn check_integer_ranges(table: &toml::Table) -> Result<(), ConfigError> {
    let ranges = [
        ("max_retries", 0, i64::from(MAX_RETRIES_LIMIT)),
        ("http_port", 1, i64::from(u16::MAX)),
    ];

    for (field, min, max) in ranges {
        let Some(toml::Value::Integer(value)) = table.get(field) else {
            continue;
        };
        if !(min..=max).contains(value) {
            return Err(ConfigError::OutOfRange {
                field,
                min: min.to_string(),
                max: max.to_string(),
                value: value.to_string(),
            });
        }
    }
    Ok(())
}

fn read_layer(path: &Path) -> Result<Option<toml::Table>, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    toml::from_str(&content)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

fn env_layer(env: impl IntoIterator<Item = (String, String)>) -> Result<toml::Table, ConfigError> {
    let mut table = toml::Table::new();

    for (key, raw) in env {
        let upper = key.to_uppercase();
        let Some(field) = upper.strip_prefix(ENV_PREFIX) else {
            continue;
        };
        let field = field.to_lowercase();
        let Some((name, kind)) = FIELDS.iter().find(|(name, _)| *name == field) else {
            continue;
        };

        let value = parse_env_value(&key, &raw, *kind)?;
        table.insert((*name).to_string(), value);
    }

    Ok(table)
}

fn parse_env_value(key: &str, raw: &str, kind: Kind) -> Result<toml::Value, ConfigError> {
    let invalid = |expected| ConfigError::InvalidValue {
        key: key.to_string(),
        value: raw.to_string(),
        expected,
    };
    let trimmed = raw.trim();

    match kind {
        Kind::Str => Ok(toml::Value::String(raw.to_string())),
        Kind::Float => trimmed
            .parse::<f64>()
            .map(toml::Value::Float)
            .map_err(|_| invalid("a number")),
        Kind::Int => trimmed
            .parse::<i64>()
            .map(toml::Value::Integer)
            .map_err(|_| invalid("an integer")),
        Kind::Bool => match trimmed.to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(toml::Value::Boolean(true)),
            "0" | "false" | "no" | "off" => Ok(toml::Value::Boolean(false)),
            _ => Err(invalid("a boolean")),
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn write_settings(root: &Path, name: &str, content: &str) {
        let dir = root.join(SETTINGS_DIR);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn defaults_without_files_or_env() {
        let root = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(root.path(), Vec::new()).unwrap();

        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.http_port, 3043);
        assert_eq!(settings.max_retries, 3);
        assert!(settings.log_json);
        assert!(!settings.has_credentials());
    }

    #[test]
    fn local_file_overrides_base_file() {
        let root = tempfile::tempdir().unwrap();
        write_settings(root.path(), BASE_FILE, "timeout = 10.0\nhttp_port = 4000\n");
        write_settings(root.path(), LOCAL_FILE, "http_port = 5000\n");

        let settings = Settings::load_from(root.path(), Vec::new()).unwrap();

        assert!((settings.timeout - 10.0).abs() < f64::EPSILON);
        assert_eq!(settings.http_port, 5000);
    }

    #[test]
    fn env_overrides_files_case_insensitively() {
        let root = tempfile::tempdir().unwrap();
        write_settings(root.path(), LOCAL_FILE, "api_key = \"pk1_file\"\n");

        let settings = Settings::load_from(
            root.path(),
            env(&[
                ("porkbun_domain_api_key", "pk1_env00001234"),
                ("PORKBUN_DOMAIN_SECRET_KEY", "sk1_env"),
                ("PORKBUN_DOMAIN_LOG_JSON", "false"),
                ("PORKBUN_DOMAIN_MAX_RETRIES", "5"),
                ("UNRELATED", "x"),
                ("PORKBUN_DOMAIN_UNKNOWN_FIELD", "ignored"),
            ]),
        )
        .unwrap();

        assert_eq!(settings.api_key, "pk1_env00001234");
        assert!(settings.has_credentials());
        assert!(!settings.log_json);
        assert_eq!(settings.max_retries, 5);
        assert_eq!(settings.masked_api_key(), "...1234");
    }

    #[test]
    fn base_url_is_normalized() {
        let root = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(
            root.path(),
            env(&[("PORKBUN_DOMAIN_BASE_URL", "https://api.porkbun.com/api/json/v3/")]),
        )
        .unwrap();
        assert_eq!(settings.base_url, "https://api.porkbun.com/api/json/v3");

        let settings =
            Settings::load_from(root.path(), env(&[("PORKBUN_DOMAIN_BASE_URL", "")])).unwrap();
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn timeout_out_of_range_is_rejected() {
        let root = tempfile::tempdir().unwrap();
        let err =
            Settings::load_from(root.path(), env(&[("PORKBUN_DOMAIN_TIMEOUT", "0.5")])).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { field: "timeout", .. }));

        let err =
            Settings::load_from(root.path(), env(&[("PORKBUN_DOMAIN_TIMEOUT", "121")])).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { field: "timeout", .. }));
    }

    #[test]
    fn max_retries_above_limit_is_rejected() {
        let root = tempfile::tempdir().unwrap();
        let err = Settings::load_from(root.path(), env(&[("PORKBUN_DOMAIN_MAX_RETRIES", "6")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                field: "max_retries",
                ..
            }
        ));
    }

    #[test]
    fn port_above_u16_is_out_of_range() {
        let root = tempfile::tempdir().unwrap();
        let err = Settings::load_from(
            root.path(),
            env(&[("PORKBUN_DOMAIN_HTTP_PORT", "70000")]),
        )
        .unwrap_err();
        match err {
            ConfigError::OutOfRange { field, value, .. } => {
                assert_eq!(field, "http_port");
                assert_eq!(value, "70000");
            }
            other => panic!("unexpected error: {other}"),
        }

        write_settings(root.path(), LOCAL_FILE, "http_port = 70000\n");
        let err = Settings::load_from(root.path(), Vec::new()).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { field: "http_port", .. }));
    }

    #[test]
    fn negative_max_retries_is_out_of_range() {
        let root = tempfile::tempdir().unwrap();
        let err = Settings::load_from(root.path(), env(&[("PORKBUN_DOMAIN_MAX_RETRIES", "-1")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                field: "max_retries",
                ..
            }
        ));
    }

    #[test]
    fn port_zero_is_rejected() {
        let root = tempfile::tempdir().unwrap();
        let err = Settings::load_from(root.path(), env(&[("PORKBUN_DOMAIN_HTTP_PORT", "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { field: "http_port", .. }));
    }

    #[test]
    fn unparsable_env_value_is_rejected() {
        let root = tempfile::tempdir().unwrap();
        let err = Settings::load_from(root.path(), env(&[("PORKBUN_DOMAIN_HTTP_PORT", "web")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = Settings::load_from(
            root.path(),
            env(&[("PORKBUN_DOMAIN_ENABLE_HTTP_TRANSPORT", "sometimes")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn invalid_toml_reports_path() {
        let root = tempfile::tempdir().unwrap();
        write_settings(root.path(), BASE_FILE, "timeout = = 3");

        let err = Settings::load_from(root.path(), Vec::new()).unwrap_err();

        match err {
            ConfigError::Parse { path, .. } => assert!(path.ends_with(BASE_FILE)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn log_level_is_validated_and_uppercased() {
        let root = tempfile::tempdir().unwrap();
        let settings =
            Settings::load_from(root.path(), env(&[("PORKBUN_DOMAIN_LOG_LEVEL", "debug")])).unwrap();
        assert_eq!(settings.log_level, "DEBUG");

        let err = Settings::load_from(root.path(), env(&[("PORKBUN_DOMAIN_LOG_LEVEL", "loud")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn debug_and_redacted_hide_secrets() {
        let settings = Settings {
            api_key: "pk1_abcdefgh9876".to_string(),
            secret_key: "sk1_verysecret".to_string(),
            ..Settings::default()
        };

        let debug = format!("{settings:?}");
        assert!(!debug.contains("verysecret"));
        assert!(debug.contains("...9876"));

        let redacted = settings.redacted();
        assert_eq!(redacted.api_key, "...9876");
        assert_eq!(redacted.secret_key, "***");
    }

    #[test]
    fn tool_timeout_covers_every_attempt() {
        let settings = Settings {
            timeout: 120.0,
            max_retries: 5,
            ..Settings::default()
        };
        // 6 attempts of 120 s plus 5 waits of 30 s
        assert_eq!(settings.tool_timeout(), Duration::from_secs(870));

        let settings = Settings {
            timeout: 5.0,
            max_retries: 0,
            ..Settings::default()
        };
        assert_eq!(settings.tool_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn missing_dotenv_is_fine() {
        let root = tempfile::tempdir().unwrap();
        assert!(load_dotenv(&root.path().join(DOTENV_FILE)).is_ok());
    }

    #[test]
    fn dotenv_sets_missing_variables_only() {
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join(DOTENV_FILE);
        std::fs::write(
            &path,
            "CARGO_MANIFEST_DIR=/from/dotenv\nPORKBUN_DOTENV_TEST_LOADED=yes\n",
        )
        .unwrap();

        load_dotenv(&path).unwrap();

        assert_eq!(
            std::env::var("PORKBUN_DOTENV_TEST_LOADED").as_deref(),
            Ok("yes")
        );
        assert_eq!(
            std::env::var("CARGO_MANIFEST_DIR").as_deref(),
            Ok(env!("CARGO_MANIFEST_DIR"))
        );
    }

    #[test]
    fn malformed_dotenv_is_reported() {
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join(DOTENV_FILE);
        std::fs::write(
            &path,
            "!!! not a valid line\nPORKBUN_DOTENV_TEST_AFTER_BAD_LINE=pk1_after\n",
        )
        .unwrap();

        let err = load_dotenv(&path).unwrap_err();

        match err {
            ConfigError::Dotenv { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn client_is_built_from_settings() {
        let settings = Settings::default();
        assert!(settings.build_client().is_ok());
    }
}
