use std::path::PathBuf;

/// Errors raised outside the search itself: configuration, report export and
/// logging setup. Protocol violations are search results, not errors.
#[derive(Debug)]
pub enum CheckerError {
    /// Configuration rejected before any search runs
    InvalidConfig(String),
    /// Reading a configuration file failed
    Io { path: PathBuf, source: std::io::Error },
    /// TOML configuration could not be parsed
    Toml(toml::de::Error),
    /// Configuration could not be rendered as TOML
    TomlSerialize(toml::ser::Error),
    /// JSON trace export failed
    Json(serde_json::Error),
    /// A global tracing subscriber could not be installed
    Logging(String),
}

impl std::fmt::Display for CheckerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckerError::InvalidConfig(reason) => write!(f, "Invalid configuration: {}", reason),
            CheckerError::Io { path, source } => {
                write!(f, "Failed to read config file '{}': {}", path.display(), source)
            }
            CheckerError::Toml(e) => write!(f, "TOML parse error: {}", e),
            CheckerError::TomlSerialize(e) => write!(f, "TOML serialization error: {}", e),
            CheckerError::Json(e) => write!(f, "JSON error: {}", e),
            CheckerError::Logging(reason) => write!(f, "Logging setup failed: {}", reason),
        }
    }
}

impl std::error::Error for CheckerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CheckerError::Io { source, .. } => Some(source),
            CheckerError::Toml(e) => Some(e),
            CheckerError::TomlSerialize(e) => Some(e),
            CheckerError::Json(e) => Some(e),
            CheckerError::InvalidConfig(_) | CheckerError::Logging(_) => None,
        }
    }
}

impl From<toml::de::Error> for CheckerError {
    fn from(e: toml::de::Error) -> Self {
        CheckerError::Toml(e)
    }
}

impl From<toml::ser::Error> for CheckerError {
    fn from(e: toml::ser::Error) -> Self {
        CheckerError::TomlSerialize(e)
    }
}

impl From<serde_json::Error> for CheckerError {
    fn from(e: serde_json::Error) -> Self {
        CheckerError::Json(e)
    }
}
