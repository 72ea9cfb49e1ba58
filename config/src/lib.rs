//! Configuration loading for DEEP hosts.
//!
//! ```toml
//! [session]
//! skip_tutorial = false
//! debug = false
//! shuffle_time_options = true
//!
//! [output]
//! record_dir = "${HOME}/deep-records"
//! ```
//!
//! Precedence, lowest first: defaults, `~/.deep/config.toml`, environment
//! (`DEEP_SKIP_TUTORIAL`, `DEEP_DEBUG`), then whatever the host applies on top.

use std::path::{Path, PathBuf};
use std::{env, fs};

use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_PATH_ENV: &str = "DEEP_CONFIG";
pub const SKIP_TUTORIAL_ENV: &str = "DEEP_SKIP_TUTORIAL";
pub const DEBUG_ENV: &str = "DEEP_DEBUG";

// Default value function for serde (bool::default() is false, so only true needs a fn)
const fn default_true() -> bool {
    true
}

#[derive(Debug, Default, Deserialize)]
pub struct DeepConfig {
    pub session: Option<SessionConfig>,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

/// `[session]` table.
#[derive(Debug, Deserialize)]
pub struct SessionConfig {
    /// Go straight to the elicitation without the warm-up quiz.
    #[serde(default)]
    pub skip_tutorial: bool,
    /// Verbose logging and bracket output after each step.
    #[serde(default)]
    pub debug: bool,
    /// Randomize on-screen order of the two options in TIME sessions. Default: true.
    #[serde(default = "default_true")]
    pub shuffle_time_options: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            skip_tutorial: false,
            debug: false,
            shuffle_time_options: true,
        }
    }
}

/// `[output]` table.
#[derive(Debug, Default, Deserialize)]
pub struct OutputConfig {
    /// Directory for record files. Supports `${VAR}` expansion.
    pub record_dir: Option<String>,
}

impl DeepConfig {
    /// Load from the default location. `Ok(None)` when no file exists.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    /// Configured record directory with environment variables expanded.
    #[must_use]
    pub fn record_dir(&self) -> Option<PathBuf> {
        let raw = self.output.as_ref()?.record_dir.as_deref()?;
        let expanded = expand_env_vars(raw);
        let trimmed = expanded.trim();
        (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
    }
}

/// `~/.deep/config.toml`, or the file named by `DEEP_CONFIG`.
pub fn config_path() -> Option<PathBuf> {
    if let Ok(explicit) = env::var(CONFIG_PATH_ENV)
        && !explicit.trim().is_empty()
    {
        return Some(PathBuf::from(explicit));
    }
    dirs::home_dir().map(|home| home.join(".deep").join("config.toml"))
}

pub fn expand_env_vars(value: &str) -> String {
    expand_vars_with(value, |name| env::var(name).ok())
}

/// Replace `${NAME}` with `lookup(NAME)`; unknown names become empty and an
/// unclosed `${` is kept verbatim.
pub fn expand_vars_with<F>(value: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let Some(end_rel) = rest[start + 2..].find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let name = &rest[start + 2..start + 2 + end_rel];
        if !name.is_empty() {
            out.push_str(&lookup(name).unwrap_or_default());
        }
        rest = &rest[start + 2 + end_rel + 1..];
    }

    out.push_str(rest);
    out
}

/// Effective options for one host session, passed in explicitly at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub skip_tutorial: bool,
    pub debug: bool,
    pub shuffle_time_options: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        let session = SessionConfig::default();
        Self {
            skip_tutorial: session.skip_tutorial,
            debug: session.debug,
            shuffle_time_options: session.shuffle_time_options,
        }
    }
}

impl SessionOptions {
    /// Merge the config file with process environment overrides.
    #[must_use]
    pub fn from_config_and_env(config: Option<&DeepConfig>) -> Self {
        Self::resolve(config, |name| env::var(name).ok())
    }

    #[must_use]
    pub fn resolve<F>(config: Option<&DeepConfig>, env_lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = config
            .and_then(|config| config.session.as_ref())
            .map_or_else(Self::default, |session| Self {
                skip_tutorial: session.skip_tutorial,
                debug: session.debug,
                shuffle_time_options: session.shuffle_time_options,
            });

        if let Some(flag) = env_flag(&env_lookup, SKIP_TUTORIAL_ENV) {
            options.skip_tutorial = flag;
        }
        if let Some(flag) = env_flag(&env_lookup, DEBUG_ENV) {
            options.debug = flag;
        }
        options
    }
}

fn env_flag<F>(env_lookup: &F, name: &str) -> Option<bool>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = env_lookup(name)?;
    let parsed = parse_flag(&raw);
    if parsed.is_none() {
        tracing::warn!("Ignoring {name}={raw:?}: expected 1/0, true/false, yes/no, or on/off");
    }
    parsed
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn expand_vars_replaces_known_names() {
        let lookup = |name: &str| (name == "HOME").then(|| "/home/subject".to_string());
        assert_eq!(
            expand_vars_with("${HOME}/deep-records", lookup),
            "/home/subject/deep-records"
        );
    }

    #[test]
    fn expand_vars_missing_var_becomes_empty() {
        assert_eq!(expand_vars_with("before ${MISSING} after", no_env), "before  after");
    }

    #[test]
    fn expand_vars_unclosed_brace_preserved() {
        assert_eq!(expand_vars_with("test ${UNCLOSED", no_env), "test ${UNCLOSED");
    }

    #[test]
    fn expand_vars_adjacent_and_empty_names() {
        let lookup = |name: &str| Some(name.to_lowercase());
        assert_eq!(expand_vars_with("${A}${B}", lookup), "ab");
        assert_eq!(expand_vars_with("x ${} y", lookup), "x  y");
    }

    #[test]
    fn load_from_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let config = DeepConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert!(config.is_none());
    }

    #[test]
    fn load_from_parses_tables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[session]\nskip_tutorial = true\n\n[output]\nrecord_dir = \"/tmp/records\"\n",
        )
        .unwrap();

        let config = DeepConfig::load_from(&path).unwrap().unwrap();
        let session = config.session.as_ref().unwrap();
        assert!(session.skip_tutorial);
        assert!(!session.debug);
        assert!(session.shuffle_time_options);
        assert_eq!(config.record_dir(), Some(PathBuf::from("/tmp/records")));
    }

    #[test]
    fn load_from_reports_parse_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[session\nskip_tutorial = yes").unwrap();

        let err = DeepConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert_eq!(err.path(), &path);
    }

    #[test]
    fn options_default_without_config() {
        let options = SessionOptions::resolve(None, no_env);
        assert_eq!(options, SessionOptions::default());
        assert!(options.shuffle_time_options);
        assert!(!options.skip_tutorial);
    }

    #[test]
    fn environment_overrides_config() {
        let config: DeepConfig = toml::from_str("[session]\nskip_tutorial = true\n").unwrap();
        let env = |name: &str| match name {
            SKIP_TUTORIAL_ENV => Some("off".to_string()),
            DEBUG_ENV => Some("YES".to_string()),
            _ => None,
        };
        let options = SessionOptions::resolve(Some(&config), env);
        assert!(!options.skip_tutorial);
        assert!(options.debug);
    }

    #[test]
    fn unparseable_environment_flag_is_ignored() {
        let config: DeepConfig = toml::from_str("[session]\ndebug = true\n").unwrap();
        let env = |name: &str| (name == DEBUG_ENV).then(|| "maybe".to_string());
        assert!(SessionOptions::resolve(Some(&config), env).debug);
    }

    #[test]
    fn blank_record_dir_is_none() {
        let config: DeepConfig = toml::from_str("[output]\nrecord_dir = \"  \"\n").unwrap();
        assert!(config.record_dir().is_none());
    }
}
