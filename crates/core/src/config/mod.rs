// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Layered client settings.
//!
//! Precedence, lowest first: built-in defaults, the global file, the user
//! file, local `.twr.toml` files from the filesystem root down to the
//! working directory, `TWR_*` environment variables, then runtime
//! overrides from the command line.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use crate::model::parse_bool;

/// Name of user and local settings files
pub const FILE_NAME: &str = ".twr.toml";

/// Prefix of environment variables that override settings
pub const ENV_PREFIX: &str = "TWR_";

const GLOBAL_PATH: &str = "/etc/twr/twr.toml";

/// Setting keys accepted in files, the environment and `twr config`
pub const KEYS: &[&str] = &[
    "host",
    "username",
    "password",
    "oauth_token",
    "verify_ssl",
    "format",
    "verbose",
    "color",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("could not serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("could not access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown setting `{0}`; expected one of: {keys}", keys = KEYS.join(", "))]
    UnknownKey(String),

    #[error("invalid value {value:?} for `{key}`")]
    InvalidValue { key: String, value: String },

    #[error("no realm `{0}` is configured")]
    UnknownRealm(String),

    #[error("could not determine the home directory")]
    NoHome,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
    Yaml,
    /// Only the primary key of the result
    Id,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "human" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            "id" => Ok(OutputFormat::Id),
            _ => Err(ConfigError::InvalidValue {
                key: "format".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Human => "human",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Id => "id",
        };
        f.write_str(name)
    }
}

/// Server credentials for one alert realm
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Realm {
    pub host: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub oauth_token: Option<String>,
    pub verify_ssl: Option<bool>,
}

/// One source of settings; unset keys fall through to lower layers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsLayer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oauth_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verify_ssl: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub realms: BTreeMap<String, Realm>,
}

impl SettingsLayer {
    /// Read a settings file; a file that does not exist is an empty layer
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Layer from `TWR_<KEY>` variables; other variables are ignored
    pub fn from_env<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut layer = Self::default();
        for (name, value) in vars {
            let Some(key) = name.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let key = key.to_ascii_lowercase();
            if KEYS.contains(&key.as_str()) {
                layer.set(&key, &value)?;
            }
        }
        Ok(layer)
    }

    /// Set `key` from its text form
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let flag = || {
            parse_bool(value).ok_or_else(|| ConfigError::InvalidValue {
                key: key.to_string(),
                value: value.to_string(),
            })
        };
        match key {
            "host" => self.host = Some(value.to_string()),
            "username" => self.username = Some(value.to_string()),
            "password" => self.password = Some(value.to_string()),
            "oauth_token" => self.oauth_token = Some(value.to_string()),
            "verify_ssl" => self.verify_ssl = Some(flag()?),
            "format" => self.format = Some(value.parse()?),
            "verbose" => self.verbose = Some(flag()?),
            "color" => self.color = Some(flag()?),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    pub fn unset(&mut self, key: &str) -> Result<(), ConfigError> {
        match key {
            "host" => self.host = None,
            "username" => self.username = None,
            "password" => self.password = None,
            "oauth_token" => self.oauth_token = None,
            "verify_ssl" => self.verify_ssl = None,
            "format" => self.format = None,
            "verbose" => self.verbose = None,
            "color" => self.color = None,
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

/// Effective settings after every layer is applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub host: String,
    pub username: String,
    pub password: String,
    pub oauth_token: Option<String>,
    pub verify_ssl: bool,
    pub format: OutputFormat,
    pub verbose: bool,
    pub color: bool,
    pub realms: BTreeMap<String, Realm>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            username: String::new(),
            password: String::new(),
            oauth_token: None,
            verify_ssl: true,
            format: OutputFormat::Human,
            verbose: false,
            color: true,
            realms: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Defaults, every settings file visible from `cwd`, then the
    /// process environment
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        Self::load_from(&file_paths(cwd), std::env::vars())
    }

    /// Defaults, then `paths` in order, then `env`
    pub fn load_from<I>(paths: &[PathBuf], env: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut settings = Self::default();
        for path in paths {
            let layer = SettingsLayer::from_file(path)?;
            tracing::debug!(path = %path.display(), "applying settings file");
            settings.apply(&layer);
        }
        settings.apply(&SettingsLayer::from_env(env)?);
        Ok(settings)
    }

    /// Apply the keys `layer` sets; realms merge by name
    pub fn apply(&mut self, layer: &SettingsLayer) {
        if let Some(host) = &layer.host {
            self.host = host.clone();
        }
        if let Some(username) = &layer.username {
            self.username = username.clone();
        }
        if let Some(password) = &layer.password {
            self.password = password.clone();
        }
        if let Some(token) = &layer.oauth_token {
            self.oauth_token = Some(token.clone());
        }
        if let Some(verify) = layer.verify_ssl {
            self.verify_ssl = verify;
        }
        if let Some(format) = layer.format {
            self.format = format;
        }
        if let Some(verbose) = layer.verbose {
            self.verbose = verbose;
        }
        if let Some(color) = layer.color {
            self.color = color;
        }
        for (name, realm) in &layer.realms {
            self.realms.insert(name.clone(), realm.clone());
        }
    }

    /// Copy of these settings with runtime overrides applied
    pub fn with_overrides(&self, overrides: &SettingsLayer) -> Self {
        let mut settings = self.clone();
        settings.apply(overrides);
        settings
    }

    /// Settings for talking to the server of an alert realm
    pub fn for_realm(&self, name: &str) -> Result<Self, ConfigError> {
        let realm = self
            .realms
            .get(name)
            .ok_or_else(|| ConfigError::UnknownRealm(name.to_string()))?;
        Ok(self.with_overrides(&SettingsLayer {
            host: realm.host.clone(),
            username: realm.username.clone(),
            password: realm.password.clone(),
            oauth_token: realm.oauth_token.clone(),
            verify_ssl: realm.verify_ssl,
            ..SettingsLayer::default()
        }))
    }

    /// Text form of one key, for display
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        Ok(match key {
            "host" => self.host.clone(),
            "username" => self.username.clone(),
            "password" => self.password.clone(),
            "oauth_token" => self.oauth_token.clone().unwrap_or_default(),
            "verify_ssl" => self.verify_ssl.to_string(),
            "format" => self.format.to_string(),
            "verbose" => self.verbose.to_string(),
            "color" => self.color.to_string(),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        })
    }
}

/// Which settings file `twr config` writes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Scope {
    #[default]
    User,
    /// `.twr.toml` in the working directory
    Local,
    Global,
}

impl FromStr for Scope {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Scope::User),
            "local" => Ok(Scope::Local),
            "global" => Ok(Scope::Global),
            other => Err(ConfigError::InvalidValue {
                key: "scope".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

impl Scope {
    pub fn path(self, cwd: &Path) -> Result<PathBuf, ConfigError> {
        match self {
            Scope::User => user_path().ok_or(ConfigError::NoHome),
            Scope::Local => Ok(cwd.join(FILE_NAME)),
            Scope::Global => Ok(PathBuf::from(GLOBAL_PATH)),
        }
    }
}

fn user_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(FILE_NAME))
}

/// Settings files in application order: global, user, then local files
/// from the outermost directory to `cwd`
pub fn file_paths(cwd: &Path) -> Vec<PathBuf> {
    let user = user_path();
    let mut locals: Vec<PathBuf> = cwd
        .ancestors()
        .map(|dir| dir.join(FILE_NAME))
        .filter(|path| path.is_file() && Some(path) != user.as_ref())
        .collect();
    locals.reverse();

    let mut paths = vec![PathBuf::from(GLOBAL_PATH)];
    paths.extend(user);
    paths.extend(locals);
    paths
}

/// Set (or with `None`, remove) one key in the settings file at `path`
pub fn write_key(path: &Path, key: &str, value: Option<&str>) -> Result<(), ConfigError> {
    let mut layer = SettingsLayer::from_file(path)?;
    match value {
        Some(value) => layer.set(key, value)?,
        None => layer.unset(key)?,
    }
    let content = toml::to_string_pretty(&layer)?;
    let io = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io)?;
    }
    std::fs::write(path, content).map_err(io)
}

#[cfg(test)]
mod tests;
