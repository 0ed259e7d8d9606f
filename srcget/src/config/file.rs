//! Loading, saving and resolving the configuration file.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::Ini;
use thiserror::Error;
use tracing::debug;

use crate::manager::{ManagerConfig, DEFAULT_REPOS_DIR};

/// Overrides `[paths] root_dir`.
pub const ROOT_ENV: &str = "SRCGET_ROOT";

/// Overrides `[paths] repos_dir`.
pub const REPOS_ENV: &str = "SRCGET_REPOS";

/// Fallback install root when no root is configured.
pub const GOPATH_ENV: &str = "GOPATH";

const CONFIG_DIR_NAME: &str = ".srcget";
const CONFIG_FILE_NAME: &str = "config.ini";

/// Errors from reading, writing or interpreting the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    #[error("failed to write config file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("unknown configuration key '{0}'")]
    UnknownKey(String),

    #[error("no install root configured; set GOPATH, SRCGET_ROOT or paths.root_dir")]
    MissingRoot,
}

/// `[paths]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathsSettings {
    pub root_dir: Option<PathBuf>,
    pub repos_dir: Option<PathBuf>,
}

/// `[download]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadSettings {
    /// Request timeout in seconds; 0 means none.
    pub timeout_secs: u64,
    pub user_agent: Option<String>,
}

/// Parsed contents of `config.ini`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub paths: PathsSettings,
    pub download: DownloadSettings,
}

/// Directory holding the configuration file (`~/.srcget`).
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

/// Full path of the configuration file.
pub fn config_file_path() -> PathBuf {
    config_dir().join(CONFIG_FILE_NAME)
}

impl ConfigFile {
    /// Load from the default location. A missing file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load from `path`. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::from_ini(&ini)
    }

    /// Parse configuration from ini text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(text).map_err(|e| ConfigError::Read {
            path: PathBuf::from("<string>"),
            source: ini::Error::Parse(e),
        })?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let get = |section: &str, key: &str| {
            ini.get_from(Some(section), key)
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        let timeout_secs = match get("download", "timeout_secs") {
            Some(raw) => parse_timeout(raw)?,
            None => 0,
        };

        Ok(Self {
            paths: PathsSettings {
                root_dir: get("paths", "root_dir").map(PathBuf::from),
                repos_dir: get("paths", "repos_dir").map(PathBuf::from),
            },
            download: DownloadSettings {
                timeout_secs,
                user_agent: get("download", "user_agent").map(str::to_string),
            },
        })
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Save to `path`, creating its parent directory.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        self.to_ini()
            .write_to_file(path)
            .map_err(|e| ConfigError::Write {
                path: path.to_path_buf(),
                source: e,
            })
    }

    fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();

        let mut paths = ini.with_section(Some("paths"));
        if let Some(root) = &self.paths.root_dir {
            paths.set("root_dir", root.to_string_lossy());
        }
        if let Some(repos) = &self.paths.repos_dir {
            paths.set("repos_dir", repos.to_string_lossy());
        }

        let mut download = ini.with_section(Some("download"));
        download.set("timeout_secs", self.download.timeout_secs.to_string());
        if let Some(agent) = &self.download.user_agent {
            download.set("user_agent", agent.as_str());
        }

        ini
    }

    /// Resolve the manager configuration against the process environment.
    pub fn to_manager_config(&self) -> Result<ManagerConfig, ConfigError> {
        self.to_manager_config_with(|name| env::var_os(name))
    }

    /// Resolve the manager configuration using `lookup` for environment values.
    ///
    /// Root precedence: `SRCGET_ROOT`, `[paths] root_dir`, first `GOPATH` entry.
    pub fn to_manager_config_with<F>(&self, lookup: F) -> Result<ManagerConfig, ConfigError>
    where
        F: Fn(&str) -> Option<std::ffi::OsString>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let root = non_empty(ROOT_ENV)
            .map(PathBuf::from)
            .or_else(|| self.paths.root_dir.clone())
            .or_else(|| non_empty(GOPATH_ENV).and_then(|v| env::split_paths(&v).next()))
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(ConfigError::MissingRoot)?;

        let repos = non_empty(REPOS_ENV)
            .map(PathBuf::from)
            .or_else(|| self.paths.repos_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REPOS_DIR));

        let timeout = match self.download.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        let mut config = ManagerConfig::new(root)
            .with_repos_dir(repos)
            .with_timeout(timeout);
        if let Some(agent) = &self.download.user_agent {
            config = config.with_user_agent(agent.clone());
        }

        Ok(config)
    }
}

pub(crate) fn parse_timeout(raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidValue {
            key: "download.timeout_secs".to_string(),
            value: raw.to_string(),
            reason: e.to_string(),
        })
}
