//! Typed `section.key` names for the `config` command.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::file::{parse_timeout, ConfigError, ConfigFile};

/// A settable configuration key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    PathsRootDir,
    PathsReposDir,
    DownloadTimeoutSecs,
    DownloadUserAgent,
}

impl ConfigKey {
    /// All keys, grouped by section.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::PathsRootDir,
            ConfigKey::PathsReposDir,
            ConfigKey::DownloadTimeoutSecs,
            ConfigKey::DownloadUserAgent,
        ]
    }

    /// Full name, e.g. `paths.root_dir`.
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::PathsRootDir => "paths.root_dir",
            ConfigKey::PathsReposDir => "paths.repos_dir",
            ConfigKey::DownloadTimeoutSecs => "download.timeout_secs",
            ConfigKey::DownloadUserAgent => "download.user_agent",
        }
    }

    pub fn section(&self) -> &'static str {
        self.split().0
    }

    pub fn key_name(&self) -> &'static str {
        self.split().1
    }

    fn split(&self) -> (&'static str, &'static str) {
        self.name().split_once('.').unwrap_or((self.name(), ""))
    }

    /// Current value as a string; empty when unset.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::PathsRootDir => path_value(&config.paths.root_dir),
            ConfigKey::PathsReposDir => path_value(&config.paths.repos_dir),
            ConfigKey::DownloadTimeoutSecs => config.download.timeout_secs.to_string(),
            ConfigKey::DownloadUserAgent => config.download.user_agent.clone().unwrap_or_default(),
        }
    }

    /// Set the value. An empty value clears optional settings.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let optional = || (!value.is_empty()).then(|| value.to_string());

        match self {
            ConfigKey::PathsRootDir => config.paths.root_dir = optional().map(PathBuf::from),
            ConfigKey::PathsReposDir => config.paths.repos_dir = optional().map(PathBuf::from),
            ConfigKey::DownloadTimeoutSecs => {
                config.download.timeout_secs = if value.is_empty() {
                    0
                } else {
                    parse_timeout(value)?
                }
            }
            ConfigKey::DownloadUserAgent => config.download.user_agent = optional(),
        }

        Ok(())
    }
}

fn path_value(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keys() {
        for key in ConfigKey::all() {
            assert_eq!(key.name().parse::<ConfigKey>().unwrap(), *key);
        }
        assert_eq!(
            "Paths.Root_Dir".parse::<ConfigKey>().unwrap(),
            ConfigKey::PathsRootDir
        );
        assert!(matches!(
            "paths.nope".parse::<ConfigKey>(),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_section_and_key_name() {
        assert_eq!(ConfigKey::DownloadUserAgent.section(), "download");
        assert_eq!(ConfigKey::DownloadUserAgent.key_name(), "user_agent");
        assert_eq!(ConfigKey::PathsReposDir.to_string(), "paths.repos_dir");
    }

    #[test]
    fn test_get_and_set() {
        let mut config = ConfigFile::default();
        assert_eq!(ConfigKey::PathsRootDir.get(&config), "");

        ConfigKey::PathsRootDir.set(&mut config, "/go").unwrap();
        ConfigKey::DownloadTimeoutSecs.set(&mut config, "15").unwrap();
        ConfigKey::DownloadUserAgent.set(&mut config, "me/2").unwrap();

        assert_eq!(ConfigKey::PathsRootDir.get(&config), "/go");
        assert_eq!(ConfigKey::DownloadTimeoutSecs.get(&config), "15");
        assert_eq!(ConfigKey::DownloadUserAgent.get(&config), "me/2");
    }

    #[test]
    fn test_set_empty_clears() {
        let mut config = ConfigFile::default();
        ConfigKey::PathsReposDir.set(&mut config, "/cache").unwrap();
        ConfigKey::PathsReposDir.set(&mut config, "").unwrap();
        assert_eq!(config.paths.repos_dir, None);
    }

    #[test]
    fn test_set_invalid_timeout() {
        let mut config = ConfigFile::default();
        let err = ConfigKey::DownloadTimeoutSecs
            .set(&mut config, "-1")
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        assert_eq!(config.download.timeout_secs, 0);
    }
}
