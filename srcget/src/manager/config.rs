//! Configuration for the package manager.

use std::path::PathBuf;
use std::time::Duration;

use super::download::DEFAULT_USER_AGENT;

/// Default cache root for downloaded archives. `~` is expanded at use time.
pub const DEFAULT_REPOS_DIR: &str = "~/.srcget/repos";

/// Configuration for the package manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerConfig {
    /// Root of the source tree; packages land under `<root_dir>/src`.
    pub root_dir: PathBuf,

    /// Cache root for downloaded archives.
    ///
    /// May start with `~`, which expands to the current user's home.
    pub repos_dir: PathBuf,

    /// HTTP request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,

    /// User agent for HTTP requests.
    pub user_agent: String,
}

impl ManagerConfig {
    /// Create a new configuration with the given source root.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            repos_dir: PathBuf::from(DEFAULT_REPOS_DIR),
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Set the cache root.
    pub fn with_repos_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.repos_dir = path.into();
        self
    }

    /// Set the HTTP timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
