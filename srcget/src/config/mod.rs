//! User configuration stored in `~/.srcget/config.ini`.
//!
//! The file has two sections:
//!
//! ```text
//! [paths]
//! root_dir = /home/me/go          ; install root, falls back to $GOPATH
//! repos_dir = ~/.srcget/repos     ; archive cache
//!
//! [download]
//! timeout_secs = 0                ; 0 disables the timeout
//! user_agent = srcget/0.1.0
//! ```
//!
//! `SRCGET_ROOT` and `SRCGET_REPOS` override the two path settings.

mod file;
mod keys;

pub use file::{
    config_dir, config_file_path, ConfigError, ConfigFile, DownloadSettings, PathsSettings,
    GOPATH_ENV, REPOS_ENV, ROOT_ENV,
};
pub use keys::ConfigKey;
