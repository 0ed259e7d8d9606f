//! CLI command implementations.

pub mod config;
pub mod get;
pub mod path;

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

use srcget::config::{ConfigFile, REPOS_ENV, ROOT_ENV};
use srcget::manager::{expand_home, ManagerConfig};

use crate::error::CliError;

/// Resolve the manager configuration: command-line overrides first, then the
/// environment, then `config.ini`.
fn resolve_config(
    root: Option<PathBuf>,
    repos: Option<PathBuf>,
) -> Result<ManagerConfig, CliError> {
    resolve_config_with(ConfigFile::load()?, root, repos, |name| env::var_os(name))
}

fn resolve_config_with<F>(
    mut file: ConfigFile,
    root: Option<PathBuf>,
    repos: Option<PathBuf>,
    lookup: F,
) -> Result<ManagerConfig, CliError>
where
    F: Fn(&str) -> Option<OsString>,
{
    // A flag shadows both the file setting and its environment override.
    let root_flag = root.is_some();
    let repos_flag = repos.is_some();
    if root_flag {
        file.paths.root_dir = root;
    }
    if repos_flag {
        file.paths.repos_dir = repos;
    }

    let mut config = file.to_manager_config_with(|name: &str| {
        if (root_flag && name == ROOT_ENV) || (repos_flag && name == REPOS_ENV) {
            None
        } else {
            lookup(name)
        }
    })?;
    config.root_dir = expand_home(&config.root_dir)?;

    Ok(config)
}
