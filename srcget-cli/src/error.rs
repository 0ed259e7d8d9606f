//! CLI error type.

use srcget::config::ConfigError;
use srcget::manager::ManagerError;
use srcget::package::DescriptorError;
use thiserror::Error;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("unrecognized package: {0}")]
    Descriptor(#[from] DescriptorError),

    #[error("{0}")]
    Manager(#[from] ManagerError),

    #[error("configuration error: {0}")]
    ConfigFile(#[from] ConfigError),

    #[error("{0}")]
    Config(String),

    #[error("{failed} of {total} package(s) failed")]
    Failed { failed: usize, total: usize },
}
