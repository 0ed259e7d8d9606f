//! `config` subcommands: view and modify `~/.srcget/config.ini`.

use std::env;

use clap::Subcommand;
use srcget::config::{config_file_path, ConfigFile, ConfigKey, GOPATH_ENV, REPOS_ENV, ROOT_ENV};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Get a configuration value
    Get {
        /// Configuration key in format section.key (e.g., paths.root_dir)
        key: String,
    },

    /// Set a configuration value; an empty value clears it
    Set {
        /// Configuration key in format section.key (e.g., paths.root_dir)
        key: String,

        /// Value to set
        value: String,
    },

    /// List all configuration settings
    List,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Get { key } => run_get(&key),
        ConfigCommands::Set { key, value } => run_set(&key, &value),
        ConfigCommands::List => run_list(),
        ConfigCommands::Path => run_path(),
    }
}

fn parse_key(key: &str) -> Result<ConfigKey, CliError> {
    key.parse().map_err(|_| {
        CliError::Config(format!(
            "Unknown configuration key '{}'. Use 'srcget config list' to see available keys.",
            key
        ))
    })
}

fn display_value(value: &str) -> &str {
    if value.is_empty() {
        "(not set)"
    } else {
        value
    }
}

fn run_get(key: &str) -> Result<(), CliError> {
    let config_key = parse_key(key)?;
    let config = ConfigFile::load()?;

    println!("{}", display_value(&config_key.get(&config)));
    Ok(())
}

fn run_set(key: &str, value: &str) -> Result<(), CliError> {
    let config_key = parse_key(key)?;

    let mut config = ConfigFile::load()?;
    config_key.set(&mut config, value)?;
    config.save()?;

    println!("Set {} = {}", config_key, display_value(value.trim()));
    Ok(())
}

fn run_list() -> Result<(), CliError> {
    let config = ConfigFile::load()?;

    println!("# {}", config_file_path().display());

    let mut current_section = "";
    for key in ConfigKey::all() {
        if key.section() != current_section {
            current_section = key.section();
            println!();
            println!("[{}]", current_section);
        }
        println!("  {} = {}", key.key_name(), display_value(&key.get(&config)));
    }

    let overrides: Vec<(&str, String)> = [ROOT_ENV, REPOS_ENV, GOPATH_ENV]
        .into_iter()
        .filter_map(|name| env::var(name).ok().map(|v| (name, v)))
        .filter(|(_, v)| !v.is_empty())
        .collect();

    if !overrides.is_empty() {
        println!();
        println!("Environment:");
        for (name, value) in overrides {
            println!("  {} = {}", name, value);
        }
    }

    Ok(())
}

fn run_path() -> Result<(), CliError> {
    println!("{}", config_file_path().display());
    Ok(())
}
