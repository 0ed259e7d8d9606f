//! srcget - fetch packages as source archives
//!
//! This library downloads the zip archive a code-hosting service serves for a
//! repository revision, caches it under a repos directory, and unpacks it into
//! a versioned directory of a source tree, without any version control tool.
//!
//! - `package`: package descriptors, archive URLs and install paths
//! - `manager`: download, extraction and the acquisition pipeline
//! - `config`: the `~/.srcget/config.ini` settings file
//! - `logging`: tracing subscriber setup for the command-line tool

pub mod config;
pub mod logging;
pub mod manager;
pub mod package;
