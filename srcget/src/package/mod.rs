//! Package identity types and parsing.
//!
//! This module provides the data model the manager works from:
//!
//! - **PackageDescriptor**: import path, version and version id
//! - **Naming**: archive URL, cached file name and install directory derived
//!   from a descriptor
//! - **Parsing**: raw command-line identifiers into descriptors
//!
//! # Install Layout
//!
//! ```text
//! github.com/org/repo           trunk            -> <root>/src/github.com/org/repo
//! github.com/org/repo@tag:v1.0  pinned version   -> <root>/src/github.com/org/repo_tag_v1.0
//! ```
//!
//! Only the final segment carries the version suffix, so several versions of
//! one package can live side by side under the same parent directories.

mod core;
mod naming;
mod parse;

pub use core::{PackageDescriptor, Version};
pub use naming::{archive_file_name, archive_url, install_segments, Host, TRUNK_REF};
pub use parse::{parse_package, DescriptorError, TRUNK, VERSION_KINDS};
