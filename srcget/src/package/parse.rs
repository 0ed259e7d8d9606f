//! Parsing of raw package identifiers.
//!
//! Turns a command-line token such as `github.com/org/repo` plus an optional
//! version string such as `tag:v1.0` into a [`PackageDescriptor`].

use thiserror::Error;

use super::core::{PackageDescriptor, Version};
use super::naming::Host;

/// Version kinds accepted in `<kind>:<id>` version strings.
pub const VERSION_KINDS: &[&str] = &["branch", "tag", "commit"];

/// Version string that selects trunk explicitly.
pub const TRUNK: &str = "trunk";

/// Errors for identifiers that cannot be turned into a descriptor.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DescriptorError {
    /// The package name is empty.
    #[error("package name is empty")]
    EmptyName,

    /// A path segment is empty or relative.
    #[error("invalid segment '{segment}' in package '{name}'")]
    InvalidSegment { name: String, segment: String },

    /// Not enough segments to locate the repository.
    #[error("package '{name}' must have the form host/org/repo")]
    TooFewSegments { name: String },

    /// A pinned version without an id.
    #[error("version '{version}' requires a version id")]
    MissingVersionId { version: String },

    /// A version token or id that would not stay inside one path component.
    #[error("invalid value '{value}' for version '{version}': must not be '.', '..' or contain a path separator")]
    InvalidVersionId { version: String, value: String },

    /// A `<kind>:<id>` version string with an unknown kind.
    #[error("unknown version kind '{kind}' (expected branch, tag or commit)")]
    UnknownVersionKind { kind: String },
}

/// Parse a raw identifier and optional version string into a descriptor.
///
/// The identifier may carry an `http(s)://` scheme and a trailing `.git` or
/// `/`. Known hosts need `host/org/repo`, other hosts at least `host/path`.
///
/// Version strings: empty or `trunk` selects trunk, `<kind>:<id>` pins to a
/// branch, tag or commit, and a bare `<id>` is treated as a tag.
///
/// # Example
///
/// ```
/// use srcget::package::{parse_package, Version};
///
/// let pkg = parse_package("https://github.com/org/repo.git", Some("branch:dev")).unwrap();
/// assert_eq!(pkg.name(), "github.com/org/repo");
/// assert_eq!(pkg.version(), &Version::Pinned("branch".to_string()));
/// assert_eq!(pkg.version_id(), "dev");
///
/// assert!(parse_package("github.com/org", None).is_err());
/// ```
pub fn parse_package(raw: &str, version: Option<&str>) -> Result<PackageDescriptor, DescriptorError> {
    let name = normalize_name(raw);
    if name.is_empty() {
        return Err(DescriptorError::EmptyName);
    }
    // Domains are case-insensitive; the rest of the path is not.
    let name = match name.split_once('/') {
        Some((host, rest)) => format!("{}/{}", host.to_ascii_lowercase(), rest),
        None => name.to_ascii_lowercase(),
    };

    let segment_count = name.split('/').count();
    let first = name.split('/').next().unwrap_or_default();
    let required = if Host::from_domain(first).is_some() { 3 } else { 2 };
    if segment_count < required {
        return Err(DescriptorError::TooFewSegments { name });
    }

    let (version, version_id) = parse_version(version.unwrap_or_default())?;
    PackageDescriptor::new(name, version, version_id)
}

/// Strip scheme and trailing decorations from a raw identifier.
fn normalize_name(raw: &str) -> &str {
    let name = raw.trim();
    let name = name
        .strip_prefix("https://")
        .or_else(|| name.strip_prefix("http://"))
        .unwrap_or(name);
    let name = name.trim_end_matches('/');
    name.strip_suffix(".git").unwrap_or(name)
}

/// Split a version string into its marker and id.
fn parse_version(raw: &str) -> Result<(Version, String), DescriptorError> {
    let raw = raw.trim();
    if raw.is_empty() || raw == TRUNK {
        return Ok((Version::Trunk, String::new()));
    }

    match raw.split_once(':') {
        Some((kind, id)) => {
            if !VERSION_KINDS.contains(&kind) {
                return Err(DescriptorError::UnknownVersionKind {
                    kind: kind.to_string(),
                });
            }
            Ok((Version::Pinned(kind.to_string()), id.to_string()))
        }
        None => Ok((Version::Pinned("tag".to_string()), raw.to_string())),
    }
}
