//! Core package identity type.
//!
//! The [`PackageDescriptor`] identifies one requestable unit of source code:
//! an import path plus the version it should be fetched at. Everything the
//! manager writes to disk is a pure function of a descriptor.

use std::fmt;

use super::naming::{archive_file_name, archive_url, install_segments};
use super::parse::DescriptorError;

/// Version marker for a package.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Version {
    /// Latest revision of the default branch.
    Trunk,
    /// An explicit version token, e.g. `tag`, `branch`, `commit` or `v1`.
    Pinned(String),
}

impl Version {
    /// Check if this is the trunk marker.
    pub fn is_trunk(&self) -> bool {
        matches!(self, Version::Trunk)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Version::Trunk => write!(f, "trunk"),
            Version::Pinned(token) => write!(f, "{}", token),
        }
    }
}

/// Identity of a package: import path, version and version id.
///
/// Descriptors are validated on construction and immutable afterwards.
///
/// # Example
///
/// ```
/// use srcget::package::{PackageDescriptor, Version};
///
/// let pkg = PackageDescriptor::new("example.org/foo/bar", Version::Pinned("v1".into()), "5")
///     .unwrap();
///
/// assert_eq!(pkg.name(), "example.org/foo/bar");
/// assert_eq!(pkg.install_segments(), vec!["example.org", "foo", "bar_v1_5"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageDescriptor {
    name: String,
    version: Version,
    version_id: String,
}

impl PackageDescriptor {
    /// Create a validated descriptor.
    ///
    /// The name must be a non-empty slash-delimited path without empty, `.`
    /// or `..` segments. A pinned version needs a non-empty token and a
    /// non-empty version id; the version id of a trunk descriptor is dropped.
    pub fn new(
        name: impl Into<String>,
        version: Version,
        version_id: impl Into<String>,
    ) -> Result<Self, DescriptorError> {
        let name = name.into();
        let version_id = version_id.into();

        if name.is_empty() {
            return Err(DescriptorError::EmptyName);
        }
        if let Some(segment) = name
            .split('/')
            .find(|s| s.is_empty() || *s == "." || *s == "..")
        {
            return Err(DescriptorError::InvalidSegment {
                name: name.clone(),
                segment: segment.to_string(),
            });
        }

        let version_id = match &version {
            Version::Trunk => String::new(),
            Version::Pinned(token) => {
                if token.is_empty() || version_id.is_empty() {
                    return Err(DescriptorError::MissingVersionId {
                        version: token.clone(),
                    });
                }
                // Both end up inside the last install segment and the cache file name.
                if let Some(bad) = [token.as_str(), version_id.as_str()]
                    .into_iter()
                    .find(|v| !is_path_safe(v))
                {
                    return Err(DescriptorError::InvalidVersionId {
                        version: token.clone(),
                        value: bad.to_string(),
                    });
                }
                version_id
            }
        };

        Ok(Self {
            name,
            version,
            version_id,
        })
    }

    /// Create a trunk descriptor.
    pub fn trunk(name: impl Into<String>) -> Result<Self, DescriptorError> {
        Self::new(name, Version::Trunk, "")
    }

    /// The slash-delimited import path.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The version marker.
    pub fn version(&self) -> &Version {
        &self.version
    }

    /// The version id. Empty for trunk descriptors.
    pub fn version_id(&self) -> &str {
        &self.version_id
    }

    /// Check if this descriptor points at trunk.
    pub fn is_trunk(&self) -> bool {
        self.version.is_trunk()
    }

    /// The import path split into its segments.
    pub fn segments(&self) -> Vec<&str> {
        self.name.split('/').collect()
    }

    /// Remote location of the archive for this exact name and version.
    pub fn url(&self) -> String {
        archive_url(self)
    }

    /// Local file name of the cached archive.
    pub fn file_name(&self) -> String {
        archive_file_name(self)
    }

    /// Directory segments of the install target, relative to `<root>/src`.
    ///
    /// Trunk descriptors map to the import path unchanged. Pinned descriptors
    /// rewrite only the final segment to `<segment>_<version>_<version_id>`.
    pub fn install_segments(&self) -> Vec<String> {
        install_segments(self)
    }
}

impl fmt::Display for PackageDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Version::Trunk => write!(f, "{}", self.name),
            Version::Pinned(token) => write!(f, "{}@{}:{}", self.name, token, self.version_id),
        }
    }
}

/// A version token or id that stays inside one path component.
fn is_path_safe(value: &str) -> bool {
    value != "." && value != ".." && !value.contains(['/', '\\'])
}
