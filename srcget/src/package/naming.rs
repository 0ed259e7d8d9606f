//! Centralized package naming conventions.
//!
//! This module is the single source of truth for every name derived from a
//! [`PackageDescriptor`]:
//! - Archive URLs (e.g., `https://github.com/org/repo/archive/master.zip`)
//! - Cached archive file names (e.g., `trunk.zip`, `tag_v1.0.zip`)
//! - Install directory segments (e.g., `github.com/org/repo_tag_v1.0`)
//!
//! All other modules should use these functions rather than constructing names directly.

use std::fmt;

use super::core::{PackageDescriptor, Version};

/// Git ref used for trunk downloads.
pub const TRUNK_REF: &str = "master";

/// Code-hosting service recognised from the first name segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Host {
    /// `github.com`
    GitHub,
    /// `bitbucket.org`
    Bitbucket,
    /// `gitlab.com`
    GitLab,
}

impl Host {
    /// Recognise a host from its domain name.
    pub fn from_domain(domain: &str) -> Option<Self> {
        match domain.to_lowercase().as_str() {
            "github.com" => Some(Host::GitHub),
            "bitbucket.org" => Some(Host::Bitbucket),
            "gitlab.com" => Some(Host::GitLab),
            _ => None,
        }
    }

    /// Domain name of the host.
    pub fn domain(&self) -> &'static str {
        match self {
            Host::GitHub => "github.com",
            Host::Bitbucket => "bitbucket.org",
            Host::GitLab => "gitlab.com",
        }
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.domain())
    }
}

/// The git ref an archive is requested at.
fn archive_ref(pkg: &PackageDescriptor) -> &str {
    match pkg.version() {
        Version::Trunk => TRUNK_REF,
        Version::Pinned(_) => pkg.version_id(),
    }
}

/// Build the archive URL for a package.
///
/// # Examples
///
/// ```
/// use srcget::package::{archive_url, PackageDescriptor, Version};
///
/// let trunk = PackageDescriptor::trunk("github.com/org/repo").unwrap();
/// assert_eq!(archive_url(&trunk), "https://github.com/org/repo/archive/master.zip");
///
/// let tagged =
///     PackageDescriptor::new("bitbucket.org/org/repo", Version::Pinned("tag".into()), "v1.0")
///         .unwrap();
/// assert_eq!(archive_url(&tagged), "https://bitbucket.org/org/repo/get/v1.0.zip");
/// ```
pub fn archive_url(pkg: &PackageDescriptor) -> String {
    let segments = pkg.segments();
    let git_ref = archive_ref(pkg);

    match Host::from_domain(segments[0]) {
        Some(host) if segments.len() >= 3 => {
            let (org, repo) = (segments[1], segments[2]);
            match host {
                Host::GitHub => format!(
                    "https://{}/{}/{}/archive/{}.zip",
                    host, org, repo, git_ref
                ),
                Host::Bitbucket => {
                    format!("https://{}/{}/{}/get/{}.zip", host, org, repo, git_ref)
                }
                Host::GitLab => format!(
                    "https://{}/{}/{}/-/archive/{}/{}-{}.zip",
                    host, org, repo, git_ref, repo, git_ref
                ),
            }
        }
        _ => format!("https://{}/archive/{}.zip", pkg.name(), git_ref),
    }
}

/// Generate the cached archive file name for a package.
///
/// # Format
///
/// `trunk.zip` for trunk, `{version}_{version_id}.zip` otherwise.
pub fn archive_file_name(pkg: &PackageDescriptor) -> String {
    match pkg.version() {
        Version::Trunk => "trunk.zip".to_string(),
        Version::Pinned(token) => format!("{}_{}.zip", token, pkg.version_id()),
    }
}

/// Generate the install directory segments for a package.
///
/// Only the final segment carries the version suffix so different versions
/// of one package share every parent directory.
///
/// # Examples
///
/// ```
/// use srcget::package::{install_segments, PackageDescriptor, Version};
///
/// let trunk = PackageDescriptor::trunk("example.org/foo/bar").unwrap();
/// assert_eq!(install_segments(&trunk), vec!["example.org", "foo", "bar"]);
///
/// let pinned =
///     PackageDescriptor::new("example.org/foo/bar", Version::Pinned("v1".into()), "5").unwrap();
/// assert_eq!(install_segments(&pinned), vec!["example.org", "foo", "bar_v1_5"]);
/// ```
pub fn install_segments(pkg: &PackageDescriptor) -> Vec<String> {
    let mut segments: Vec<String> = pkg.segments().into_iter().map(String::from).collect();

    if let Version::Pinned(token) = pkg.version() {
        if let Some(last) = segments.last_mut() {
            *last = format!("{}_{}_{}", last, token, pkg.version_id());
        }
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pinned(name: &str, token: &str, id: &str) -> PackageDescriptor {
        PackageDescriptor::new(name, Version::Pinned(token.to_string()), id).unwrap()
    }

    #[test]
    fn test_github_urls() {
        let trunk = PackageDescriptor::trunk("github.com/org/repo").unwrap();
        assert_eq!(
            archive_url(&trunk),
            "https://github.com/org/repo/archive/master.zip"
        );

        let tag = pinned("github.com/org/repo", "tag", "v1.2.0");
        assert_eq!(
            archive_url(&tag),
            "https://github.com/org/repo/archive/v1.2.0.zip"
        );
    }

    #[test]
    fn test_github_subpackage_uses_repo_archive() {
        let pkg = PackageDescriptor::trunk("github.com/org/repo/sub/pkg").unwrap();
        assert_eq!(
            archive_url(&pkg),
            "https://github.com/org/repo/archive/master.zip"
        );
    }

    #[test]
    fn test_gitlab_url() {
        let pkg = pinned("gitlab.com/org/repo", "branch", "dev");
        assert_eq!(
            archive_url(&pkg),
            "https://gitlab.com/org/repo/-/archive/dev/repo-dev.zip"
        );
    }

    #[test]
    fn test_unknown_host_url() {
        let pkg = PackageDescriptor::trunk("example.org/foo/bar").unwrap();
        assert_eq!(
            archive_url(&pkg),
            "https://example.org/foo/bar/archive/master.zip"
        );
    }

    #[test]
    fn test_host_is_case_insensitive() {
        assert_eq!(Host::from_domain("GitHub.com"), Some(Host::GitHub));
        assert_eq!(Host::from_domain("example.org"), None);
    }

    #[test]
    fn test_archive_file_name() {
        let trunk = PackageDescriptor::trunk("github.com/org/repo").unwrap();
        assert_eq!(archive_file_name(&trunk), "trunk.zip");

        let tag = pinned("github.com/org/repo", "tag", "v1.0");
        assert_eq!(archive_file_name(&tag), "tag_v1.0.zip");
    }

    #[test]
    fn test_file_names_differ_per_version() {
        let a = pinned("github.com/org/repo", "tag", "v1.0");
        let b = pinned("github.com/org/repo", "tag", "v2.0");
        assert_ne!(archive_file_name(&a), archive_file_name(&b));
    }

    #[test]
    fn test_install_segments_single_segment_name() {
        let pkg = pinned("repo", "commit", "abc");
        assert_eq!(install_segments(&pkg), vec!["repo_commit_abc"]);
    }
}
