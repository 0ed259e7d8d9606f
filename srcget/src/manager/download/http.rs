//! HTTP transport for package archives.
//!
//! One blocking GET per archive, no retry, no resume. A failed request or a
//! non-success status is reported to the caller unchanged.

use std::io::Read;
use std::time::Duration;

use reqwest::blocking::Client;

use crate::manager::error::{ManagerError, ManagerResult};
use crate::manager::traits::ArchiveTransport;

/// User agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("srcget/", env!("CARGO_PKG_VERSION"));

/// HTTP transport backed by a blocking reqwest client.
#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
    pub(crate) timeout: Option<Duration>,
}

impl HttpTransport {
    /// Create a transport without a request timeout.
    pub fn new() -> ManagerResult<Self> {
        Self::with_settings(None, DEFAULT_USER_AGENT)
    }

    /// Create a transport with a custom timeout and user agent.
    ///
    /// `None` disables the timeout entirely.
    pub fn with_settings(timeout: Option<Duration>, user_agent: &str) -> ManagerResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent.to_string())
            .build()
            .map_err(|e| {
                ManagerError::InvalidConfig(format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client, timeout })
    }
}

impl ArchiveTransport for HttpTransport {
    fn get(&self, url: &str) -> ManagerResult<Box<dyn Read + Send>> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| ManagerError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ManagerError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(Box::new(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_transport_new() {
        let transport = HttpTransport::new().unwrap();
        assert_eq!(transport.timeout, None);
    }

    #[test]
    fn test_http_transport_with_timeout() {
        let transport =
            HttpTransport::with_settings(Some(Duration::from_secs(60)), "test-agent").unwrap();
        assert_eq!(transport.timeout, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_unreachable_host_is_download_failure() {
        let transport =
            HttpTransport::with_settings(Some(Duration::from_secs(5)), "test-agent").unwrap();
        // Port 9 on localhost (discard) is closed on test machines.
        let err = match transport.get("http://127.0.0.1:9/archive.zip") {
            Ok(_) => panic!("expected connection failure"),
            Err(e) => e,
        };
        assert!(matches!(err, ManagerError::DownloadFailed { .. }));
        assert!(err.is_io_failure());
    }

    #[test]
    fn test_default_user_agent() {
        assert!(DEFAULT_USER_AGENT.starts_with("srcget/"));
    }
}
