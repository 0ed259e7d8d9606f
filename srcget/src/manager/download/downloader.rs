//! Cache-by-presence archive downloader.
//!
//! A cached archive is trusted by its presence alone: when the local file
//! exists the network is never touched. There is no freshness check, and a
//! partial file left behind by a failed transfer is not removed.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use super::inflight::InFlightDownloads;
use crate::manager::error::{ManagerError, ManagerResult};
use crate::manager::fs::{create_dir_all, dir_exists, file_exists};
use crate::manager::traits::{AcquireStage, ArchiveTransport};

/// Buffer size for streaming the response body (64KB).
const BUFFER_SIZE: usize = 64 * 1024;

/// Result of a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The archive was downloaded.
    Downloaded { bytes: u64 },
    /// The archive was already on disk.
    Cached,
}

/// Downloads archives into the local cache.
#[derive(Debug)]
pub struct Downloader<T: ArchiveTransport> {
    transport: T,
    in_flight: Arc<InFlightDownloads>,
}

impl<T: ArchiveTransport> Downloader<T> {
    /// Create a downloader sharing the process-wide in-flight set.
    pub fn new(transport: T) -> Self {
        Self::with_in_flight(transport, InFlightDownloads::global())
    }

    /// Create a downloader with its own in-flight set.
    pub fn with_in_flight(transport: T, in_flight: Arc<InFlightDownloads>) -> Self {
        Self {
            transport,
            in_flight,
        }
    }

    /// Get the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch `url` into `local_path` unless it is already there.
    pub fn fetch(&self, url: &str, local_path: &Path) -> ManagerResult<FetchOutcome> {
        self.fetch_with_progress(url, local_path, &|_, _| {})
    }

    /// Fetch `url` into `local_path`, reporting the start of a real download.
    pub fn fetch_with_progress(
        &self,
        url: &str,
        local_path: &Path,
        on_progress: &dyn Fn(AcquireStage, &str),
    ) -> ManagerResult<FetchOutcome> {
        let _claim = self.in_flight.claim(local_path);

        if file_exists(local_path) {
            debug!(path = %local_path.display(), "archive already cached");
            return Ok(FetchOutcome::Cached);
        }

        let message = format!("Downloading {} ...", url);
        info!("{}", message);
        on_progress(AcquireStage::Downloading, &message);

        let body = self.transport.get(url)?;

        if let Some(parent) = local_path.parent() {
            if !dir_exists(parent) {
                create_dir_all(parent)?;
            }
        }

        let file = File::create(local_path).map_err(|e| ManagerError::WriteFailed {
            path: local_path.to_path_buf(),
            source: e,
        })?;

        let bytes = stream_to_file(body, file, url, local_path)?;
        debug!(path = %local_path.display(), bytes, "archive downloaded");

        Ok(FetchOutcome::Downloaded { bytes })
    }
}

/// Copy the response body into the cache file.
fn stream_to_file(
    mut body: Box<dyn Read + Send>,
    file: File,
    url: &str,
    dest: &Path,
) -> ManagerResult<u64> {
    let mut writer = BufWriter::new(file);
    let mut buffer = vec![0u8; BUFFER_SIZE];
    let mut written = 0u64;

    loop {
        let bytes_read = body
            .read(&mut buffer)
            .map_err(|e| ManagerError::DownloadFailed {
                url: url.to_string(),
                reason: format!("read error: {}", e),
            })?;

        if bytes_read == 0 {
            break;
        }

        writer
            .write_all(&buffer[..bytes_read])
            .map_err(|e| ManagerError::WriteFailed {
                path: dest.to_path_buf(),
                source: e,
            })?;

        written += bytes_read as u64;
    }

    writer.flush().map_err(|e| ManagerError::WriteFailed {
        path: dest.to_path_buf(),
        source: e,
    })?;

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::{self, Cursor};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Transport double that serves a fixed body and counts requests.
    struct CountingTransport {
        body: Vec<u8>,
        calls: AtomicUsize,
    }

    impl CountingTransport {
        fn new(body: &[u8]) -> Self {
            Self {
                body: body.to_vec(),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ArchiveTransport for CountingTransport {
        fn get(&self, _url: &str) -> ManagerResult<Box<dyn Read + Send>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(Cursor::new(self.body.clone())))
        }
    }

    /// Transport double that always answers 404.
    struct NotFoundTransport;

    impl ArchiveTransport for NotFoundTransport {
        fn get(&self, url: &str) -> ManagerResult<Box<dyn Read + Send>> {
            Err(ManagerError::HttpStatus {
                url: url.to_string(),
                status: 404,
            })
        }
    }

    /// Body that fails after the first chunk.
    struct BrokenBody {
        sent: bool,
    }

    impl Read for BrokenBody {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.sent {
                return Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"));
            }
            self.sent = true;
            buf[..4].copy_from_slice(b"PK\x03\x04");
            Ok(4)
        }
    }

    struct BrokenTransport;

    impl ArchiveTransport for BrokenTransport {
        fn get(&self, _url: &str) -> ManagerResult<Box<dyn Read + Send>> {
            Ok(Box::new(BrokenBody { sent: false }))
        }
    }

    fn downloader<T: ArchiveTransport>(transport: T) -> Downloader<T> {
        Downloader::with_in_flight(transport, Arc::new(InFlightDownloads::new()))
    }

    #[test]
    fn test_fetch_downloads_and_creates_parents() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("repos/github.com/org/repo/trunk.zip");
        let dl = downloader(CountingTransport::new(b"archive bytes"));

        let outcome = dl.fetch("https://example.org/a.zip", &dest).unwrap();

        assert_eq!(outcome, FetchOutcome::Downloaded { bytes: 13 });
        assert_eq!(fs::read(&dest).unwrap(), b"archive bytes");
        assert_eq!(dl.transport().calls(), 1);
    }

    #[test]
    fn test_fetch_skips_network_when_cached() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("trunk.zip");
        fs::write(&dest, b"old").unwrap();
        let dl = downloader(CountingTransport::new(b"new"));

        let outcome = dl.fetch("https://example.org/a.zip", &dest).unwrap();

        assert_eq!(outcome, FetchOutcome::Cached);
        assert_eq!(dl.transport().calls(), 0);
        assert_eq!(fs::read(&dest).unwrap(), b"old");
    }

    #[test]
    fn test_second_fetch_is_cached() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("trunk.zip");
        let dl = downloader(CountingTransport::new(b"bytes"));

        dl.fetch("https://example.org/a.zip", &dest).unwrap();
        let outcome = dl.fetch("https://example.org/a.zip", &dest).unwrap();

        assert_eq!(outcome, FetchOutcome::Cached);
        assert_eq!(dl.transport().calls(), 1);
    }

    #[test]
    fn test_status_failure_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("sub/trunk.zip");
        let dl = downloader(NotFoundTransport);

        let err = dl.fetch("https://example.org/a.zip", &dest).unwrap_err();

        assert!(matches!(err, ManagerError::HttpStatus { status: 404, .. }));
        assert!(!dest.exists());
        assert!(!temp.path().join("sub").exists());
    }

    #[test]
    fn test_broken_body_leaves_partial_file() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("trunk.zip");
        let dl = downloader(BrokenTransport);

        let err = dl.fetch("https://example.org/a.zip", &dest).unwrap_err();

        assert!(matches!(err, ManagerError::DownloadFailed { .. }));
        // Partial files are not cleaned up; a retry treats them as cached.
        assert!(dest.exists());
        assert_eq!(
            dl.fetch("https://example.org/a.zip", &dest).unwrap(),
            FetchOutcome::Cached
        );
    }

    #[test]
    fn test_progress_reported_only_for_real_downloads() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("trunk.zip");
        let dl = downloader(CountingTransport::new(b"bytes"));
        let messages = Mutex::new(Vec::new());
        let record = |stage: AcquireStage, msg: &str| {
            messages.lock().unwrap().push((stage, msg.to_string()));
        };

        dl.fetch_with_progress("https://example.org/a.zip", &dest, &record)
            .unwrap();
        dl.fetch_with_progress("https://example.org/a.zip", &dest, &record)
            .unwrap();

        let messages = messages.into_inner().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].0, AcquireStage::Downloading);
        assert_eq!(messages[0].1, "Downloading https://example.org/a.zip ...");
    }

    #[test]
    fn test_concurrent_fetches_hit_network_once() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("trunk.zip");
        let dl = downloader(CountingTransport::new(b"bytes"));

        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| dl.fetch("https://example.org/a.zip", &dest).unwrap());
            }
        });

        assert_eq!(dl.transport().calls(), 1);
        assert_eq!(fs::read(&dest).unwrap(), b"bytes");
    }
}
