//! In-flight download tracking.
//!
//! Keeps the set of cache files currently being downloaded so that two
//! acquisitions of the same archive never write the same file at once. A
//! second claimant blocks until the first guard is dropped, then sees the
//! finished file through the normal cache-by-presence check.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use parking_lot::{Condvar, Mutex};
use tracing::debug;

/// Set of cache paths with a download in progress.
#[derive(Debug, Default)]
pub struct InFlightDownloads {
    pending: Mutex<HashSet<PathBuf>>,
    released: Condvar,
}

impl InFlightDownloads {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide set shared by every downloader built with
    /// [`Downloader::new`](super::Downloader::new).
    pub fn global() -> Arc<Self> {
        static GLOBAL: OnceLock<Arc<InFlightDownloads>> = OnceLock::new();
        GLOBAL.get_or_init(|| Arc::new(Self::new())).clone()
    }

    /// Claim `key`, waiting while another holder has it.
    ///
    /// The claim is released when the returned guard is dropped, whether the
    /// download succeeded or failed.
    pub fn claim(&self, key: &Path) -> InFlightGuard<'_> {
        let mut pending = self.pending.lock();
        while pending.contains(key) {
            debug!(path = %key.display(), "waiting for in-flight download");
            self.released.wait(&mut pending);
        }
        pending.insert(key.to_path_buf());

        InFlightGuard {
            owner: self,
            key: key.to_path_buf(),
        }
    }

    /// Check if `key` is currently claimed.
    #[cfg(test)]
    pub(crate) fn is_pending(&self, key: &Path) -> bool {
        self.pending.lock().contains(key)
    }

    /// Number of claimed keys.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.pending.lock().len()
    }

    /// Check if nothing is claimed.
    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}

/// Claim on one cache path; releases it on drop.
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    owner: &'a InFlightDownloads,
    key: PathBuf,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.owner.pending.lock().remove(&self.key);
        self.owner.released.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_claim_and_release() {
        let set = InFlightDownloads::new();
        let key = Path::new("/cache/a.zip");

        {
            let _guard = set.claim(key);
            assert!(set.is_pending(key));
            assert_eq!(set.len(), 1);
        }

        assert!(!set.is_pending(key));
        assert!(set.is_empty());
    }

    #[test]
    fn test_distinct_keys_do_not_block() {
        let set = InFlightDownloads::new();
        let _a = set.claim(Path::new("/cache/a.zip"));
        let _b = set.claim(Path::new("/cache/b.zip"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_second_claim_waits_for_release() {
        let set = Arc::new(InFlightDownloads::new());
        let key = PathBuf::from("/cache/a.zip");
        let released = Arc::new(AtomicBool::new(false));

        let guard = set.claim(&key);

        let waiter = {
            let set = Arc::clone(&set);
            let key = key.clone();
            let released = Arc::clone(&released);
            thread::spawn(move || {
                let _guard = set.claim(&key);
                released.load(Ordering::SeqCst)
            })
        };

        thread::sleep(Duration::from_millis(50));
        released.store(true, Ordering::SeqCst);
        drop(guard);

        assert!(waiter.join().unwrap(), "second claim returned before release");
        assert!(set.is_empty());
    }

    #[test]
    fn test_global_is_shared() {
        let a = InFlightDownloads::global();
        let b = InFlightDownloads::global();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
