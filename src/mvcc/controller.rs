use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use parking_lot::{Mutex, RwLock};
use tracing::info;
use crate::core::error::{Error, ErrorKind, Result};
use crate::mvcc::snapshot::Snapshot;

/// Publishes snapshots to concurrent readers.
///
/// Readers clone the current `Arc` and keep using it for as long as they
/// need; a reload builds the next snapshot off to the side and swaps the
/// pointer in one step. At most one reload runs at a time.
pub struct SnapshotController {
    current: RwLock<Arc<Snapshot>>,
    next_version: AtomicU64,
    reload_lock: Mutex<()>,
}

impl SnapshotController {
    pub fn new() -> Self {
        SnapshotController {
            current: RwLock::new(Arc::new(Snapshot::empty())),
            next_version: AtomicU64::new(1),
            reload_lock: Mutex::new(()),
        }
    }

    pub fn current_snapshot(&self) -> Arc<Snapshot> {
        self.current.read().clone()
    }

    pub fn is_reloading(&self) -> bool {
        self.reload_lock.is_locked()
    }

    /// Runs `build` and publishes its snapshot, waiting for any reload
    /// already in progress. On error the current snapshot stays in place.
    pub fn reload_with<F>(&self, build: F) -> Result<Arc<Snapshot>>
    where
        F: FnOnce() -> Result<Snapshot>,
    {
        let _guard = self.reload_lock.lock();
        self.build_and_publish(build)
    }

    /// Like `reload_with`, but fails with `ReloadInProgress` instead of waiting.
    pub fn try_reload_with<F>(&self, build: F) -> Result<Arc<Snapshot>>
    where
        F: FnOnce() -> Result<Snapshot>,
    {
        let Some(_guard) = self.reload_lock.try_lock() else {
            return Err(Error::new(
                ErrorKind::ReloadInProgress,
                "a reload is already running".to_string(),
            ));
        };
        self.build_and_publish(build)
    }

    fn build_and_publish<F>(&self, build: F) -> Result<Arc<Snapshot>>
    where
        F: FnOnce() -> Result<Snapshot>,
    {
        let mut snapshot = build()?;
        snapshot.version = self.next_version.fetch_add(1, Ordering::SeqCst);
        let snapshot = Arc::new(snapshot);

        *self.current.write() = snapshot.clone();
        info!(
            version = snapshot.version,
            players = snapshot.dims.player_count(),
            tournaments = snapshot.dims.tournament_count(),
            matches = snapshot.match_count(),
            "published snapshot"
        );
        Ok(snapshot)
    }
}

impl Default for SnapshotController {
    fn default() -> Self {
        SnapshotController::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::thread;

    #[test]
    fn starts_empty_at_version_zero() {
        let controller = SnapshotController::new();
        let snapshot = controller.current_snapshot();
        assert_eq!(snapshot.version, 0);
        assert_eq!(snapshot.match_count(), 0);
    }

    #[test]
    fn versions_increase_and_readers_keep_their_snapshot() {
        let controller = SnapshotController::new();
        let first = controller.reload_with(|| Ok(Snapshot::empty())).unwrap();
        let held = controller.current_snapshot();
        let second = controller.reload_with(|| Ok(Snapshot::empty())).unwrap();

        assert_eq!(first.version, 1);
        assert_eq!(second.version, 2);
        assert_eq!(held.version, 1);
        assert_eq!(controller.current_snapshot().version, 2);
    }

    #[test]
    fn failed_build_keeps_current_snapshot() {
        let controller = SnapshotController::new();
        controller.reload_with(|| Ok(Snapshot::empty())).unwrap();

        let err = controller
            .reload_with(|| Err(Error::new(ErrorKind::Parse, "bad table".to_string())))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Parse);
        assert_eq!(controller.current_snapshot().version, 1);
    }

    #[test]
    fn concurrent_try_reload_is_rejected() {
        let controller = Arc::new(SnapshotController::new());
        let (started_tx, started_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();

        let background = {
            let controller = controller.clone();
            thread::spawn(move || {
                controller.reload_with(|| {
                    started_tx.send(()).unwrap();
                    release_rx.recv().unwrap();
                    Ok(Snapshot::empty())
                })
            })
        };

        started_rx.recv().unwrap();
        assert!(controller.is_reloading());
        let err = controller.try_reload_with(|| Ok(Snapshot::empty())).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ReloadInProgress);

        release_tx.send(()).unwrap();
        let published = background.join().unwrap().unwrap();
        assert_eq!(published.version, 1);
        assert!(!controller.is_reloading());
    }
}
