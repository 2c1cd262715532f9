//! Background jobs for the application.
//!
//! Call `spawn_all` once during startup. Tasks are detached with `tokio::spawn`.

use std::time::Duration;

use crate::store::RecordStore;

/// Spawn the periodic store refresh and the version watcher.
///
/// An interval of 0 disables the periodic refresh; the watcher always runs.
pub fn spawn_all(store: RecordStore, refresh_interval_secs: u64) {
    // Pick up rows written straight to the database
    if refresh_interval_secs > 0 {
        let store = store.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(refresh_interval_secs));
            // The first tick fires immediately and startup already loaded the store
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if let Err(e) = store.refresh().await {
                    log::error!("Scheduled store refresh failed: {e:?}");
                }
            }
        });
    }

    {
        let mut versions = store.subscribe();
        tokio::spawn(async move {
            while versions.changed().await.is_ok() {
                let version = *versions.borrow_and_update();
                log::debug!("Record store now at version {version}");
            }
        });
    }
}
