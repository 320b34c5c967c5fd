//! Per-window and per-office lock registry (spec §5 Concurrency model).
//!
//! Every dispatcher command that mutates a window's state acquires that
//! window's lock for its duration; Admit and the Numbering Service
//! additionally acquire the office lock. Locks are created lazily and kept
//! for the process lifetime (there are only ever a handful of windows and
//! two offices, so this never grows unbounded).

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::models::Office;

#[derive(Default)]
pub struct LockRegistry {
    windows: DashMap<Uuid, Arc<Mutex<()>>>,
    offices: DashMap<Office, Arc<Mutex<()>>>,
}

impl LockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock_window(&self, window_id: Uuid) -> OwnedMutexGuard<()> {
        let mutex = self
            .windows
            .entry(window_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        mutex.lock_owned().await
    }

    pub async fn lock_office(&self, office: Office) -> OwnedMutexGuard<()> {
        let mutex = self
            .offices
            .entry(office)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        mutex.lock_owned().await
    }

    /// Acquire both window locks for a transfer, ordered by id to avoid
    /// deadlock (spec §4.6.6, §5).
    pub async fn lock_windows_ordered(
        &self,
        a: Uuid,
        b: Uuid,
    ) -> (OwnedMutexGuard<()>, OwnedMutexGuard<()>) {
        if a <= b {
            let first = self.lock_window(a).await;
            let second = self.lock_window(b).await;
            (first, second)
        } else {
            let second = self.lock_window(b).await;
            let first = self.lock_window(a).await;
            (first, second)
        }
    }
}
