//! Transient user-facing notifications (toasts).
//!
//! One notification is live at a time. Showing a new one replaces the
//! current one immediately and re-arms the expiry window; the previous
//! expiry task is aborted and additionally fenced by an epoch check so a
//! stale timer can never erase a newer message.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
}

struct NotifyState {
    current: Option<Notification>,
    /// Bumped on every show/clear; an expiry task only clears if the epoch
    /// it was armed with is still live.
    epoch: u64,
    expiry: Option<JoinHandle<()>>,
}

#[derive(Clone)]
pub struct NotificationCenter {
    state: Arc<Mutex<NotifyState>>,
    watch_tx: Arc<watch::Sender<Option<Notification>>>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        let (watch_tx, _) = watch::channel(None);
        Self {
            state: Arc::new(Mutex::new(NotifyState {
                current: None,
                epoch: 0,
                expiry: None,
            })),
            watch_tx: Arc::new(watch_tx),
        }
    }

    /// Replaces the live notification and schedules its removal after `ttl`.
    pub async fn show(&self, message: impl Into<String>, severity: Severity, ttl: Duration) {
        let notification = Notification {
            id: Uuid::new_v4(),
            message: message.into(),
            severity,
            created_at: Utc::now(),
        };

        let mut guard = self.state.lock().await;
        guard.epoch += 1;
        let armed_epoch = guard.epoch;
        if let Some(handle) = guard.expiry.take() {
            handle.abort();
        }
        guard.current = Some(notification.clone());
        self.watch_tx.send_replace(Some(notification));

        let state = self.state.clone();
        let watch_tx = self.watch_tx.clone();
        // Created here, not inside the task, so the deadline anchors at
        // show-time rather than at the task's first poll.
        let expiry_sleep = tokio::time::sleep(ttl);
        guard.expiry = Some(tokio::spawn(async move {
            expiry_sleep.await;
            let mut guard = state.lock().await;
            if guard.epoch == armed_epoch {
                guard.current = None;
                watch_tx.send_replace(None);
            }
        }));
    }

    /// Removes the live notification immediately, if any.
    pub async fn clear(&self) {
        let mut guard = self.state.lock().await;
        guard.epoch += 1;
        if let Some(handle) = guard.expiry.take() {
            handle.abort();
        }
        if guard.current.take().is_some() {
            self.watch_tx.send_replace(None);
        }
    }

    pub async fn current(&self) -> Option<Notification> {
        self.state.lock().await.current.clone()
    }

    /// Receiver that yields the live notification after every change.
    pub fn subscribe(&self) -> watch::Receiver<Option<Notification>> {
        self.watch_tx.subscribe()
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}
