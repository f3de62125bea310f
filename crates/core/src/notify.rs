//! Ephemeral user notifications.
//!
//! A bounded queue of timed toast messages. Entries expire after a fixed TTL
//! and are pruned lazily on access; pushing never blocks and the queue is
//! independent of the request lifecycle that produced a message.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use uuid::Uuid;

const DEFAULT_CAPACITY: usize = 16;
const DEFAULT_TTL: Duration = Duration::from_secs(5);

/// Notification severity kind.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
}

/// A single toast message.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    /// Unique ID for dismissal.
    pub id: Uuid,
    pub kind: NotificationKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    expires_at: Instant,
}

/// Shared notification queue. Cheap to clone.
#[derive(Clone)]
pub struct Notifier {
    inner: Arc<NotifierInner>,
}

struct NotifierInner {
    queue: Mutex<VecDeque<Notification>>,
    capacity: usize,
    ttl: Duration,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_TTL)
    }
}

impl Notifier {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            inner: Arc::new(NotifierInner {
                queue: Mutex::new(VecDeque::new()),
                capacity,
                ttl,
            }),
        }
    }

    /// Push a success toast.
    pub fn success(&self, message: impl Into<String>) -> Uuid {
        self.push(NotificationKind::Success, message.into())
    }

    /// Push an error toast.
    pub fn error(&self, message: impl Into<String>) -> Uuid {
        self.push(NotificationKind::Error, message.into())
    }

    fn push(&self, kind: NotificationKind, message: String) -> Uuid {
        let notification = Notification {
            id: Uuid::new_v4(),
            kind,
            message,
            created_at: Utc::now(),
            expires_at: Instant::now() + self.inner.ttl,
        };
        let id = notification.id;

        let mut queue = self.inner.queue.lock().unwrap();
        Self::prune(&mut queue);
        // Oldest entry gives way when the queue is full.
        while queue.len() >= self.inner.capacity {
            queue.pop_front();
        }
        queue.push_back(notification);
        id
    }

    /// Currently visible (unexpired) notifications, oldest first.
    pub fn active(&self) -> Vec<Notification> {
        let mut queue = self.inner.queue.lock().unwrap();
        Self::prune(&mut queue);
        queue.iter().cloned().collect()
    }

    /// Dismiss one notification before its TTL elapses.
    pub fn dismiss(&self, id: Uuid) -> bool {
        let mut queue = self.inner.queue.lock().unwrap();
        let before = queue.len();
        queue.retain(|n| n.id != id);
        queue.len() != before
    }

    fn prune(queue: &mut VecDeque<Notification>) {
        let now = Instant::now();
        queue.retain(|n| n.expires_at > now);
    }
}
