//! User-facing feedback.
//!
//! Components report outcomes through a [`Notifier`]. Notifying never blocks
//! and never fails, so it cannot change the caller's control flow.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::broadcast;
use uuid::Uuid;

use reportdao_types::events::{Notice, NoticeKind};

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);

    fn success(&self, message: &str) {
        self.notify(Notice::success(message));
    }

    fn error(&self, message: &str) {
        self.notify(Notice::error(message));
    }
}

/// Writes notices to the `tracing` log.
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.kind {
            NoticeKind::Success => {
                tracing::info!(notice_id = %notice.id, "{}", notice.message)
            }
            NoticeKind::Error => {
                tracing::warn!(notice_id = %notice.id, "{}", notice.message)
            }
        }
    }
}

/// Discards every notice.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _notice: Notice) {}
}

/// Stack of notices awaiting dismissal, plus a live feed for whoever renders
/// them.
#[derive(Clone)]
pub struct NoticeBoard {
    inner: Arc<NoticeBoardInner>,
}

struct NoticeBoardInner {
    tx: broadcast::Sender<Notice>,
    stack: Mutex<Vec<Notice>>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(64);
        Self {
            inner: Arc::new(NoticeBoardInner {
                tx,
                stack: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Receive notices posted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.inner.tx.subscribe()
    }

    /// Notices not yet dismissed, oldest first.
    pub fn snapshot(&self) -> Vec<Notice> {
        self.stack().clone()
    }

    /// Remove one notice. Returns false if it was already gone.
    pub fn dismiss(&self, id: Uuid) -> bool {
        let mut stack = self.stack();
        let before = stack.len();
        stack.retain(|n| n.id != id);
        stack.len() != before
    }

    /// Take every pending notice.
    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.stack())
    }

    fn stack(&self) -> std::sync::MutexGuard<'_, Vec<Notice>> {
        self.inner
            .stack
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for NoticeBoard {
    fn notify(&self, notice: Notice) {
        self.stack().push(notice.clone());
        // No subscribers is fine; the stack still holds it.
        let _ = self.inner.tx.send(notice);
    }
}

/// Fans each notice out to several notifiers.
#[derive(Default)]
pub struct Notifiers(Vec<Arc<dyn Notifier>>);

impl Notifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.0.push(notifier);
        self
    }
}

impl Notifier for Notifiers {
    fn notify(&self, notice: Notice) {
        for notifier in &self.0 {
            notifier.notify(notice.clone());
        }
    }
}
