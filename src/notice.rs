use std::time::{Duration, Instant};

/// Notices start fading at this age
pub const FADE_AFTER: Duration = Duration::from_millis(3200);
/// and are dropped at this one
pub const REMOVE_AFTER: Duration = Duration::from_millis(3600);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

impl NoticeKind {
    pub fn title(&self) -> &'static str {
        match self {
            NoticeKind::Success => "Done",
            NoticeKind::Error => "Error",
            NoticeKind::Info => "Notice",
        }
    }
}

/// Transient status message
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub shown_at: Instant,
}

impl Notice {
    pub fn is_fading(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= FADE_AFTER
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= REMOVE_AFTER
    }
}

/// Stack of active notices, oldest first
#[derive(Debug, Default)]
pub struct Notices {
    items: Vec<Notice>,
}

impl Notices {
    pub fn push_at(&mut self, kind: NoticeKind, message: impl Into<String>, now: Instant) {
        let message = message.into();
        match kind {
            NoticeKind::Error => tracing::warn!(%message, "notice"),
            _ => tracing::info!(%message, "notice"),
        }
        self.items.push(Notice {
            kind,
            message,
            shown_at: now,
        });
    }

    pub fn push(&mut self, kind: NoticeKind, message: impl Into<String>) {
        self.push_at(kind, message, Instant::now());
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(NoticeKind::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(NoticeKind::Error, message);
    }

    /// Drops expired notices; true when anything changed
    pub fn prune(&mut self, now: Instant) -> bool {
        let before = self.items.len();
        self.items.retain(|n| !n.is_expired(now));
        before != self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.items.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}
