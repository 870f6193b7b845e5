use std::collections::VecDeque;
use std::time::{Duration, Instant};

const MAX_TOASTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub expires_at: Instant,
}

/// Transient notifications, oldest first.
#[derive(Debug, Clone)]
pub struct ToastQueue {
    toasts: VecDeque<Toast>,
    duration: Duration,
}

impl ToastQueue {
    pub fn new(duration: Duration) -> Self {
        Self {
            toasts: VecDeque::new(),
            duration,
        }
    }

    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) {
        self.push_at(kind, message, Instant::now());
    }

    pub fn push_at(&mut self, kind: ToastKind, message: impl Into<String>, now: Instant) {
        self.toasts.push_back(Toast {
            kind,
            message: message.into(),
            expires_at: now + self.duration,
        });
        while self.toasts.len() > MAX_TOASTS {
            self.toasts.pop_front();
        }
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Error, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Warning, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Info, message);
    }

    /// Drops expired toasts. Returns whether anything was removed.
    pub fn prune(&mut self, now: Instant) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.expires_at > now);
        before != self.toasts.len()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.toasts.back()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::{ToastKind, ToastQueue};

    #[test]
    fn prune_removes_expired_toasts() {
        let start = Instant::now();
        let mut toasts = ToastQueue::new(Duration::from_millis(100));
        toasts.push_at(ToastKind::Info, "first", start);
        toasts.push_at(ToastKind::Error, "second", start + Duration::from_millis(50));

        assert!(!toasts.prune(start + Duration::from_millis(99)));
        assert!(toasts.prune(start + Duration::from_millis(120)));
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts.latest().map(|t| t.message.as_str()), Some("second"));
    }

    #[test]
    fn queue_keeps_most_recent_toasts() {
        let mut toasts = ToastQueue::new(Duration::from_secs(3));
        for idx in 0..8 {
            toasts.info(format!("toast {idx}"));
        }
        assert_eq!(toasts.len(), 5);
        assert_eq!(
            toasts.iter().next().map(|t| t.message.as_str()),
            Some("toast 3")
        );
    }
}
