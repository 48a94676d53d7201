//! User-facing notifications ("toasts").
//!
//! Helpers that carry out a user action report the outcome through a
//! [`Notifier`]. The TUI queues toasts for its status row; the CLI prints
//! them to stderr. Every toast is also emitted as a tracing event.

use std::collections::VecDeque;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Info,
    Error,
}

impl fmt::Display for ToastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToastKind::Success => write!(f, "success"),
            ToastKind::Info => write!(f, "info"),
            ToastKind::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Toast {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Toast {
            kind: ToastKind::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Toast {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }
}

pub trait Notifier {
    fn show_toast(&mut self, toast: Toast);
}

fn trace_toast(toast: &Toast) {
    match toast.kind {
        ToastKind::Error => tracing::warn!(message = %toast.message, "toast"),
        _ => tracing::debug!(kind = %toast.kind, message = %toast.message, "toast"),
    }
}

/// Bounded in-memory toast queue, newest last.
#[derive(Debug, Clone)]
pub struct ToastLog {
    toasts: VecDeque<Toast>,
    capacity: usize,
}

impl Default for ToastLog {
    fn default() -> Self {
        ToastLog::with_capacity(16)
    }
}

impl ToastLog {
    pub fn with_capacity(capacity: usize) -> Self {
        ToastLog {
            toasts: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// The most recent toast, if any
    pub fn latest(&self) -> Option<&Toast> {
        self.toasts.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn clear(&mut self) {
        self.toasts.clear();
    }
}

impl Notifier for ToastLog {
    fn show_toast(&mut self, toast: Toast) {
        trace_toast(&toast);
        if self.toasts.len() == self.capacity {
            self.toasts.pop_front();
        }
        self.toasts.push_back(toast);
    }
}

/// CLI notifier: success and info toasts go to stderr unless `quiet` is set
/// (e.g. for `--json` output). Error toasts are only traced, since the
/// failing operation also returns an `Err` that `main` prints.
#[derive(Debug, Default)]
pub struct StderrNotifier {
    pub quiet: bool,
}

impl Notifier for StderrNotifier {
    fn show_toast(&mut self, toast: Toast) {
        trace_toast(&toast);
        if toast.kind != ToastKind::Error && !self.quiet {
            eprintln!("{}", toast.message);
        }
    }
}
