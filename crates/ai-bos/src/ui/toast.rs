use std::sync::{Arc, Mutex};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl ToastLevel {
    pub fn label(&self) -> &'static str {
        match self {
            ToastLevel::Success => "success",
            ToastLevel::Info => "info",
            ToastLevel::Warning => "warning",
            ToastLevel::Error => "error",
        }
    }
}

/// Transient user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

impl Toast {
    pub fn new(level: ToastLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Where handlers surface their outcome.
pub trait ToastSink {
    fn push(&self, toast: Toast);
}

/// Collects toasts in memory; clones share the same log.
#[derive(Debug, Default, Clone)]
pub struct ToastLog {
    toasts: Arc<Mutex<Vec<Toast>>>,
}

impl ToastLog {
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<Toast> {
        self.toasts
            .lock()
            .ok()
            .and_then(|guard| guard.last().cloned())
    }
}

impl ToastSink for ToastLog {
    fn push(&self, toast: Toast) {
        if let Ok(mut guard) = self.toasts.lock() {
            guard.push(toast);
        }
    }
}
