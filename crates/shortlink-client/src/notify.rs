//! User-facing side effects: transient notices ("toasts") and the redirect to login.
//!
//! The client never renders anything itself. Front ends implement these traits;
//! the tracing-backed defaults suit headless use.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, message: message.into() }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Warning, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Surfaces a notice to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Sends the user to the login view.
pub trait Navigator: Send + Sync {
    fn to_login(&self);
}

/// Logs notices instead of showing them.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success | NoticeLevel::Info => tracing::info!(notice = %notice.message),
            NoticeLevel::Warning => tracing::warn!(notice = %notice.message),
            NoticeLevel::Error => tracing::error!(notice = %notice.message),
        }
    }
}

/// Logs the redirect instead of performing one.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn to_login(&self) {
        tracing::info!("Redirecting to login");
    }
}
