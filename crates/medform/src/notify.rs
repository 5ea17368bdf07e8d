//! Transient user notifications.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use ironhtml::typed::Element;
use ironhtml_elements::{Button, Div, H6, I, P};

/// How long a notification stays visible unless stated otherwise.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(3000);

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// Operation completed.
    Success,
    /// Something needs attention.
    Warning,
    /// Operation failed.
    Error,
    /// Neutral information.
    Info,
}

impl NotificationKind {
    /// Returns the kind as a CSS class name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Info => "info",
        }
    }

    /// Returns the Bootstrap icon class for this kind.
    pub const fn icon(&self) -> &'static str {
        match self {
            Self::Success => "bi-check-circle",
            Self::Warning => "bi-exclamation-triangle",
            Self::Error => "bi-x-circle",
            Self::Info => "bi-info-circle",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity.
    pub kind: NotificationKind,
    /// Short heading.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Display time. Zero keeps the notification until dismissed.
    pub duration: Duration,
}

impl Notification {
    /// Creates a notification with the default duration.
    pub fn new(
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            duration: DEFAULT_DURATION,
        }
    }

    /// Creates a success notification.
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, title, message)
    }

    /// Creates a warning notification.
    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Warning, title, message)
    }

    /// Creates an error notification.
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, title, message)
    }

    /// Creates an info notification.
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Info, title, message)
    }

    /// Sets the display time.
    #[must_use]
    pub const fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Returns whether the notification stays until dismissed.
    pub const fn is_persistent(&self) -> bool {
        self.duration.is_zero()
    }

    /// Renders the notification markup.
    pub fn render(&self) -> String {
        let class = format!("notification {}", self.kind);
        let icon = format!("bi {}", self.kind.icon());

        Element::<Div>::new()
            .class(&class)
            .attr("role", "alert")
            .child::<I, _>(|i| i.class(&icon))
            .child::<Div, _>(|d| {
                d.child::<H6, _>(|h| h.class("mb-0").text(&self.title))
                    .child::<P, _>(|p| p.class("mb-0 small").text(&self.message))
            })
            .child::<Button, _>(|b| {
                b.attr("type", "button")
                    .class("close-btn")
                    .child::<I, _>(|i| i.class("bi bi-x"))
            })
            .render()
    }
}

/// Display sink for notifications.
pub trait NotificationSink: Send + Sync {
    /// Shows a notification, replacing any currently shown one.
    fn notify(&self, notification: Notification);
}

/// Notification area holding at most one notification.
#[derive(Debug, Default)]
pub struct NotificationBoard {
    current: Mutex<Option<(Notification, Instant)>>,
}

impl NotificationBoard {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the visible notification, if it has not expired.
    pub fn current(&self) -> Option<Notification> {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        let expired = current.as_ref().is_some_and(|(notification, shown_at)| {
            !notification.is_persistent() && shown_at.elapsed() >= notification.duration
        });
        if expired {
            *current = None;
        }
        current.as_ref().map(|(notification, _)| notification.clone())
    }

    /// Removes the visible notification.
    pub fn dismiss(&self) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Renders the visible notification, or an empty string.
    pub fn render(&self) -> String {
        self.current()
            .map(|notification| notification.render())
            .unwrap_or_default()
    }
}

impl NotificationSink for NotificationBoard {
    fn notify(&self, notification: Notification) {
        tracing::debug!(
            kind = %notification.kind,
            title = %notification.title,
            "Showing notification"
        );
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) =
            Some((notification, Instant::now()));
    }
}
