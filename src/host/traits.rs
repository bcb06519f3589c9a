//! Collaborator traits consumed by the review engine.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::host::version::AppVersion;

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Current instant in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// Requests the platform's native rating prompt.
///
/// Fire-and-forget: implementations may defer to another thread or decline
/// silently (e.g. an exhausted platform quota). The engine never learns
/// whether anything was shown.
pub trait PromptRequester: Send + Sync {
    /// Ask the platform to show its review prompt.
    fn request_prompt(&self);
}

/// Resolves the running application version.
pub trait VersionProvider: Send + Sync {
    /// Current version, or `None` when it cannot be determined.
    fn current_version(&self) -> Option<AppVersion>;
}

/// Receives human-readable engine events.
pub trait ReviewLogger: Send + Sync {
    /// Record one message.
    fn log(&self, message: &str);
}

impl<T: Clock + ?Sized> Clock for Arc<T> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

impl<T: PromptRequester + ?Sized> PromptRequester for Arc<T> {
    fn request_prompt(&self) {
        (**self).request_prompt()
    }
}

impl<T: VersionProvider + ?Sized> VersionProvider for Arc<T> {
    fn current_version(&self) -> Option<AppVersion> {
        (**self).current_version()
    }
}

impl<T: ReviewLogger + ?Sized> ReviewLogger for Arc<T> {
    fn log(&self, message: &str) {
        (**self).log(message)
    }
}
