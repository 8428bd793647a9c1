//! Plumbing shared by the two screens: request tagging and notices.

use crate::error::{Impact, IssueBoardError, RequestKind};
use tracing::debug;

/// Identifies what a request was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTag<K> {
    generation: u64,
    key: K,
}

/// Tracks whether a screen is mounted and which navigation it is on.
///
/// Results are only applied when they were requested in the current generation and for the
/// key the screen is currently showing.
#[derive(Debug, Default)]
pub struct Lifecycle {
    generation: u64,
    mounted: bool,
}

impl Lifecycle {
    pub fn mounted() -> Self {
        Self {
            generation: 0,
            mounted: true,
        }
    }

    pub fn tag<K>(&self, key: K) -> RequestTag<K> {
        RequestTag {
            generation: self.generation,
            key,
        }
    }

    pub fn accepts<K: PartialEq + std::fmt::Debug>(&self, tag: &RequestTag<K>, current: &K) -> bool {
        let accepted = self.mounted && tag.generation == self.generation && tag.key == *current;
        if !accepted {
            debug!("Discarding late result for {:?}", tag.key);
        }
        accepted
    }

    /// Invalidates every request issued so far
    pub fn navigate(&mut self) {
        self.generation += 1;
        self.mounted = true;
    }

    pub fn unmount(&mut self) {
        self.generation += 1;
        self.mounted = false;
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Non-blocking message for the user, shown after the current action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    /// Describes a failed action, telling apart failures that are safe to retry
    pub fn failure(action: &str, error: &IssueBoardError, kind: RequestKind) -> Self {
        match error.impact(kind) {
            Impact::NothingChanged => Self {
                level: NoticeLevel::Warning,
                message: format!("{action} failed, nothing changed, try again ({error})"),
            },
            Impact::MayHaveApplied => Self {
                level: NoticeLevel::Error,
                message: format!("{action} may have been applied, refresh before retrying ({error})"),
            },
        }
    }
}
