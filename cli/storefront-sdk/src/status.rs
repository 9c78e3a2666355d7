//! User visible status of sessions and mutations.

use std::fmt::Display;

/// Status of one independent session
/// (category load, listing load, entity load or mutation).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionStatus {
    #[default]
    Idle,
    Loading,
    Success(String),
    Error(String),
}

impl SessionStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionStatus::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, SessionStatus::Error(_))
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            SessionStatus::Success(msg) | SessionStatus::Error(msg) => Some(msg),
            SessionStatus::Idle | SessionStatus::Loading => None,
        }
    }
}

/// A message shown after a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Success(text) | Notice::Error(text) => text,
        }
    }
}

impl Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}

/// Holds at most one [Notice].
///
/// Setting a notice replaces the previous one immediately.
/// There is no queue and no expiry; the presentation layer dismisses notices.
#[derive(Debug, Default)]
pub struct StatusNotifier {
    current: Option<Notice>,
}

impl StatusNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `notice`, returning the one it replaced.
    pub fn set(&mut self, notice: Notice) -> Option<Notice> {
        tracing::debug!(?notice, "setting notice");
        self.current.replace(notice)
    }

    pub fn dismiss(&mut self) -> Option<Notice> {
        self.current.take()
    }

    pub fn current(&self) -> Option<&Notice> {
        self.current.as_ref()
    }
}
