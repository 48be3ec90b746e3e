//! Where a form goes after it is submitted.
//!
//! A successful submit never navigates by itself: it returns a [`SubmitOutcome`] carrying the
//! notice to show and the [`Route`] to move to. The terminal front end prints the notice and
//! the destination.

use std::fmt;

use edulink_core::{AppError, FieldErrors};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Dashboard => "/dashboard",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A transient message shown to the user after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == NoticeKind::Success
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NoticeKind::Success => write!(f, "✅ {}", self.message),
            NoticeKind::Error => write!(f, "❌ {}", self.message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub notice: Notice,
    pub redirect: Option<Route>,
}

impl SubmitOutcome {
    pub fn success(message: impl Into<String>, redirect: Route) -> Self {
        Self {
            notice: Notice::success(message),
            redirect: Some(redirect),
        }
    }

    /// Success that stays on the current view.
    pub fn stay(message: impl Into<String>) -> Self {
        Self {
            notice: Notice::success(message),
            redirect: None,
        }
    }
}

/// A failed submit. Field-level failures carry no notice: they are shown next to the fields.
#[derive(Debug)]
pub struct SubmitError {
    pub notice: Option<Notice>,
    pub error: AppError,
}

impl SubmitError {
    pub fn new(message: impl Into<String>, error: AppError) -> Self {
        Self {
            notice: Some(Notice::error(message)),
            error,
        }
    }

    pub fn fields(error: AppError) -> Self {
        Self {
            notice: None,
            error,
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        self.error.field_errors()
    }
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.notice {
            Some(notice) => write!(f, "{}", notice.message),
            None => write!(f, "{}", self.error),
        }
    }
}

impl std::error::Error for SubmitError {}
