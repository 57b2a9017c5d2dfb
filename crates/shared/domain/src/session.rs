//! Contracts for collaborators the bootstrap consumes but does not own.
//!
//! The web layer supplies implementations that know about cookies and sessions;
//! the registry only asks them for the current state when it renders a view.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: u64,
    pub slug: String,
    pub read_only_name: String,
}

/// An authenticated participant or administrator, together with the event they belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub email: String,
    pub event: Option<Event>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub message: String,
}

impl FlashMessage {
    pub fn new(level: FlashLevel, message: impl Into<String>) -> Self {
        Self { level, message: message.into() }
    }
}

/// Looks up the user bound to the current request, if any.
pub trait CurrentUserResolver: Debug + Send + Sync {
    fn current_user(&self) -> Option<User>;
}

/// One-shot notices shown on the next rendered page.
pub trait FlashMessageStore: Debug + Send + Sync {
    fn push(&self, message: FlashMessage);

    /// Current collection, without consuming it.
    fn messages(&self) -> Vec<FlashMessage>;

    fn info(&self, message: &str) {
        self.push(FlashMessage::new(FlashLevel::Info, message));
    }

    fn warning(&self, message: &str) {
        self.push(FlashMessage::new(FlashLevel::Warning, message));
    }
}
