//! Fallback collaborators for processes without a web session (CLI, workers, tests).

use kissj_domain::session::{CurrentUserResolver, FlashMessage, FlashMessageStore, User};
use parking_lot::Mutex;

/// Nobody is signed in.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnonymousUser;

impl CurrentUserResolver for AnonymousUser {
    fn current_user(&self) -> Option<User> {
        None
    }
}

/// Flash messages kept in memory for the lifetime of the registry.
#[derive(Debug, Default)]
pub struct InMemoryFlashMessages {
    messages: Mutex<Vec<FlashMessage>>,
}

impl InMemoryFlashMessages {
    /// Removes and returns everything collected so far.
    pub fn take(&self) -> Vec<FlashMessage> {
        std::mem::take(&mut *self.messages.lock())
    }
}

impl FlashMessageStore for InMemoryFlashMessages {
    fn push(&self, message: FlashMessage) {
        self.messages.lock().push(message);
    }

    fn messages(&self) -> Vec<FlashMessage> {
        self.messages.lock().clone()
    }
}
