use std::time::{Duration, Instant};

/// An error message that hides itself after a fixed timeout.
///
/// Showing a new error replaces the previous deadline, so an old timeout can
/// never hide a newer message.
#[derive(Debug, Clone)]
pub struct TransientError {
    timeout: Duration,
    message: Option<String>,
    deadline: Option<Instant>,
}

impl TransientError {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            message: None,
            deadline: None,
        }
    }

    pub fn show(&mut self, message: impl Into<String>, now: Instant) {
        self.message = Some(message.into());
        self.deadline = Some(now + self.timeout);
    }

    pub fn hide(&mut self) {
        self.message = None;
        self.deadline = None;
    }

    /// Hide the error if its deadline has passed. Returns true if it was
    /// hidden by this call.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.hide();
                true
            }
            _ => false,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.message.is_some()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}
