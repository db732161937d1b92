//! Synchronous event notification.
//!
//! Every editing component owns a [`Notifier`] for its own event type.
//! Handlers run on the calling thread, in subscription order, before
//! `publish` returns.

use std::fmt;
use uuid::Uuid;

/// Subscription handle for unsubscribing from events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    /// Create a new unique subscription ID
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

type EventHandler<E> = Box<dyn Fn(&E)>;

/// Ordered list of event handlers for one event type
pub struct Notifier<E> {
    handlers: Vec<(SubscriptionId, EventHandler<E>)>,
}

impl<E> Notifier<E> {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Subscribe to events with a synchronous handler
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: Fn(&E) + 'static,
    {
        let id = SubscriptionId::new();
        self.handlers.push((id, Box::new(handler)));
        tracing::debug!("Subscription {} added", id);
        id
    }

    /// Unsubscribe from events
    ///
    /// Returns true if the subscription was found and removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(sub, _)| *sub != id);
        let removed = self.handlers.len() != before;
        if removed {
            tracing::debug!("Subscription {} removed", id);
        }
        removed
    }

    /// Deliver an event to every handler.
    ///
    /// Returns the number of handlers that were called.
    pub fn publish(&self, event: &E) -> usize {
        for (_, handler) in &self.handlers {
            handler(event);
        }
        self.handlers.len()
    }

    /// Get the number of active subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }
}

impl<E> Default for Notifier<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Notifier<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("subscribers", &self.handlers.len())
            .finish()
    }
}
