//! Subscription handles with guaranteed release

use tracing::debug;

type CancelFn = Box<dyn FnOnce() + Send>;

/// A live subscription to one event source. Dropping it unsubscribes.
pub struct SubscriptionHandle {
    name: String,
    cancel: Option<CancelFn>,
}

impl SubscriptionHandle {
    pub fn new(name: impl Into<String>, cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            name: name.into(),
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Release the subscription. Calling it more than once is a no-op.
    pub fn unsubscribe(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            debug!(subscription = %self.name, "Unsubscribing");
            cancel();
        }
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for SubscriptionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionHandle")
            .field("name", &self.name)
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Owning list of subscriptions released together on shutdown
#[derive(Debug, Default)]
pub struct Subscriptions {
    handles: Vec<SubscriptionHandle>,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, handle: SubscriptionHandle) {
        self.handles.push(handle);
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Release every subscription, most recent first
    pub fn unsubscribe_all(&mut self) {
        while let Some(mut handle) = self.handles.pop() {
            handle.unsubscribe();
        }
    }
}

impl Drop for Subscriptions {
    fn drop(&mut self) {
        self.unsubscribe_all();
    }
}
