use thiserror::Error;

use crate::SubscriptionHandle;

/// Type-erased error returned by fallible callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A callback failed while an update was being broadcast.
///
/// The value of the observable has already been updated when this is
/// returned. Callbacks registered after the failing one were not invoked for
/// that update.
#[derive(Debug, Error)]
#[error("subscriber {handle} failed: {source}")]
pub struct CallbackError {
    handle: SubscriptionHandle,
    #[source]
    source: BoxError,
}

impl CallbackError {
    pub(crate) fn new(handle: SubscriptionHandle, source: BoxError) -> Self {
        Self { handle, source }
    }

    /// The handle of the callback that failed.
    pub fn handle(&self) -> SubscriptionHandle {
        self.handle
    }

    /// Consume this error, returning the error produced by the callback.
    pub fn into_inner(self) -> BoxError {
        self.source
    }
}
