use std::fmt;

/// A token identifying one registered callback.
///
/// Returned by the `subscribe` family of methods and passed back to
/// `unsubscribe` to remove the callback again. Handles compare equal only if
/// they were issued by the same observable for the same registration, so a
/// handle can not accidentally remove a callback from another observable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionHandle {
    pub(crate) observable: u64,
    pub(crate) id: u64,
}

impl SubscriptionHandle {
    pub(crate) fn new(observable: u64, id: u64) -> Self {
        Self { observable, id }
    }
}

impl fmt::Display for SubscriptionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.observable, self.id)
    }
}
