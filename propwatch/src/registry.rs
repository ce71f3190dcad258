use std::{
    collections::BTreeMap,
    fmt,
    ops::Deref,
    sync::atomic::{AtomicU64, Ordering},
};

use crate::{BoxError, CallbackError, SubscriptionHandle};

/// Source of observable identities, shared by both observable flavours.
static NEXT_OBSERVABLE_ID: AtomicU64 = AtomicU64::new(1);

/// The subscriber registry of one observable.
///
/// `C` is the shared pointer type the callbacks are stored behind (`Rc` for
/// local observables, `Arc` for shared ones), so snapshots are cheap clones.
pub(crate) struct Registry<C> {
    /// Identity of the owning observable, embedded in every handle.
    observable_id: u64,

    /// Id of the next subscription.
    ///
    /// Only ever incremented, so ids are never reused and iterating `entries`
    /// in key order yields callbacks in registration order.
    next_id: u64,

    entries: BTreeMap<u64, C>,
}

impl<C> Registry<C> {
    pub(crate) fn new() -> Self {
        Self {
            observable_id: NEXT_OBSERVABLE_ID.fetch_add(1, Ordering::Relaxed),
            next_id: 0,
            entries: BTreeMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, callback: C) -> SubscriptionHandle {
        let handle = SubscriptionHandle::new(self.observable_id, self.next_id);
        self.next_id += 1;
        self.entries.insert(handle.id, callback);

        #[cfg(feature = "tracing")]
        tracing::trace!(%handle, "Added subscriber");

        handle
    }

    /// Remove the callback registered under `handle`.
    ///
    /// Returns `false` if there is no such callback, which includes handles
    /// that were already removed and handles of other observables.
    pub(crate) fn remove(&mut self, handle: &SubscriptionHandle) -> bool {
        if handle.observable != self.observable_id {
            return false;
        }

        let removed = self.entries.remove(&handle.id).is_some();

        #[cfg(feature = "tracing")]
        if removed {
            tracing::trace!(%handle, "Removed subscriber");
        }

        removed
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<C: Clone> Registry<C> {
    /// Copy out the current callbacks in registration order.
    ///
    /// Fan-out iterates the snapshot rather than the registry itself, so
    /// callbacks may subscribe or unsubscribe while it is running without
    /// affecting which callbacks get invoked for the ongoing update.
    pub(crate) fn snapshot(&self) -> Vec<(SubscriptionHandle, C)> {
        self.entries
            .iter()
            .map(|(&id, callback)| (SubscriptionHandle::new(self.observable_id, id), callback.clone()))
            .collect()
    }
}

impl<C> fmt::Debug for Registry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("observable_id", &self.observable_id)
            .field("subscriptions", &self.entries.keys())
            .finish()
    }
}

/// Invoke every callback of `subscribers` with `(old, new)`, in order.
///
/// Stops at the first callback returning an error and returns it, wrapped
/// with the handle of that callback.
pub(crate) fn fan_out<T, C, F>(
    subscribers: Vec<(SubscriptionHandle, C)>,
    old: &T,
    new: &T,
) -> Result<(), CallbackError>
where
    T: ?Sized,
    C: Deref<Target = F>,
    F: Fn(&T, &T) -> Result<(), BoxError> + ?Sized,
{
    #[cfg(feature = "tracing")]
    {
        let num_subscribers = subscribers.len();
        if num_subscribers > 0 {
            tracing::debug!("Notifying {num_subscribers} subscribers");
        } else {
            tracing::debug!("No subscribers");
        }
    }

    for (handle, callback) in subscribers {
        if let Err(source) = (*callback)(old, new) {
            #[cfg(feature = "tracing")]
            tracing::debug!(%handle, error = %source, "Subscriber failed, aborting notification");

            return Err(CallbackError::new(handle, source));
        }
    }

    Ok(())
}
