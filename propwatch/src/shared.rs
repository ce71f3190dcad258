//! This module defines a [`SharedObservable`] type that is clonable, `Send`
//! and `Sync`, and requires only `&` access to update its inner value.
//!
//! Use this in situations where the value is updated or observed from
//! multiple threads.

use std::{
    mem,
    sync::{Arc, Mutex, RwLock},
};

use crate::{
    registry::{fan_out, Registry},
    BoxError, CallbackError, ObservableReadGuard, SubscriptionHandle,
};

type Callback<T> = Arc<dyn Fn(&T, &T) -> Result<(), BoxError> + Send + Sync>;

/// A value whose changes are broadcast synchronously to subscribed callbacks,
/// usable from multiple threads.
///
/// Clones share the same value and subscribers. Callbacks run on the thread
/// that performs the update, after all internal locks have been released, so
/// they may freely call back into the observable.
#[derive(Debug)]
pub struct SharedObservable<T> {
    inner: Arc<Inner<T>>,
}

#[derive(Debug)]
struct Inner<T> {
    value: RwLock<T>,
    subscribers: Mutex<Registry<Callback<T>>>,
}

impl<T> SharedObservable<T> {
    /// Create a new `SharedObservable` with the given initial value.
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Inner {
                value: RwLock::new(value),
                subscribers: Mutex::new(Registry::new()),
            }),
        }
    }

    /// Register a callback to be invoked with `(old, new)` on every update.
    ///
    /// The callback is not invoked until the next update. Keep the returned
    /// handle to [`unsubscribe`][Self::unsubscribe] later.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionHandle
    where
        F: Fn(&T, &T) + Send + Sync + 'static,
        T: 'static,
    {
        self.insert(Arc::new(move |old: &T, new: &T| -> Result<(), BoxError> {
            callback(old, new);
            Ok(())
        }))
    }

    /// Register a fallible callback to be invoked with `(old, new)` on every
    /// update.
    ///
    /// If the callback returns an error, the update that triggered it returns
    /// a [`CallbackError`] and callbacks subscribed after this one are not
    /// invoked for that update.
    pub fn try_subscribe<F, E>(&self, callback: F) -> SubscriptionHandle
    where
        F: Fn(&T, &T) -> Result<(), E> + Send + Sync + 'static,
        E: Into<BoxError>,
        T: 'static,
    {
        self.insert(Arc::new(move |old: &T, new: &T| -> Result<(), BoxError> {
            callback(old, new).map_err(Into::into)
        }))
    }

    /// Register a callback and invoke it right away with the current value
    /// as both the old and the new value.
    ///
    /// An update racing with this call may reach the callback before the
    /// initial invocation does.
    pub fn subscribe_initial<F>(&self, callback: F) -> SubscriptionHandle
    where
        F: Fn(&T, &T) + Send + Sync + 'static,
        T: Clone + 'static,
    {
        let callback = Arc::new(callback);
        let handle = self.subscribe({
            let callback = Arc::clone(&callback);
            move |old: &T, new: &T| callback(old, new)
        });

        let current = self.get();
        callback(&current, &current);
        handle
    }

    /// Remove the callback associated with `handle`.
    ///
    /// Returns whether a callback was removed. Unsubscribing a handle that was
    /// already removed, or that belongs to another observable, does nothing.
    pub fn unsubscribe(&self, handle: &SubscriptionHandle) -> bool {
        self.inner.subscribers.lock().unwrap().remove(handle)
    }

    /// Get the number of currently subscribed callbacks.
    ///
    /// Be careful when using this. Other clones of this observable may
    /// subscribe or unsubscribe right after your call to this function.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.lock().unwrap().len()
    }

    /// Get a clone of the inner value.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.inner.value.read().unwrap().clone()
    }

    /// Read the inner value without cloning it.
    ///
    /// While the returned read guard is alive, nobody can update the inner
    /// value. If you want to update the value based on the previous value, do
    /// **not** use this method because it can cause races with other clones of
    /// the same `SharedObservable`. Call [`update`][Self::update] instead.
    pub fn read(&self) -> ObservableReadGuard<'_, T> {
        ObservableReadGuard::shared(self.inner.value.read().unwrap())
    }

    /// Set the inner value to the given `value`, notify subscribers and return
    /// the previous value.
    ///
    /// The callbacks that get notified are the ones subscribed at the moment
    /// the value is replaced; subscribing or unsubscribing from within a
    /// callback only takes effect for later updates. If a callback fails, the
    /// value stays updated and the error is returned without notifying the
    /// remaining callbacks.
    pub fn set(&self, value: T) -> Result<T, CallbackError>
    where
        T: Clone,
    {
        let new = value.clone();
        let (old, subscribers) = {
            let mut guard = self.inner.value.write().unwrap();
            let old = mem::replace(&mut *guard, value);
            (old, self.snapshot())
        };

        fan_out(subscribers, &old, &new)?;
        Ok(old)
    }

    /// Update the inner value in place and notify subscribers.
    ///
    /// Subscribers are notified even if `f` doesn't actually change the value.
    pub fn update(&self, f: impl FnOnce(&mut T)) -> Result<(), CallbackError>
    where
        T: Clone,
    {
        let (old, new, subscribers) = {
            let mut guard = self.inner.value.write().unwrap();
            let old = guard.clone();
            f(&mut *guard);
            (old, guard.clone(), self.snapshot())
        };

        fan_out(subscribers, &old, &new)
    }

    fn insert(&self, callback: Callback<T>) -> SubscriptionHandle {
        self.inner.subscribers.lock().unwrap().insert(callback)
    }

    /// Must be called with the value write lock held, so the snapshot matches
    /// the update being broadcast.
    fn snapshot(&self) -> Vec<(SubscriptionHandle, Callback<T>)> {
        self.inner.subscribers.lock().unwrap().snapshot()
    }
}

impl<T> Clone for SharedObservable<T> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<T: Default> Default for SharedObservable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
