//! This module defines a single-threaded [`Observable`] type.
//!
//! All of its methods take `&self`, so it can be put behind an `Rc` and be
//! reached from inside its own callbacks. It is neither `Send` nor `Sync`; use
//! [`SharedObservable`](crate::SharedObservable) to observe a value across
//! threads.

use std::{cell::RefCell, rc::Rc};

use crate::{
    registry::{fan_out, Registry},
    BoxError, CallbackError, ObservableReadGuard, SubscriptionHandle,
};

type Callback<T> = Rc<dyn Fn(&T, &T) -> Result<(), BoxError>>;

/// A value whose changes are broadcast synchronously to subscribed callbacks.
///
/// Every callback receives the previous and the new value, in the order the
/// callbacks were subscribed. The caller of [`set`][Self::set] only regains
/// control once all callbacks have run.
#[derive(Debug)]
pub struct Observable<T> {
    value: RefCell<T>,
    subscribers: RefCell<Registry<Callback<T>>>,
}

impl<T> Observable<T> {
    /// Create a new `Observable` with the given initial value.
    pub fn new(value: T) -> Self {
        Self { value: RefCell::new(value), subscribers: RefCell::new(Registry::new()) }
    }

    /// Register a callback to be invoked with `(old, new)` on every update.
    ///
    /// The callback is not invoked until the next update. Keep the returned
    /// handle to [`unsubscribe`][Self::unsubscribe] later.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionHandle
    where
        F: Fn(&T, &T) + 'static,
        T: 'static,
    {
        self.insert(Rc::new(move |old: &T, new: &T| -> Result<(), BoxError> {
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
        F: Fn(&T, &T) -> Result<(), E> + 'static,
        E: Into<BoxError>,
        T: 'static,
    {
        self.insert(Rc::new(move |old: &T, new: &T| -> Result<(), BoxError> {
            callback(old, new).map_err(Into::into)
        }))
    }

    /// Register a callback and invoke it right away with the current value
    /// as both the old and the new value.
    ///
    /// After that, the callback behaves like one registered through
    /// [`subscribe`][Self::subscribe].
    pub fn subscribe_initial<F>(&self, callback: F) -> SubscriptionHandle
    where
        F: Fn(&T, &T) + 'static,
        T: Clone + 'static,
    {
        let callback = Rc::new(callback);
        let handle = self.subscribe({
            let callback = Rc::clone(&callback);
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
        self.subscribers.borrow_mut().remove(handle)
    }

    /// Get the number of currently subscribed callbacks.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    /// Get a clone of the inner value.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.value.borrow().clone()
    }

    /// Read the inner value without cloning it.
    ///
    /// The observable can not be updated while the returned guard is alive,
    /// attempting to do so panics.
    pub fn read(&self) -> ObservableReadGuard<'_, T> {
        ObservableReadGuard::local(self.value.borrow())
    }

    /// Set the inner value to the given `value`, notify subscribers and return
    /// the previous value.
    ///
    /// The callbacks that get notified are the ones subscribed when this is
    /// called; subscribing or unsubscribing from within a callback only takes
    /// effect for later updates. If a callback fails, the value stays updated
    /// and the error is returned without notifying the remaining callbacks.
    pub fn set(&self, value: T) -> Result<T, CallbackError>
    where
        T: Clone,
    {
        let new = value.clone();
        let old = self.value.replace(value);
        self.notify(&old, &new)?;
        Ok(old)
    }

    /// Update the inner value in place and notify subscribers.
    ///
    /// Subscribers are notified even if `f` doesn't actually change the value.
    pub fn update(&self, f: impl FnOnce(&mut T)) -> Result<(), CallbackError>
    where
        T: Clone,
    {
        let (old, new) = {
            let mut value = self.value.borrow_mut();
            let old = value.clone();
            f(&mut *value);
            (old, value.clone())
        };
        self.notify(&old, &new)
    }

    fn insert(&self, callback: Callback<T>) -> SubscriptionHandle {
        self.subscribers.borrow_mut().insert(callback)
    }

    fn notify(&self, old: &T, new: &T) -> Result<(), CallbackError> {
        // The borrow ends here, before any callback runs.
        let subscribers = self.subscribers.borrow().snapshot();
        fan_out(subscribers, old, new)
    }
}

impl<T: Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
