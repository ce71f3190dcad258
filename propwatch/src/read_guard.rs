use std::{cell::Ref, fmt, ops, sync::RwLockReadGuard};

/// A read guard for the inner value of an observable.
///
/// Note that as long as an `ObservableReadGuard` is kept alive, the associated
/// observable can not be updated. Setting a local `Observable` while a guard
/// is alive panics, setting a `SharedObservable` blocks until the guard is
/// dropped.
#[must_use]
#[clippy::has_significant_drop]
pub struct ObservableReadGuard<'a, T> {
    inner: Inner<'a, T>,
}

enum Inner<'a, T> {
    Local(Ref<'a, T>),
    Shared(RwLockReadGuard<'a, T>),
}

impl<'a, T> ObservableReadGuard<'a, T> {
    pub(crate) fn local(inner: Ref<'a, T>) -> Self {
        Self { inner: Inner::Local(inner) }
    }

    pub(crate) fn shared(inner: RwLockReadGuard<'a, T>) -> Self {
        Self { inner: Inner::Shared(inner) }
    }
}

impl<T: fmt::Debug> fmt::Debug for ObservableReadGuard<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

impl<T> ops::Deref for ObservableReadGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        match &self.inner {
            Inner::Local(guard) => &**guard,
            Inner::Shared(guard) => &**guard,
        }
    }
}
