//! Observe changes of a value through synchronous callbacks.
//!
//! This crate implements a one-to-many form of the [Observer pattern][]: an
//! [`Observable<T>`] wraps a value, any number of independent callbacks
//! subscribe to it, and every update invokes all of them with the previous and
//! the new value before the update call returns.
//!
//! Subscribing returns a [`SubscriptionHandle`]. The subscriber owns that
//! handle and passes it back to `unsubscribe` once it is no longer
//! interested. Nothing is removed automatically.
//!
//! There is also [`SharedObservable<T>`] as another variation which implements
//! [`Clone`], `Send` and `Sync`, for values updated or observed from multiple
//! threads.
//!
//! Here is a quick walk-through:
//!
//! ```
//! use std::{cell::RefCell, rc::Rc};
//!
//! use propwatch::Observable;
//!
//! let age = Observable::new(5);
//! let log = Rc::new(RefCell::new(Vec::new()));
//!
//! let walker = age.subscribe({
//!     let log = Rc::clone(&log);
//!     move |old: &u32, new: &u32| log.borrow_mut().push(("walker", *old, *new))
//! });
//! let _groomer = age.subscribe({
//!     let log = Rc::clone(&log);
//!     move |old: &u32, new: &u32| log.borrow_mut().push(("groomer", *old, *new))
//! });
//!
//! // Callbacks run in the order they were subscribed, before `set` returns.
//! // `set` hands back the previous value.
//! assert_eq!(age.set(6).unwrap(), 5);
//! assert_eq!(*log.borrow(), [("walker", 5, 6), ("groomer", 5, 6)]);
//!
//! // Unsubscribing twice is fine, the second call just does nothing.
//! assert!(age.unsubscribe(&walker));
//! assert!(!age.unsubscribe(&walker));
//!
//! log.borrow_mut().clear();
//! age.update(|age| *age += 1).unwrap();
//! assert_eq!(*log.borrow(), [("groomer", 6, 7)]);
//! assert_eq!(age.get(), 7);
//! ```
//!
//! Callbacks registered through `try_subscribe` may fail. The first failure
//! stops the notification and is returned from the update as a
//! [`CallbackError`]:
//!
//! ```
//! use propwatch::Observable;
//!
//! let level = Observable::new(0_u8);
//! let handle = level.try_subscribe(|_old: &u8, new: &u8| {
//!     if *new > 10 {
//!         return Err(format!("level {new} is too high"));
//!     }
//!     Ok(())
//! });
//!
//! let error = level.set(11).unwrap_err();
//! assert_eq!(error.handle(), handle);
//! // The value was updated regardless.
//! assert_eq!(level.get(), 11);
//! ```
//!
//! Cargo features:
//!
//! - `tracing`: Emit [tracing] events when subscribers are added, removed
//!   and notified
//!
//! [Observer pattern]: https://en.wikipedia.org/wiki/Observer_pattern
#![warn(missing_debug_implementations, missing_docs, rust_2018_idioms, unreachable_pub)]

mod error;
mod handle;
pub mod local;
mod read_guard;
mod registry;
pub mod shared;

#[doc(inline)]
pub use error::{BoxError, CallbackError};
#[doc(inline)]
pub use handle::SubscriptionHandle;
#[doc(inline)]
pub use local::Observable;
#[doc(inline)]
pub use read_guard::ObservableReadGuard;
#[doc(inline)]
pub use shared::SharedObservable;
