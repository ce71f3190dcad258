#![allow(missing_docs)]

use std::{cell::RefCell, rc::Rc};

mod shared;

/// Records `(subscriber, old, new)` for every notification, in call order.
type Log = Rc<RefCell<Vec<(&'static str, i32, i32)>>>;

fn log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

fn recorder(log: &Log, name: &'static str) -> impl Fn(&i32, &i32) + 'static {
    let log = Rc::clone(log);
    move |old: &i32, new: &i32| log.borrow_mut().push((name, *old, *new))
}
