use std::{
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex,
    },
    thread,
};

use propwatch::SharedObservable;

type SyncLog = Arc<Mutex<Vec<(&'static str, i32, i32)>>>;

fn sync_recorder(log: &SyncLog, name: &'static str) -> impl Fn(&i32, &i32) + Send + Sync + 'static {
    let log = Arc::clone(log);
    move |old: &i32, new: &i32| log.lock().unwrap().push((name, *old, *new))
}

#[test]
fn two_subscribers_then_unsubscribe() {
    let log = SyncLog::default();
    let ob = SharedObservable::new(5);
    let x = ob.subscribe(sync_recorder(&log, "x"));
    ob.subscribe(sync_recorder(&log, "y"));

    assert_eq!(ob.set(6).unwrap(), 5);
    assert_eq!(*log.lock().unwrap(), [("x", 5, 6), ("y", 5, 6)]);

    log.lock().unwrap().clear();
    assert!(ob.unsubscribe(&x));
    assert!(!ob.unsubscribe(&x));
    ob.set(7).unwrap();
    assert_eq!(*log.lock().unwrap(), [("y", 6, 7)]);
}

#[test]
fn clones_share_subscribers() {
    let log = SyncLog::default();
    let ob = SharedObservable::new(0);
    let clone = ob.clone();
    let handle = clone.subscribe(sync_recorder(&log, "a"));

    ob.set(1).unwrap();
    assert_eq!(clone.get(), 1);
    assert_eq!(*log.lock().unwrap(), [("a", 0, 1)]);

    assert!(ob.unsubscribe(&handle));
    assert_eq!(clone.subscriber_count(), 0);
}

#[test]
fn callbacks_may_reenter() {
    let log = SyncLog::default();
    let ob = SharedObservable::new(0);
    let subscribed = AtomicBool::new(false);

    ob.subscribe({
        let ob = ob.clone();
        let log = Arc::clone(&log);
        move |_, new: &i32| {
            // Locks are released while callbacks run, so none of these
            // deadlock.
            assert_eq!(ob.get(), *new);
            assert_eq!(*ob.read(), *new);
            if !subscribed.swap(true, Ordering::SeqCst) {
                ob.subscribe(sync_recorder(&log, "late"));
            }
        }
    });

    ob.set(1).unwrap();
    assert!(log.lock().unwrap().is_empty());
    assert_eq!(ob.subscriber_count(), 2);

    ob.set(2).unwrap();
    assert_eq!(*log.lock().unwrap(), [("late", 1, 2)]);
}

#[test]
fn nested_set_from_callback() {
    let log = SyncLog::default();
    let ob = SharedObservable::new(0);

    // Clamp values above 10, from within the notification.
    ob.subscribe({
        let ob = ob.clone();
        move |_, new: &i32| {
            if *new > 10 {
                ob.set(10).unwrap();
            }
        }
    });
    ob.subscribe(sync_recorder(&log, "b"));

    ob.set(15).unwrap();
    assert_eq!(ob.get(), 10);
    assert_eq!(*log.lock().unwrap(), [("b", 15, 10), ("b", 0, 15)]);
}

#[test]
fn failing_callback_stops_fan_out() {
    let log = SyncLog::default();
    let ob = SharedObservable::new(0);
    ob.subscribe(sync_recorder(&log, "a"));
    let failing = ob.try_subscribe(|_, _| Err::<(), _>("rejected"));
    ob.subscribe(sync_recorder(&log, "c"));

    let error = ob.update(|value| *value += 1).unwrap_err();
    assert_eq!(error.handle(), failing);
    assert_eq!(error.into_inner().to_string(), "rejected");
    assert_eq!(*log.lock().unwrap(), [("a", 0, 1)]);
    assert_eq!(ob.get(), 1);
}

#[test]
fn subscribe_initial_fires_immediately() {
    let log = SyncLog::default();
    let ob = SharedObservable::new(8);
    ob.subscribe_initial(sync_recorder(&log, "a"));
    ob.set(9).unwrap();

    assert_eq!(*log.lock().unwrap(), [("a", 8, 8), ("a", 8, 9)]);
}

#[test]
#[cfg_attr(miri, ignore)]
fn separate_threads() {
    let ob = SharedObservable::new(0);
    let notifications = Arc::new(AtomicUsize::new(0));
    ob.subscribe({
        let notifications = Arc::clone(&notifications);
        move |old: &i32, new: &i32| {
            assert_ne!(old, new);
            notifications.fetch_add(1, Ordering::SeqCst);
        }
    });

    let handles: Vec<_> = (1..=8)
        .map(|i| {
            let ob = ob.clone();
            thread::spawn(move || {
                for j in 0..32 {
                    ob.set(i * 100 + j).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(notifications.load(Ordering::SeqCst), 8 * 32);
}
