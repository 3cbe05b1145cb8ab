mod common;
use common::watcher;
use stable_event::*;
use std::collections::HashSet;
use std::time::Duration;

#[test]
fn test_identity_is_stable_across_reconstructions() {
    let event = StableEvent::<(), char>::new();
    let h1 = event.construct(|_| 'a');
    let h2 = event.construct(|_| 'b');
    let h3 = event.construct(|_| 'c');

    assert_eq!(h1, h2);
    assert_eq!(h2, h3);
    assert_eq!(h1.id(), h3.id());
    assert!(h1.ptr_eq(&h3));

    // identity also holds for hashing consumers
    let set: HashSet<_> = [h1, h2, h3].into_iter().collect();
    assert_eq!(set.len(), 1);
}

#[test]
fn test_handle_calls_latest_closure() {
    let event = StableEvent::<(), &str>::new();
    let handle = event.construct(|_| "A");
    event.construct(|_| "B");
    assert_eq!(handle.call(()), "B");
    assert_eq!(handle.fire(), "B");
}

#[test]
fn test_latest_closure_captures_latest_values() {
    let (accumulate, check) = watcher::<String>();
    let accumulate = std::sync::Arc::new(accumulate);
    let event = StableEvent::<(), ()>::new();

    let mut handle = None;
    for count in 0..3 {
        let accumulate = accumulate.clone();
        handle = Some(event.construct(move |_| accumulate(format!("count is {count}"))));
    }

    let Some(handle) = handle else { panic!("constructed three times") };
    handle.fire();
    handle.fire();
    assert_eq!(check(), ["count is 2", "count is 2"]);
}

#[test]
fn test_arguments_and_result_pass_through() {
    let event = StableEvent::<(i32, i32), i32>::new();
    let add = event.construct(|(x, y)| x + y);
    assert_eq!(add.call((2, 3)), 5);
}

#[derive(Debug, PartialEq)]
struct Boom(u32);

#[test]
fn test_error_result_propagates_unchanged() {
    let event = StableEvent::<(), Result<u8, Boom>>::new();
    let handle = event.construct(|_| Err(Boom(7)));
    assert_eq!(handle.call(()), Err(Boom(7)));

    event.construct(|_| Ok(1));
    assert_eq!(handle.call(()), Ok(1));
}

#[test]
#[should_panic(expected = "raised by the closure")]
fn test_panic_propagates_unchanged() {
    let event = StableEvent::<(), ()>::new();
    let handle = event.construct(|_| panic!("raised by the closure"));
    handle.fire();
}

#[test]
fn test_handle_usable_after_panic() {
    let event = StableEvent::<u8, u8>::new();
    let handle = event.construct(|_| panic!("first"));
    let probe = handle.clone();
    assert!(std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || probe.call(1))).is_err());

    event.construct(|x| x + 1);
    assert_eq!(handle.call(1), 2);
}

#[test]
fn test_same_closure_twice_is_idempotent() {
    fn double(x: u32) -> u32 { x * 2 }

    let event = StableEvent::<u32, u32>::new();
    let first = event.construct(double);
    let second = event.construct(double);
    assert_eq!(first, second);
    assert_eq!(second.call(21), 42);
}

#[test]
fn test_instances_are_isolated() {
    let one = StableEvent::<(), u8>::new();
    let two = StableEvent::<(), u8>::new();
    let h1 = one.construct(|_| 1);
    let h2 = two.construct(|_| 2);
    assert_ne!(h1, h2);

    one.construct(|_| 10);
    assert_eq!(h1.fire(), 10);
    assert_eq!(h2.fire(), 2);
}

#[test]
fn test_handle_outlives_dispose() {
    let event = StableEvent::<(), &str>::new();
    let handle = event.construct(|_| "first");
    event.construct(|_| "last");
    event.dispose();

    assert_eq!(handle.fire(), "last");
}

#[test]
fn test_reconstruct_from_inside_the_closure() {
    let event = std::sync::Arc::new(StableEvent::<(), u32>::new());
    let handle = {
        let inner = event.clone();
        event.construct(move |_| {
            inner.construct(|_| 2);
            1
        })
    };

    assert_eq!(handle.fire(), 1);
    assert_eq!(handle.fire(), 2);
}

#[test]
fn test_channel_sender_as_callback() {
    let event = StableEvent::<u32, ()>::new();
    let (tx, rx) = std::sync::mpsc::channel();
    let handle = event.construct_with(tx);
    handle.call(1);
    handle.call(2);
    assert_eq!(rx.try_iter().collect::<Vec<_>>(), [1, 2]);

    // a new sender takes over, the handle stays the same
    let (tx2, rx2) = std::sync::mpsc::channel();
    assert_eq!(event.construct_with(tx2), handle);
    handle.call(3);
    assert!(rx.try_recv().is_err());
    assert_eq!(rx2.try_recv(), Ok(3));
}

#[tokio::test(start_paused = true)]
async fn test_timer_fires_after_reconstruction_sees_new_closure() {
    let event = StableEvent::<(), &str>::new();
    let handle = event.construct(|_| "A");

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let timer = {
        let handle = handle.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            let _ = tx.send(handle.fire());
        })
    };

    event.construct(|_| "B");
    assert_eq!(rx.recv().await, Some("B"));
    timer.await.unwrap();
}

#[test]
fn test_tokio_sender_as_callback() {
    let event = StableEvent::<&str, ()>::new();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let handle = event.construct_with(tx);
    handle.call("tick");
    assert_eq!(tokio_test::block_on(rx.recv()), Some("tick"));

    drop(rx);
    // receiver gone: the send error is swallowed
    handle.call("lost");
}

#[test]
fn test_into_fn_keeps_resolving_late() {
    let event = StableEvent::<u8, u8>::new();
    let f = event.construct(|x| x).into_fn();
    event.construct(|x| x + 100);
    assert_eq!(f(1), 101);
}
