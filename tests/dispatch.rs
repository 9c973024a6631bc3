//! Integration tests for signal dispatch: which observer collections a call reaches, and in
//! what order.

use std::any::Any;
use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use wormhole_signal::{ObserverKind, Payload, Signal, TypeTag};

type Log = Arc<Mutex<Vec<String>>>;

fn log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

fn push(log: &Log, entry: impl Into<String>) {
    log.lock().unwrap().push(entry.into());
}

/// Subscribes one observer of every kind, each recording its own label.
fn observe_everything(signal: &Signal, log: &Log) {
    let l = log.clone();
    signal.subscribe(move || push(&l, "no-arg"));
    let l = log.clone();
    signal.subscribe_any_call(move |payload| match payload {
        Some(p) => push(&l, format!("any-call {}", p.tag())),
        None => push(&l, "any-call none"),
    });
    let l = log.clone();
    signal.subscribe_any_value(move |p: &Payload<'_>| push(&l, format!("any-value {}", p.tag())));
    let l = log.clone();
    signal.subscribe_typed(move |v: &i32| push(&l, format!("i32 {v}")));
    let l = log.clone();
    signal.subscribe_typed(move |v: &f32| push(&l, format!("f32 {v}")));
    let l = log.clone();
    signal.subscribe_typed(move |v: &String| push(&l, format!("String {v}")));
}

#[test]
fn test_call_without_value_reaches_no_arg_and_any_call_only() {
    let signal = Signal::new("Tick");
    let events = log();
    observe_everything(&signal, &events);

    signal.call();

    assert_eq!(*events.lock().unwrap(), vec!["no-arg", "any-call none"]);
}

#[test]
fn test_call_with_value_skips_no_arg() {
    let signal = Signal::new("Tick");
    let events = log();
    observe_everything(&signal, &events);

    signal.call_with(5i32);

    assert_eq!(
        *events.lock().unwrap(),
        vec!["any-call i32", "any-value i32", "i32 5"]
    );
}

#[test]
fn test_float_observer_ignores_int_payload() {
    let signal = Signal::new("Tick");
    let events = log();
    let l = events.clone();
    signal.subscribe_typed(move |v: &f32| push(&l, format!("f32 {v}")));

    signal.call_with(3i32);
    assert!(events.lock().unwrap().is_empty());

    signal.call_with(3.0f32);
    assert_eq!(*events.lock().unwrap(), vec!["f32 3"]);
}

#[test]
fn test_no_supertype_matching() {
    let signal = Signal::new("Tick");
    let events = log();
    let l = events.clone();
    signal.subscribe_typed(move |_: &Box<dyn Any>| push(&l, "boxed"));
    let l = events.clone();
    signal.subscribe_tagged(TypeTag::any(), move |_| push(&l, "any bucket"));

    signal.call_with(String::from("x"));
    let boxed: Box<dyn Any> = Box::new(1u8);
    signal.call_any(boxed.as_ref());

    assert!(events.lock().unwrap().is_empty());
}

#[test]
fn test_declared_type_routing() {
    trait Shape: Send + Sync {
        fn sides(&self) -> u32;
    }
    struct Square;
    impl Shape for Square {
        fn sides(&self) -> u32 {
            4
        }
    }

    let signal = Signal::new("ShapeSpawned");
    let events = log();
    let l = events.clone();
    signal.subscribe_typed(move |shape: &Box<dyn Shape>| {
        push(&l, format!("shape with {} sides", shape.sides()))
    });
    let l = events.clone();
    signal.subscribe_typed(move |_: &Square| push(&l, "square"));

    let shape: Box<dyn Shape> = Box::new(Square);
    signal.call_with(shape);
    signal.call_with(Square);

    assert_eq!(*events.lock().unwrap(), vec!["shape with 4 sides", "square"]);
}

#[test]
fn test_observers_fire_in_subscription_order() {
    let signal = Signal::new("Ordered");
    let events = log();
    for i in 0..5 {
        let l = events.clone();
        signal.subscribe_typed(move |_: &u8| push(&l, format!("{i}")));
    }

    signal.call_with(0u8);

    assert_eq!(*events.lock().unwrap(), vec!["0", "1", "2", "3", "4"]);
}

#[test]
fn test_any_value_sees_payload() {
    let signal = Signal::new("Damage");
    let total = Arc::new(Mutex::new(0i64));
    let t = total.clone();
    signal.subscribe_any_value(move |p| {
        if let Some(v) = p.downcast_ref::<i64>() {
            *t.lock().unwrap() += v;
        }
    });

    signal.call_with(10i64);
    signal.call_with(5i64);
    signal.call_with("ignored");

    assert_eq!(*total.lock().unwrap(), 15);
}

#[test]
fn test_unit_variants_under_typed_and_any_buckets() {
    let signal = Signal::new("Ping");
    let events = log();
    let l = events.clone();
    signal.subscribe_typed_unit::<i32>(move || push(&l, "i32 bucket"));
    let l = events.clone();
    signal.subscribe_tagged_unit(TypeTag::any(), move || push(&l, "any bucket"));

    signal.call_with(1i32);
    signal.call_tagged(TypeTag::any(), &1i32);

    assert_eq!(*events.lock().unwrap(), vec!["i32 bucket", "any bucket"]);
}

#[test]
fn test_unsubscribe_every_kind() {
    let signal = Signal::new("All");
    let tokens = [
        signal.subscribe(|| {}),
        signal.subscribe_any_call(|_| {}),
        signal.subscribe_any_call_unit(|| {}),
        signal.subscribe_any_value(|_| {}),
        signal.subscribe_any_value_unit(|| {}),
        signal.subscribe_tagged(TypeTag::of::<u16>(), |_| {}),
        signal.subscribe_tagged_unit(TypeTag::any(), || {}),
        signal.subscribe_typed(|_: &u16| {}),
        signal.subscribe_typed_unit::<u16>(|| {}),
    ];
    assert_eq!(signal.observer_count(ObserverKind::AnyCall), 2);
    assert_eq!(
        signal.observer_count(ObserverKind::Typed(TypeTag::of::<u16>())),
        3
    );

    for token in tokens {
        assert!(signal.unsubscribe(token));
        assert!(!signal.unsubscribe(token));
    }
    assert!(!signal.has_observers());
}

#[test]
fn test_observer_may_call_signal_again() {
    let signal = Arc::new(Signal::new("Chain"));
    let events = log();

    let inner = Arc::downgrade(&signal);
    let l = events.clone();
    signal.subscribe_typed(move |depth: &u32| {
        push(&l, format!("depth {depth}"));
        if *depth < 2 {
            if let Some(signal) = inner.upgrade() {
                signal.call_with(depth + 1);
            }
        }
    });

    signal.call_with(0u32);

    assert_eq!(
        *events.lock().unwrap(),
        vec!["depth 0", "depth 1", "depth 2"]
    );
}

#[test]
fn test_calls_from_several_threads() {
    let signal = Arc::new(Signal::new("Shared"));
    let hits = Arc::new(Mutex::new(0u32));
    let h = hits.clone();
    signal.subscribe_typed(move |n: &u32| *h.lock().unwrap() += n);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let signal = signal.clone();
            std::thread::spawn(move || {
                for _ in 0..25 {
                    signal.call_with(1u32);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(*hits.lock().unwrap(), 100);
}
