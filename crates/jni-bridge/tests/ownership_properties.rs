//! Ownership properties of ScopedGlobalRef with an injected deleter
//!
//! Every test owns its own RecordingAccessor, so deletions are counted per
//! test. Tests that flip the process-wide release failure policy run serially.

mod common;

use common::EventCapture;
use flexlayout_jni_bridge::testing::{fake_ref, RecordingAccessor};
use flexlayout_jni_bridge::{
    bridge_config, set_bridge_config, BridgeConfig, GlobalRefKind, JClass, JIntArray, JObject,
    JString, JThrowable, ReleaseFailurePolicy, ScopedGlobalRef,
};
use proptest::prelude::*;
use serial_test::serial;
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use tracing::Level;

type Recorded<T> = ScopedGlobalRef<T, Arc<RecordingAccessor>>;

fn adopt<T: GlobalRefKind>(value: T, recorder: &Arc<RecordingAccessor>) -> Recorded<T> {
    // SAFETY: fake handles are only ever seen by the recording accessor.
    unsafe { ScopedGlobalRef::with_deleter(value, Arc::clone(recorder)) }
}

fn addr<T: GlobalRefKind>(value: T) -> usize {
    value.as_raw() as usize
}

/// Operations a caller can perform on one wrapper.
#[derive(Debug, Clone)]
enum Op {
    ResetFresh,
    ResetSame,
    ResetNull,
    Clear,
    Release,
    TakeAndDrop,
    TakeAndKeep,
    MoveFromFresh,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::ResetFresh),
        Just(Op::ResetSame),
        Just(Op::ResetNull),
        Just(Op::Clear),
        Just(Op::Release),
        Just(Op::TakeAndDrop),
        Just(Op::TakeAndKeep),
        Just(Op::MoveFromFresh),
    ]
}

proptest! {
    #[test]
    fn prop_each_held_reference_is_deleted_at_most_once(
        start_empty in any::<bool>(),
        ops in prop::collection::vec(op_strategy(), 0..40),
    ) {
        let recorder = RecordingAccessor::new();
        let mut next_id = 0usize;
        let mut fresh = || {
            next_id += 1;
            fake_ref::<JObject>(next_id)
        };

        let mut held_ever: HashSet<usize> = HashSet::new();
        let mut released: HashSet<usize> = HashSet::new();
        let mut kept = Vec::new();

        let initial = if start_empty { JObject::NULL } else { fresh() };
        if !initial.is_null() {
            held_ever.insert(addr(initial));
        }
        let mut scoped = adopt(initial, &recorder);

        for op in ops {
            match op {
                Op::ResetFresh => {
                    let value = fresh();
                    held_ever.insert(addr(value));
                    unsafe { scoped.reset(value) };
                }
                Op::ResetSame => {
                    let current = scoped.get();
                    let before = recorder.delete_count();
                    unsafe { scoped.reset(current) };
                    prop_assert_eq!(recorder.delete_count(), before);
                    prop_assert_eq!(scoped.get(), current);
                }
                Op::ResetNull => unsafe { scoped.reset(JObject::NULL) },
                Op::Clear => scoped.clear(),
                Op::Release => {
                    let value = scoped.release();
                    if !value.is_null() {
                        released.insert(addr(value));
                    }
                    prop_assert!(!scoped.is_valid());
                }
                Op::TakeAndDrop => drop(scoped.take()),
                Op::TakeAndKeep => {
                    kept.push(scoped.take());
                    prop_assert!(!scoped.is_valid());
                }
                Op::MoveFromFresh => {
                    let value = fresh();
                    held_ever.insert(addr(value));
                    let mut source = adopt(value, &recorder);
                    scoped.move_from(&mut source);
                    prop_assert!(!source.is_valid());
                    prop_assert_eq!(scoped.get(), value);
                }
            }
        }

        drop(scoped);
        drop(kept);

        let deleted = recorder.deleted();
        let unique: HashSet<usize> = deleted.iter().copied().collect();
        prop_assert_eq!(unique.len(), deleted.len(), "a reference was deleted twice");
        prop_assert!(unique.is_disjoint(&released), "a released reference was deleted");

        let accounted: HashSet<usize> = unique.union(&released).copied().collect();
        prop_assert_eq!(accounted, held_ever, "a held reference leaked");
    }
}

#[test]
fn test_scope_exit_deletes_exactly_once() {
    let recorder = RecordingAccessor::new();
    let v: JThrowable = fake_ref(42);
    {
        let _scoped = adopt(v, &recorder);
    }
    assert_eq!(recorder.deleted(), vec![addr(v)]);
}

#[test]
fn test_release_then_drop_deletes_nothing() {
    let recorder = RecordingAccessor::new();
    let v: JIntArray = fake_ref(1);
    let mut scoped = adopt(v, &recorder);
    assert_eq!(scoped.release(), v);
    drop(scoped);
    assert_eq!(recorder.delete_count(), 0);
}

#[test]
fn test_released_reference_can_be_rewrapped() {
    let recorder = RecordingAccessor::new();
    let v: JObject = fake_ref(3);
    let mut first = adopt(v, &recorder);
    let second = adopt(first.release(), &recorder);
    drop(first);
    drop(second);
    assert_eq!(recorder.deleted(), vec![addr(v)]);
}

#[test]
fn test_wrappers_for_different_references_do_not_interact() {
    let recorder = RecordingAccessor::new();
    let a = adopt(fake_ref::<JObject>(1), &recorder);
    let b = adopt(fake_ref::<JObject>(2), &recorder);
    drop(b);
    assert_eq!(recorder.deleted(), vec![addr(fake_ref::<JObject>(2))]);
    assert!(a.is_valid());
}

#[test]
fn test_wrapper_can_be_dropped_on_another_thread() {
    let recorder = RecordingAccessor::new();
    let v: JObject = fake_ref(8);
    let scoped = adopt(v, &recorder);

    thread::spawn(move || drop(scoped))
        .join()
        .expect("worker thread panicked");

    assert_eq!(recorder.deleted(), vec![addr(v)]);
}

#[test]
fn test_cached_wrappers_across_threads() {
    let recorder = RecordingAccessor::new();
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let recorder = Arc::clone(&recorder);
            thread::spawn(move || {
                let mut scoped = adopt(fake_ref::<JObject>(i * 2), &recorder);
                unsafe { scoped.reset(fake_ref(i * 2 + 1)) };
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker thread panicked");
    }

    let mut deleted = recorder.deleted();
    deleted.sort_unstable();
    let mut expected: Vec<usize> = (0..16).map(|i| addr(fake_ref::<JObject>(i))).collect();
    expected.sort_unstable();
    assert_eq!(deleted, expected);
}

#[test]
#[serial]
fn test_leak_policy_logs_and_keeps_going() {
    let previous = bridge_config();
    set_bridge_config(BridgeConfig {
        on_release_failure: ReleaseFailurePolicy::Leak,
    });

    let recorder = RecordingAccessor::new();
    recorder.set_detached(true);
    let value: JObject = fake_ref(1);
    let scoped = adopt(value, &recorder);

    let capture = EventCapture::default();
    capture.run(|| drop(scoped));
    set_bridge_config(previous);

    assert_eq!(recorder.delete_count(), 0);
    let leaked = capture.named("global_ref_leaked");
    assert_eq!(leaked.len(), 1);
    assert_eq!(leaked[0].level, Level::ERROR);
    assert_eq!(leaked[0].field("java_type"), Some("java.lang.Object"));
    assert_eq!(leaked[0].field("address"), Some(format!("{:?}", value.as_raw()).as_str()));
    assert_eq!(leaked[0].field("policy"), Some("leak"));
    assert!(capture.named("global_ref_deleted").is_empty());
}

#[test]
#[serial]
fn test_failed_delete_call_is_not_reported_as_deleted() {
    let previous = bridge_config();
    set_bridge_config(BridgeConfig {
        on_release_failure: ReleaseFailurePolicy::Leak,
    });

    let recorder = RecordingAccessor::new();
    recorder.set_delete_fails(true);
    let scoped = adopt(fake_ref::<JString>(2), &recorder);

    let capture = EventCapture::default();
    capture.run(|| drop(scoped));
    set_bridge_config(previous);

    assert_eq!(recorder.delete_count(), 0);
    assert!(capture.named("global_ref_deleted").is_empty());
    let leaked = capture.named("global_ref_leaked");
    assert_eq!(leaked.len(), 1);
    assert_eq!(leaked[0].field("java_type"), Some("java.lang.String"));
    assert!(leaked[0]
        .field("error")
        .is_some_and(|error| error.contains("DeleteGlobalRef")));
}

#[test]
fn test_successful_delete_is_traced() {
    let recorder = RecordingAccessor::new();
    let scoped = adopt(fake_ref::<JClass>(3), &recorder);

    let capture = EventCapture::default();
    capture.run(|| drop(scoped));

    let deleted = capture.named("global_ref_deleted");
    assert_eq!(deleted.len(), 1);
    assert_eq!(deleted[0].level, Level::TRACE);
    assert_eq!(deleted[0].field("java_type"), Some("java.lang.Class"));
}

#[test]
#[serial]
fn test_panic_policy_panics_on_detached_thread() {
    let previous = bridge_config();
    set_bridge_config(BridgeConfig {
        on_release_failure: ReleaseFailurePolicy::Panic,
    });

    let recorder = RecordingAccessor::new();
    recorder.set_detached(true);
    let mut scoped = adopt(fake_ref::<JObject>(1), &recorder);
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| scoped.clear()));

    set_bridge_config(previous);

    assert!(outcome.is_err());
    assert_eq!(recorder.delete_count(), 0);
    // Nothing was deleted, so the wrapper still owns the reference.
    assert!(scoped.is_valid());
    let _ = scoped.release();
}
