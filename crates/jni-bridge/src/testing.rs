//! Test doubles for code that owns global references.
//!
//! [`RecordingAccessor`] stands in for a JVM: it records every deletion in
//! order instead of calling into JNI, and can pretend the current thread is
//! detached. Pass an `Arc<RecordingAccessor>` as the deleter of a
//! [`ScopedGlobalRef`](crate::ScopedGlobalRef), or install it as the
//! process-wide accessor.

use crate::env::{EnvAccessor, JniEnv};
use crate::kinds::{GlobalRefKind, RawObject};
use flexlayout_core::{Error, Result, OP_DELETE_GLOBAL_REF, OP_GET_ENV};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Builds a distinct, non-null fake reference. Never pass it to a real JVM.
pub fn fake_ref<T: GlobalRefKind>(id: usize) -> T {
    // Keep fake addresses aligned and away from zero.
    T::from_raw(((id + 1) << 4) as RawObject)
}

#[derive(Debug, Default)]
pub struct RecordingAccessor {
    deleted: Mutex<Vec<usize>>,
    detached: AtomicBool,
    delete_fails: AtomicBool,
}

impl RecordingAccessor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Addresses deleted so far, in deletion order.
    pub fn deleted(&self) -> Vec<usize> {
        self.deleted.lock().clone()
    }

    pub fn delete_count(&self) -> usize {
        self.deleted.lock().len()
    }

    /// Makes subsequent lookups fail as if the thread were not attached.
    pub fn set_detached(&self, detached: bool) {
        self.detached.store(detached, Ordering::SeqCst);
    }

    /// Makes the environment refuse to delete, as a JVM with a broken
    /// function table would.
    pub fn set_delete_fails(&self, fails: bool) {
        self.delete_fails.store(fails, Ordering::SeqCst);
    }

    pub fn clear(&self) {
        self.deleted.lock().clear();
    }
}

impl EnvAccessor for RecordingAccessor {
    fn with_current_env(&self, f: &mut dyn FnMut(&dyn JniEnv)) -> Result<()> {
        if self.detached.load(Ordering::SeqCst) {
            return Err(Error::ffi(OP_GET_ENV, "current thread is not attached"));
        }
        f(&RecordingEnv { accessor: self });
        Ok(())
    }
}

struct RecordingEnv<'a> {
    accessor: &'a RecordingAccessor,
}

impl JniEnv for RecordingEnv<'_> {
    unsafe fn delete_global_ref(&self, raw: RawObject) -> Result<()> {
        if self.accessor.delete_fails.load(Ordering::SeqCst) {
            return Err(Error::ffi(OP_DELETE_GLOBAL_REF, "DeleteGlobalRef is unavailable"));
        }
        self.accessor.deleted.lock().push(raw as usize);
        Ok(())
    }
}
