//! How a [`ScopedGlobalRef`] frees the reference it owns.
//!
//! [`ScopedGlobalRef`]: crate::ScopedGlobalRef

use crate::config::{bridge_config, ReleaseFailurePolicy};
use crate::env::{self, EnvAccessor, JniEnv};
use crate::kinds::RawObject;
use flexlayout_core::{Error, Result};
use std::sync::Arc;
use tracing::{error, trace};

/// Frees non-null global references on behalf of a [`ScopedGlobalRef`].
///
/// Deletion is infallible from the wrapper's point of view; implementations
/// deal with their own failures.
///
/// [`ScopedGlobalRef`]: crate::ScopedGlobalRef
pub trait GlobalRefDeleter {
    /// Frees `raw`. Called at most once per owned value.
    ///
    /// # Safety
    /// `raw` must be a live, non-null global reference owned by the caller.
    unsafe fn delete_global_ref(&self, java_type: &'static str, raw: RawObject);
}

/// Deletes through the accessor registered with [`install_accessor`].
///
/// Zero-sized, so a `ScopedGlobalRef<T>` is the size of one pointer.
///
/// [`install_accessor`]: crate::install_accessor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AmbientDeleter;

impl GlobalRefDeleter for AmbientDeleter {
    unsafe fn delete_global_ref(&self, java_type: &'static str, raw: RawObject) {
        let mut deleted = Ok(());
        let outcome = env::with_current_env(&mut |env: &dyn JniEnv| {
            // SAFETY: forwarded from the caller.
            deleted = unsafe { env.delete_global_ref(raw) };
        });
        finish_release(java_type, raw, outcome.and(deleted));
    }
}

impl<A> GlobalRefDeleter for Arc<A>
where
    A: EnvAccessor + ?Sized,
{
    unsafe fn delete_global_ref(&self, java_type: &'static str, raw: RawObject) {
        let mut deleted = Ok(());
        let outcome = self.with_current_env(&mut |env: &dyn JniEnv| {
            // SAFETY: forwarded from the caller.
            deleted = unsafe { env.delete_global_ref(raw) };
        });
        finish_release(java_type, raw, outcome.and(deleted));
    }
}

fn finish_release(java_type: &'static str, raw: RawObject, outcome: Result<()>) {
    match outcome {
        Ok(()) => trace!(java_type, address = ?raw, "global_ref_deleted"),
        Err(err) => on_release_failure(java_type, raw, err),
    }
}

fn on_release_failure(java_type: &'static str, raw: RawObject, err: Error) {
    match bridge_config().on_release_failure {
        ReleaseFailurePolicy::Panic if !std::thread::panicking() => {
            panic!("failed to delete global reference to {java_type} at {raw:p}: {err}");
        }
        policy => {
            error!(
                java_type,
                address = ?raw,
                %policy,
                error = %err,
                "global_ref_leaked"
            );
        }
    }
}
