//! Access to the JNI environment of the calling thread.
//!
//! The bridge never attaches threads or caches a `JNIEnv`. Whoever owns the
//! JVM provides an [`EnvAccessor`]; the ambient release path looks it up
//! through the process-wide slot filled by [`install_accessor`].

use crate::kinds::RawObject;
use flexlayout_core::{Error, Result, OP_GET_ENV};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::debug;

/// The interop execution context valid for the calling thread.
pub trait JniEnv {
    /// Frees a global reference.
    ///
    /// Fails only when the environment cannot perform the call at all; the
    /// reference is then still alive.
    ///
    /// # Safety
    /// `raw` must be a live, non-null global reference that nothing else
    /// will delete.
    unsafe fn delete_global_ref(&self, raw: RawObject) -> Result<()>;
}

/// Resolves the [`JniEnv`] for the calling thread.
pub trait EnvAccessor: Send + Sync {
    /// Runs `f` with the environment of the current thread.
    ///
    /// Fails if the thread has no usable environment, e.g. it is not
    /// attached to the JVM.
    fn with_current_env(&self, f: &mut dyn FnMut(&dyn JniEnv)) -> Result<()>;
}

impl<A> EnvAccessor for Arc<A>
where
    A: EnvAccessor + ?Sized,
{
    fn with_current_env(&self, f: &mut dyn FnMut(&dyn JniEnv)) -> Result<()> {
        (**self).with_current_env(f)
    }
}

static ACCESSOR: OnceCell<Box<dyn EnvAccessor>> = OnceCell::new();

/// Registers the process-wide accessor used by [`AmbientDeleter`].
///
/// Can only be done once per process.
///
/// [`AmbientDeleter`]: crate::AmbientDeleter
pub fn install_accessor<A>(accessor: A) -> Result<()>
where
    A: EnvAccessor + 'static,
{
    ACCESSOR
        .set(Box::new(accessor))
        .map_err(|_| Error::configuration("a JNI environment accessor is already installed"))?;
    debug!(
        accessor = std::any::type_name::<A>(),
        "jni_env_accessor_installed"
    );
    Ok(())
}

/// Whether [`install_accessor`] has been called.
pub fn accessor_installed() -> bool {
    ACCESSOR.get().is_some()
}

/// Runs `f` with the current thread's environment from the installed accessor.
pub fn with_current_env(f: &mut dyn FnMut(&dyn JniEnv)) -> Result<()> {
    let accessor = ACCESSOR.get().ok_or_else(|| {
        Error::ffi(OP_GET_ENV, "no JNI environment accessor has been installed")
    })?;
    accessor.with_current_env(f)
}
