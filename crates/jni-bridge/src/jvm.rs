//! [`EnvAccessor`] backed by a running JVM through the `jni` crate.

use crate::env::{EnvAccessor, JniEnv};
use crate::kinds::RawObject;
use flexlayout_core::{Error, Result, OP_DELETE_GLOBAL_REF, OP_GET_ENV};
use jni::{sys, JavaVM};

/// Resolves the calling thread's `JNIEnv` with `GetEnv`.
///
/// Threads are never attached here; dropping a global reference on a thread
/// the JVM doesn't know about fails the lookup and falls under the
/// configured release failure policy.
pub struct JavaVmAccessor {
    vm: JavaVM,
}

impl JavaVmAccessor {
    pub fn new(vm: JavaVM) -> Self {
        Self { vm }
    }

    /// Wraps the `JavaVM*` handed to `JNI_OnLoad`.
    ///
    /// # Safety
    /// `raw` must point to a live `JavaVM` that outlives the accessor.
    pub unsafe fn from_raw(raw: *mut sys::JavaVM) -> Result<Self> {
        let vm = JavaVM::from_raw(raw)
            .map_err(|e| Error::ffi(OP_GET_ENV, format!("invalid JavaVM pointer: {e}")))?;
        Ok(Self::new(vm))
    }

    pub fn vm(&self) -> &JavaVM {
        &self.vm
    }
}

impl EnvAccessor for JavaVmAccessor {
    fn with_current_env(&self, f: &mut dyn FnMut(&dyn JniEnv)) -> Result<()> {
        let env = self
            .vm
            .get_env()
            .map_err(|e| Error::ffi(OP_GET_ENV, e.to_string()))?;
        f(&RawJniEnv(env.get_raw()));
        Ok(())
    }
}

struct RawJniEnv(*mut sys::JNIEnv);

impl JniEnv for RawJniEnv {
    unsafe fn delete_global_ref(&self, raw: RawObject) -> Result<()> {
        let delete = (**self.0).DeleteGlobalRef.ok_or_else(|| {
            Error::ffi(
                OP_DELETE_GLOBAL_REF,
                "JNIEnv function table has no DeleteGlobalRef entry",
            )
        })?;
        delete(self.0, raw.cast());
        Ok(())
    }
}
