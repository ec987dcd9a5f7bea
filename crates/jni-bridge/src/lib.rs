//! Scoped ownership of JNI global references
//!
//! This crate bounds the lifetime of global references handed out by the JVM.
//! A [`ScopedGlobalRef`] owns exactly one reference and deletes it when it is
//! reset, cleared or dropped. Transfers of ownership are explicit moves; the
//! wrapper can never be copied.
//!
//! Deletion goes through an [`EnvAccessor`] that resolves the current
//! thread's environment at release time. Register one per process with
//! [`install_accessor`] (the default, see [`AmbientDeleter`]), or hand an
//! `Arc<impl EnvAccessor>` to [`ScopedGlobalRef::with_deleter`].

pub mod config;
pub mod deleter;
pub mod env;
#[cfg(feature = "jvm")]
pub mod jvm;
pub mod kinds;
mod scoped;
pub mod testing;

pub use flexlayout_core::{Error, Result};

pub use config::{bridge_config, set_bridge_config, BridgeConfig, ReleaseFailurePolicy};
pub use deleter::{AmbientDeleter, GlobalRefDeleter};
pub use env::{accessor_installed, install_accessor, with_current_env, EnvAccessor, JniEnv};
#[cfg(feature = "jvm")]
pub use jvm::JavaVmAccessor;
pub use kinds::{
    GlobalRefKind, JBooleanArray, JByteArray, JCharArray, JClass, JDoubleArray, JFloatArray,
    JIntArray, JLongArray, JObject, JObjectArray, JShortArray, JString, JThrowable, RawObject,
};
pub use scoped::{make_global_ref, ScopedGlobalRef};
