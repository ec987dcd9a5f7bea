//! The closed set of JNI reference kinds a [`ScopedGlobalRef`] may own.
//!
//! Every kind is a distinct `#[repr(transparent)]` newtype over a raw
//! `jobject` pointer, so they can cross the FFI boundary unchanged while
//! staying separate types on the Rust side. [`GlobalRefKind`] is sealed:
//! code outside this crate cannot add kinds.
//!
//! [`ScopedGlobalRef`]: crate::ScopedGlobalRef

use std::ffi::c_void;
use std::fmt;
use std::ptr;

/// Untyped JNI reference as it crosses the FFI boundary (`jobject`).
pub type RawObject = *mut c_void;

mod sealed {
    pub trait Sealed {}
}

/// A JNI reference type that may be held by a [`ScopedGlobalRef`].
///
/// Implemented only for the kinds in this module.
///
/// [`ScopedGlobalRef`]: crate::ScopedGlobalRef
pub trait GlobalRefKind: sealed::Sealed + Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// The empty sentinel, equivalent to `NULL`.
    const NULL: Self;

    /// Java type this kind refers to, for diagnostics.
    const JAVA_TYPE: &'static str;

    /// Reinterprets a raw `jobject` as this kind. No check is performed.
    fn from_raw(raw: RawObject) -> Self;

    /// Returns the underlying `jobject`.
    fn as_raw(self) -> RawObject;

    fn is_null(self) -> bool {
        self.as_raw().is_null()
    }
}

macro_rules! global_ref_kinds {
    ($($(#[$meta:meta])* $name:ident => $java:literal,)+) => {$(
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(RawObject);

        // SAFETY: a global reference is valid on every thread attached to the
        // JVM; the value itself is only an address.
        unsafe impl Send for $name {}
        // SAFETY: see `Send`; the wrapper exposes no interior mutability.
        unsafe impl Sync for $name {}

        impl sealed::Sealed for $name {}

        impl GlobalRefKind for $name {
            const NULL: Self = $name(ptr::null_mut());
            const JAVA_TYPE: &'static str = $java;

            #[inline]
            fn from_raw(raw: RawObject) -> Self {
                $name(raw)
            }

            #[inline]
            fn as_raw(self) -> RawObject {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                <Self as GlobalRefKind>::NULL
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:p})", stringify!($name), self.0)
            }
        }
    )+};
}

global_ref_kinds! {
    /// `jobject`
    JObject => "java.lang.Object",
    /// `jclass`
    JClass => "java.lang.Class",
    /// `jstring`
    JString => "java.lang.String",
    /// `jthrowable`
    JThrowable => "java.lang.Throwable",
    /// `jbyteArray`
    JByteArray => "byte[]",
    /// `jintArray`
    JIntArray => "int[]",
    /// `jshortArray`
    JShortArray => "short[]",
    /// `jcharArray`
    JCharArray => "char[]",
    /// `jlongArray`
    JLongArray => "long[]",
    /// `jfloatArray`
    JFloatArray => "float[]",
    /// `jdoubleArray`
    JDoubleArray => "double[]",
    /// `jobjectArray`
    JObjectArray => "java.lang.Object[]",
    /// `jbooleanArray`
    JBooleanArray => "boolean[]",
}
