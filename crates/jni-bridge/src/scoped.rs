use crate::deleter::{AmbientDeleter, GlobalRefDeleter};
use crate::kinds::GlobalRefKind;
use std::fmt;

/// Smart reference that bounds the lifespan of a JNI global reference.
///
/// When a `ScopedGlobalRef` goes out of scope it deletes the underlying
/// global reference (`DeleteGlobalRef`). Use it for every global reference
/// that is expected to go away eventually; references cached for the whole
/// life of the process don't need it.
///
/// Ownership is unique and every transfer is explicit: the type can be moved
/// but never copied, and the adopting/releasing operations are spelled out
/// in the API. The default deleter does not take a `JNIEnv` at construction
/// time; it looks the current thread's environment up when the reference is
/// deleted, so a `ScopedGlobalRef` may be cached between native calls.
///
/// Only the kinds in [`crate::kinds`] can be held:
///
/// ```compile_fail
/// use flexlayout_jni_bridge::ScopedGlobalRef;
///
/// let raw: ScopedGlobalRef<*mut std::ffi::c_void> = ScopedGlobalRef::empty();
/// ```
///
/// and the wrapper cannot be duplicated:
///
/// ```compile_fail
/// use flexlayout_jni_bridge::{JObject, ScopedGlobalRef};
///
/// let a: ScopedGlobalRef<JObject> = ScopedGlobalRef::empty();
/// let b = a.clone();
/// ```
///
/// An empty wrapper never touches the JVM:
///
/// ```
/// use flexlayout_jni_bridge::{JString, ScopedGlobalRef};
///
/// let mut name: ScopedGlobalRef<JString> = ScopedGlobalRef::empty();
/// assert!(!name.is_valid());
/// name.clear();
/// ```
pub struct ScopedGlobalRef<T: GlobalRefKind, D: GlobalRefDeleter = AmbientDeleter> {
    value: T,
    deleter: D,
}

impl<T: GlobalRefKind> ScopedGlobalRef<T> {
    /// Wraps `global_ref`, deleting it through the installed accessor.
    ///
    /// # Safety
    /// `global_ref` must be `NULL` or a live global reference that nothing
    /// else will delete.
    pub unsafe fn new(global_ref: T) -> Self {
        Self::with_deleter(global_ref, AmbientDeleter)
    }

    /// Equivalent to `ScopedGlobalRef::new(T::NULL)`.
    pub fn empty() -> Self {
        Self::empty_with(AmbientDeleter)
    }
}

impl<T: GlobalRefKind, D: GlobalRefDeleter> ScopedGlobalRef<T, D> {
    /// Wraps `global_ref`, deleting it through `deleter`.
    ///
    /// # Safety
    /// `global_ref` must be `NULL` or a live global reference that nothing
    /// else will delete, and `deleter` must be able to delete it.
    pub unsafe fn with_deleter(global_ref: T, deleter: D) -> Self {
        Self {
            value: global_ref,
            deleter,
        }
    }

    /// An empty wrapper that will use `deleter` once it owns something.
    pub fn empty_with(deleter: D) -> Self {
        Self {
            value: T::NULL,
            deleter,
        }
    }

    /// Deletes the currently held reference and stores `global_ref`.
    ///
    /// Resetting to the reference already held does nothing.
    ///
    /// # Safety
    /// Same contract as [`ScopedGlobalRef::with_deleter`] for `global_ref`.
    pub unsafe fn reset(&mut self, global_ref: T) {
        if global_ref != self.value {
            if !self.value.is_null() {
                self.deleter
                    .delete_global_ref(T::JAVA_TYPE, self.value.as_raw());
            }
            self.value = global_ref;
        }
    }

    /// Deletes the currently held reference, leaving the wrapper empty.
    pub fn clear(&mut self) {
        // SAFETY: NULL is never deleted.
        unsafe { self.reset(T::NULL) }
    }

    /// Gives up ownership without deleting.
    ///
    /// The caller becomes responsible for the returned reference; the
    /// wrapper is left empty.
    #[must_use = "the released reference leaks unless it is deleted or re-wrapped"]
    pub fn release(&mut self) -> T {
        std::mem::replace(&mut self.value, T::NULL)
    }

    /// Returns the held reference without affecting ownership.
    pub fn get(&self) -> T {
        self.value
    }

    /// True if a non-null reference is held.
    pub fn is_valid(&self) -> bool {
        !self.value.is_null()
    }

    /// Moves the reference out into a new wrapper, leaving `self` empty.
    pub fn take(&mut self) -> Self
    where
        D: Clone,
    {
        Self {
            value: self.release(),
            deleter: self.deleter.clone(),
        }
    }

    /// Deletes what `self` holds, then takes over `source`'s reference.
    ///
    /// `source` is left empty. The reference is deleted through `self`'s
    /// deleter from then on.
    pub fn move_from(&mut self, source: &mut Self) {
        let value = source.release();
        // SAFETY: `value` was exclusively owned by `source`.
        unsafe { self.reset(value) }
    }

    /// The deleter that will free the held reference.
    pub fn deleter(&self) -> &D {
        &self.deleter
    }
}

impl<T: GlobalRefKind, D: GlobalRefDeleter + Default> Default for ScopedGlobalRef<T, D> {
    fn default() -> Self {
        Self::empty_with(D::default())
    }
}

impl<T: GlobalRefKind, D: GlobalRefDeleter> Drop for ScopedGlobalRef<T, D> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T: GlobalRefKind, D: GlobalRefDeleter> fmt::Debug for ScopedGlobalRef<T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ScopedGlobalRef").field(&self.value).finish()
    }
}

/// Function-call style constructor for [`ScopedGlobalRef::new`].
///
/// # Safety
/// See [`ScopedGlobalRef::new`].
pub unsafe fn make_global_ref<T: GlobalRefKind>(global_ref: T) -> ScopedGlobalRef<T> {
    ScopedGlobalRef::new(global_ref)
}
