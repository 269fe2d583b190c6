//! Handles for host values that must not be merged structurally.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A host value carried through configuration without being merged.
///
/// Timestamps, compiled patterns and similar values implement this trait so
/// they can sit inside a configuration tree. The merge engine copies the
/// handle; the value itself is shared.
pub trait OpaqueValue: Any + fmt::Debug + Send + Sync {
    /// JSON rendering used for serialisation and typed extraction.
    fn to_json(&self) -> serde_json::Value;
}

/// Shared reference to an [`OpaqueValue`].
///
/// Equality is identity: two handles are equal when they point at the same
/// allocation.
#[derive(Clone)]
pub struct OpaqueHandle(Arc<dyn OpaqueValue>);

impl OpaqueHandle {
    /// Wrap `value` in a new handle.
    #[must_use]
    pub fn new<T: OpaqueValue>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Attempt to view the wrapped value as `T`.
    #[must_use]
    pub fn downcast_ref<T: OpaqueValue>(&self) -> Option<&T> {
        let any: &dyn Any = self.0.as_ref();
        any.downcast_ref::<T>()
    }

    /// Returns `true` when both handles share one allocation.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// JSON rendering of the wrapped value.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        self.0.to_json()
    }
}

impl PartialEq for OpaqueHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for OpaqueHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Opaque").field(&self.0).finish()
    }
}
