//! # Untyped invocation values.
//!
//! Workers exchange [`Value`]s: results of one invocation become the arguments
//! of the next one (self-feeding loop) and of downstream stations (fan-out).
//! A value is an `Arc` around any `Send + Sync` type, so cloning it for every
//! downstream station is cheap. Consumers downcast to the type they expect.
//!
//! ## Example
//! ```rust
//! use stationmaster::{args, Value};
//!
//! let v = Value::new(42u64);
//! assert_eq!(v.downcast_ref::<u64>(), Some(&42));
//! assert!(v.downcast_ref::<String>().is_none());
//!
//! let batch = args!["page-1".to_string(), 7u8];
//! assert_eq!(batch.len(), 2);
//! ```

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

/// Shared, type-erased value.
#[derive(Clone)]
pub struct Value {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Value {
    /// Wraps `v`.
    pub fn new<T: Any + Send + Sync>(v: T) -> Self {
        Self {
            inner: Arc::new(v),
            type_name: type_name::<T>(),
        }
    }

    /// Returns a reference to the wrapped value if it is a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Returns a clone of the wrapped value if it is a `T`.
    pub fn get<T: Any + Clone>(&self) -> Option<T> {
        self.downcast_ref::<T>().cloned()
    }

    /// True if the wrapped value is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// Name of the wrapped type (diagnostics only).
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value<{}>", self.type_name)
    }
}

/// Builds a `Vec<Value>` from a list of expressions.
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($v:expr),+ $(,)?) => {
        ::std::vec![$($crate::Value::new($v)),+]
    };
}
