//! Dynamically typed argument and result values.
//!
//! An [`AnyValue`] is what callers put into a request's argument list or a
//! response's result slot. The concrete type is known only at runtime; the
//! [`TypeRegistry`](super::registry::TypeRegistry) maps it to a wire key.

use core::any::{Any, TypeId};
use core::fmt;

/// An owned value of any `Send + Sync` type.
pub struct AnyValue {
    inner: Box<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl AnyValue {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Box::new(value),
            type_name: core::any::type_name::<T>(),
        }
    }

    /// The unit value, used for void results.
    pub fn unit() -> Self {
        Self::new(())
    }

    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Take the value out. On a type mismatch the original is handed back.
    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        let type_name = self.type_name;
        match self.inner.downcast::<T>() {
            Ok(b) => Ok(*b),
            Err(inner) => Err(Self { inner, type_name }),
        }
    }

    /// `TypeId` of the contained value (not of the box).
    pub fn type_id(&self) -> TypeId {
        self.as_any().type_id()
    }

    /// Rust type name of the contained value, for diagnostics only.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub(crate) fn as_any(&self) -> &(dyn Any + Send + Sync) {
        &*self.inner
    }
}

impl fmt::Debug for AnyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnyValue<{}>", self.type_name)
    }
}

macro_rules! impl_from {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for AnyValue {
                fn from(v: $t) -> Self {
                    Self::new(v)
                }
            }
        )*
    };
}

impl_from!(bool, i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, char, String, ());

impl From<&str> for AnyValue {
    fn from(v: &str) -> Self {
        Self::new(v.to_owned())
    }
}
