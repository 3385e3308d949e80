//! `Option` layers of arbitrary depth around a base type.
//!
//! Each `Option` is one hop. Decoding reuses the deepest existing allocation
//! when every hop is `Some`, and otherwise builds a fresh base value and
//! wraps it in exactly as many hops as the declared type has.

use crate::bind::{Bind, mismatch};
use crate::error::BoxError;
use crate::shape::TypeShape;
use crate::value::DecodedValue;

impl<T: Bind> Bind for Option<T> {
    type Base = T::Base;
    const SHAPE: &'static TypeShape = &const { TypeShape::Pointer(T::SHAPE) };

    fn zero() -> Self {
        None
    }

    fn is_zero(&self) -> bool {
        self.as_ref().is_none_or(Bind::is_zero)
    }

    fn base_mut(&mut self) -> Option<&mut T::Base> {
        self.as_mut().and_then(T::base_mut)
    }

    fn wrap(base: T::Base) -> Self {
        Some(T::wrap(base))
    }

    fn from_value(value: DecodedValue) -> Result<Self, BoxError> {
        T::from_value(value).map(Some)
    }
}

macro_rules! bind_raw_pointer {
    ($($ptr:tt),*) => {$(
        impl<T> Bind for *$ptr T {
            type Base = Self;
            const SHAPE: &'static TypeShape = &TypeShape::Unsupported("raw pointer");

            fn zero() -> Self {
                std::ptr::null::<T>() as *$ptr T
            }

            fn is_zero(&self) -> bool {
                self.is_null()
            }

            fn base_mut(&mut self) -> Option<&mut Self> {
                Some(self)
            }

            fn wrap(base: Self) -> Self {
                base
            }

            fn from_value(value: DecodedValue) -> Result<Self, BoxError> {
                Err(mismatch(&value, Self::SHAPE))
            }
        }
    )*};
}

bind_raw_pointer!(const, mut);

/// Decode into the allocation target of `slot`.
///
/// When every hop is allocated, `decode` mutates the existing base in place,
/// keeping whatever defaults it holds. Otherwise it runs on a fresh zero base,
/// which is wrapped back into `slot` if `keep` accepts it. A failed decode
/// leaves an unallocated `slot` untouched.
pub(crate) fn decode_into<T: Bind, E>(
    slot: &mut T,
    decode: impl FnOnce(&mut T::Base) -> Result<(), E>,
    keep: impl FnOnce(&T::Base) -> bool,
) -> Result<(), E> {
    if let Some(base) = slot.base_mut() {
        return decode(base);
    }
    let mut fresh = <T::Base as Bind>::zero();
    decode(&mut fresh)?;
    if keep(&fresh) {
        *slot = T::wrap(fresh);
    }
    Ok(())
}
