//! The [`Bind`] trait and its implementations for scalars and collections.
//!
//! `Option` layers live in [`pointer`](crate::pointer); structs and
//! self-decoding types get their implementations from `#[derive(Bind)]`.

use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};
use std::path::PathBuf;
use std::time::Duration;

use crate::decode::Decoder;
use crate::error::{BoxError, EnvbindError};
use crate::shape::TypeShape;
use crate::value::DecodedValue;

/// A type that can be decoded from flat key/value text.
///
/// Every implementation names its *base*: the type left after stripping all
/// `Option` layers. Scalars, collections and structs are their own base.
pub trait Bind: Sized {
    type Base: Bind;

    const SHAPE: &'static TypeShape;

    /// The zero value that decoding starts from when nothing is allocated yet.
    fn zero() -> Self;

    fn is_zero(&self) -> bool;

    /// The innermost existing allocation, or `None` if some `Option` layer is
    /// empty.
    fn base_mut(&mut self) -> Option<&mut Self::Base>;

    /// Rebuild the full declared chain around a base value.
    fn wrap(base: Self::Base) -> Self;

    /// Convert a parsed value into `Self`.
    fn from_value(value: DecodedValue) -> Result<Self, BoxError>;

    /// Decode raw text in place. Only called when `SHAPE` is
    /// [`TypeShape::Text`].
    fn bind_text(&mut self, _text: &str) -> Result<(), BoxError> {
        Err("type has no text decoder".into())
    }

    /// Decode every field under `prefix`. Only called when `SHAPE` is
    /// [`TypeShape::Struct`].
    fn bind_fields(&mut self, _decoder: &Decoder<'_>, _prefix: &str) -> Result<(), EnvbindError> {
        Ok(())
    }
}

/// Custom decoding of a type from its raw text, tried before any generic
/// parsing. Pair with `#[derive(Bind)] #[bind(text)]`.
///
/// Decoding mutates `self`, which may already hold a default value.
pub trait TextDecode {
    fn decode_text(&mut self, text: &str) -> Result<(), BoxError>;
}

pub(crate) fn mismatch(value: &DecodedValue, shape: &TypeShape) -> BoxError {
    format!("cannot convert {value:?} into {shape}").into()
}

macro_rules! leaf {
    () => {
        type Base = Self;

        fn base_mut(&mut self) -> Option<&mut Self> {
            Some(self)
        }

        fn wrap(base: Self) -> Self {
            base
        }
    };
}

macro_rules! bind_signed {
    ($($ty:ty),*) => {$(
        impl Bind for $ty {
            leaf!();
            const SHAPE: &'static TypeShape = &TypeShape::Int(<$ty>::BITS);

            fn zero() -> Self {
                0
            }

            fn is_zero(&self) -> bool {
                *self == 0
            }

            fn from_value(value: DecodedValue) -> Result<Self, BoxError> {
                match value {
                    DecodedValue::Int(v) => Ok(<$ty>::try_from(v)?),
                    other => Err(mismatch(&other, Self::SHAPE)),
                }
            }
        }
    )*};
}

macro_rules! bind_unsigned {
    ($($ty:ty),*) => {$(
        impl Bind for $ty {
            leaf!();
            const SHAPE: &'static TypeShape = &TypeShape::Uint(<$ty>::BITS);

            fn zero() -> Self {
                0
            }

            fn is_zero(&self) -> bool {
                *self == 0
            }

            fn from_value(value: DecodedValue) -> Result<Self, BoxError> {
                match value {
                    DecodedValue::Uint(v) => Ok(<$ty>::try_from(v)?),
                    other => Err(mismatch(&other, Self::SHAPE)),
                }
            }
        }
    )*};
}

bind_signed!(i8, i16, i32, i64, isize);
bind_unsigned!(u8, u16, u32, u64, usize);

impl Bind for f32 {
    leaf!();
    const SHAPE: &'static TypeShape = &TypeShape::Float(32);

    fn zero() -> Self {
        0.0
    }

    fn is_zero(&self) -> bool {
        self.to_bits() == 0
    }

    fn from_value(value: DecodedValue) -> Result<Self, BoxError> {
        match value {
            DecodedValue::Float(v) => Ok(v as f32),
            other => Err(mismatch(&other, Self::SHAPE)),
        }
    }
}

impl Bind for f64 {
    leaf!();
    const SHAPE: &'static TypeShape = &TypeShape::Float(64);

    fn zero() -> Self {
        0.0
    }

    fn is_zero(&self) -> bool {
        self.to_bits() == 0
    }

    fn from_value(value: DecodedValue) -> Result<Self, BoxError> {
        match value {
            DecodedValue::Float(v) => Ok(v),
            other => Err(mismatch(&other, Self::SHAPE)),
        }
    }
}

impl Bind for bool {
    leaf!();
    const SHAPE: &'static TypeShape = &TypeShape::Bool;

    fn zero() -> Self {
        false
    }

    fn is_zero(&self) -> bool {
        !*self
    }

    fn from_value(value: DecodedValue) -> Result<Self, BoxError> {
        match value {
            DecodedValue::Bool(v) => Ok(v),
            other => Err(mismatch(&other, Self::SHAPE)),
        }
    }
}

impl Bind for String {
    leaf!();
    const SHAPE: &'static TypeShape = &TypeShape::String;

    fn zero() -> Self {
        String::new()
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn from_value(value: DecodedValue) -> Result<Self, BoxError> {
        match value {
            DecodedValue::Str(v) => Ok(v),
            other => Err(mismatch(&other, Self::SHAPE)),
        }
    }
}

impl Bind for PathBuf {
    leaf!();
    const SHAPE: &'static TypeShape = &TypeShape::String;

    fn zero() -> Self {
        PathBuf::new()
    }

    fn is_zero(&self) -> bool {
        self.as_os_str().is_empty()
    }

    fn from_value(value: DecodedValue) -> Result<Self, BoxError> {
        match value {
            DecodedValue::Str(v) => Ok(PathBuf::from(v)),
            other => Err(mismatch(&other, Self::SHAPE)),
        }
    }
}

impl Bind for Duration {
    leaf!();
    const SHAPE: &'static TypeShape = &TypeShape::Duration;

    fn zero() -> Self {
        Duration::ZERO
    }

    fn is_zero(&self) -> bool {
        Duration::is_zero(self)
    }

    fn from_value(value: DecodedValue) -> Result<Self, BoxError> {
        match value {
            DecodedValue::Duration(v) => Ok(v),
            other => Err(mismatch(&other, Self::SHAPE)),
        }
    }
}

impl<T: Bind> Bind for Vec<T> {
    leaf!();
    const SHAPE: &'static TypeShape = &const { TypeShape::Slice(T::SHAPE) };

    fn zero() -> Self {
        Vec::new()
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn from_value(value: DecodedValue) -> Result<Self, BoxError> {
        match value {
            DecodedValue::Seq(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(mismatch(&other, Self::SHAPE)),
        }
    }
}

impl<T: Bind, const N: usize> Bind for [T; N] {
    leaf!();
    const SHAPE: &'static TypeShape = &const { TypeShape::Array(N, T::SHAPE) };

    fn zero() -> Self {
        std::array::from_fn(|_| T::zero())
    }

    fn is_zero(&self) -> bool {
        self.iter().all(Bind::is_zero)
    }

    fn from_value(value: DecodedValue) -> Result<Self, BoxError> {
        let items = match value {
            DecodedValue::Array(items) => items,
            other => return Err(mismatch(&other, Self::SHAPE)),
        };
        let items = items
            .into_iter()
            .map(T::from_value)
            .collect::<Result<Vec<T>, _>>()?;
        items
            .try_into()
            .map_err(|rest: Vec<T>| format!("expected {N} elements, got {}", rest.len()).into())
    }
}

impl<K, V, S> Bind for HashMap<K, V, S>
where
    K: Bind + Eq + Hash,
    V: Bind,
    S: BuildHasher + Default,
{
    leaf!();
    const SHAPE: &'static TypeShape = &const { TypeShape::Map(K::SHAPE, V::SHAPE) };

    fn zero() -> Self {
        HashMap::default()
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn from_value(value: DecodedValue) -> Result<Self, BoxError> {
        match value {
            DecodedValue::Map(entries) => entries
                .into_iter()
                .map(|(k, v)| -> Result<(K, V), BoxError> {
                    Ok((K::from_value(k)?, V::from_value(v)?))
                })
                .collect(),
            other => Err(mismatch(&other, Self::SHAPE)),
        }
    }
}

impl<K, V> Bind for BTreeMap<K, V>
where
    K: Bind + Ord,
    V: Bind,
{
    leaf!();
    const SHAPE: &'static TypeShape = &const { TypeShape::Map(K::SHAPE, V::SHAPE) };

    fn zero() -> Self {
        BTreeMap::new()
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn from_value(value: DecodedValue) -> Result<Self, BoxError> {
        match value {
            DecodedValue::Map(entries) => entries
                .into_iter()
                .map(|(k, v)| -> Result<(K, V), BoxError> {
                    Ok((K::from_value(k)?, V::from_value(v)?))
                })
                .collect(),
            other => Err(mismatch(&other, Self::SHAPE)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_shapes() {
        assert_eq!(i16::SHAPE, &TypeShape::Int(16));
        assert_eq!(usize::SHAPE, &TypeShape::Uint(usize::BITS));
        assert_eq!(f32::SHAPE, &TypeShape::Float(32));
        assert_eq!(PathBuf::SHAPE, &TypeShape::String);
    }

    #[test]
    fn collection_shapes() {
        assert_eq!(<Vec<u8>>::SHAPE.to_string(), "Vec<u8>");
        assert_eq!(<[bool; 4]>::SHAPE.to_string(), "[bool; 4]");
        assert_eq!(
            <HashMap<String, i64>>::SHAPE,
            &TypeShape::Map(&TypeShape::String, &TypeShape::Int(64))
        );
        assert_eq!(<BTreeMap<u8, f64>>::SHAPE.to_string(), "Map<u8, f64>");
    }

    #[test]
    fn narrowing_conversions_are_checked() {
        assert_eq!(i8::from_value(DecodedValue::Int(-5)).unwrap(), -5);
        assert!(i8::from_value(DecodedValue::Int(300)).is_err());
        assert!(u8::from_value(DecodedValue::Int(1)).is_err());
    }

    #[test]
    fn vec_from_sequence() {
        let seq = DecodedValue::Seq(vec![DecodedValue::Str("a".into()), DecodedValue::Str("b".into())]);
        assert_eq!(Vec::<String>::from_value(seq).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn array_zero_and_conversion() {
        let zero = <[u32; 3]>::zero();
        assert_eq!(zero, [0, 0, 0]);
        assert!(zero.is_zero());
        let arr = DecodedValue::Array(vec![DecodedValue::Uint(1), DecodedValue::Uint(2)]);
        assert!(<[u32; 3]>::from_value(arr.clone()).is_err());
        assert_eq!(<[u32; 2]>::from_value(arr).unwrap(), [1, 2]);
    }

    #[test]
    fn maps_keep_last_duplicate() {
        let entries = DecodedValue::Map(vec![
            (DecodedValue::Str("a".into()), DecodedValue::Int(1)),
            (DecodedValue::Str("a".into()), DecodedValue::Int(2)),
        ]);
        let map = BTreeMap::<String, i32>::from_value(entries).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["a"], 2);
    }

    #[test]
    fn mismatched_values_error() {
        assert!(bool::from_value(DecodedValue::Str("true".into())).is_err());
        assert!(String::from_value(DecodedValue::Int(1)).is_err());
    }
}
