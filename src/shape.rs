//! Closed classification of bindable types.
//!
//! Every [`Bind`](crate::Bind) implementation carries a `&'static TypeShape`
//! built at compile time. The value parser dispatches on it, and errors use
//! its `Display` form as the expected-type description.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeShape {
    String,
    /// Signed integer of the given bit width.
    Int(u32),
    /// Unsigned integer of the given bit width.
    Uint(u32),
    /// Floating point number of the given bit width.
    Float(u32),
    Bool,
    Duration,
    /// A struct decoded field by field.
    Struct(&'static str),
    /// A type that decodes itself from raw text.
    Text(&'static str),
    /// One `Option` layer around the inner shape.
    Pointer(&'static TypeShape),
    Slice(&'static TypeShape),
    Array(usize, &'static TypeShape),
    Map(&'static TypeShape, &'static TypeShape),
    /// Complex number of the given total bit width. Never decodable.
    Complex(u32),
    /// A type with no text representation, such as a raw pointer.
    Unsupported(&'static str),
}

impl TypeShape {
    /// The shape beneath every `Pointer` layer.
    pub fn base(&self) -> &TypeShape {
        let mut shape = self;
        while let TypeShape::Pointer(inner) = shape {
            shape = inner;
        }
        shape
    }

    /// Number of `Pointer` layers wrapped around the base shape.
    pub fn pointer_depth(&self) -> usize {
        let mut depth = 0;
        let mut shape = self;
        while let TypeShape::Pointer(inner) = shape {
            depth += 1;
            shape = inner;
        }
        depth
    }

    pub fn is_struct(&self) -> bool {
        matches!(self, TypeShape::Struct(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self, TypeShape::Text(_))
    }

    /// Whether a value of this shape may appear inside a sequence, array or map.
    ///
    /// Collections hold one level of scalars (or self-decoding text types) only.
    pub fn is_collection_element(&self) -> bool {
        !matches!(
            self.base(),
            TypeShape::Struct(_)
                | TypeShape::Slice(_)
                | TypeShape::Array(..)
                | TypeShape::Complex(_)
                | TypeShape::Unsupported(_)
        )
    }
}

impl fmt::Display for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeShape::String => f.write_str("string"),
            TypeShape::Int(bits) => write!(f, "i{bits}"),
            TypeShape::Uint(bits) => write!(f, "u{bits}"),
            TypeShape::Float(bits) => write!(f, "f{bits}"),
            TypeShape::Bool => f.write_str("bool"),
            TypeShape::Duration => f.write_str("duration"),
            TypeShape::Struct(name) | TypeShape::Text(name) => f.write_str(name),
            TypeShape::Pointer(inner) => write!(f, "Option<{inner}>"),
            TypeShape::Slice(elem) => write!(f, "Vec<{elem}>"),
            TypeShape::Array(len, elem) => write!(f, "[{elem}; {len}]"),
            TypeShape::Map(key, value) => write!(f, "Map<{key}, {value}>"),
            TypeShape::Complex(bits) => write!(f, "complex{bits}"),
            TypeShape::Unsupported(name) => f.write_str(name),
        }
    }
}
