//! Parsing of raw text against a [`TypeShape`].
//!
//! Scalars parse with strict grammars: base-10 integers with an exact width
//! check, JSON number literals for floats, `true`/`false` in any case for
//! booleans, and [duration literals](crate::duration). Sequences, arrays and
//! maps split their text with [`split_escaped`] and parse each part against
//! the element shape. Struct shapes are not parsed at all; they signal the
//! caller to recurse.

use std::time::Duration;

use crate::duration::parse_duration;
use crate::error::EnvbindError;
use crate::shape::TypeShape;
use crate::split::split_escaped;

/// A value parsed from text, not yet converted into its Rust type.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedValue {
    Str(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Duration(Duration),
    /// Raw text left for a custom decoder.
    Text(String),
    Seq(Vec<DecodedValue>),
    Array(Vec<DecodedValue>),
    Map(Vec<(DecodedValue, DecodedValue)>),
}

impl DecodedValue {
    /// Whether this equals the zero value of its type. Zero results leave the
    /// destination untouched.
    pub fn is_zero(&self) -> bool {
        match self {
            DecodedValue::Str(s) => s.is_empty(),
            DecodedValue::Int(v) => *v == 0,
            DecodedValue::Uint(v) => *v == 0,
            DecodedValue::Float(v) => v.to_bits() == 0,
            DecodedValue::Bool(v) => !*v,
            DecodedValue::Duration(d) => d.is_zero(),
            DecodedValue::Array(items) => items.iter().all(DecodedValue::is_zero),
            DecodedValue::Text(_) | DecodedValue::Seq(_) | DecodedValue::Map(_) => false,
        }
    }
}

/// Outcome of parsing one field.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    Value(DecodedValue),
    /// The field is struct-shaped and must be decoded field by field.
    Recurse,
}

/// Parse `raw` for the field `field` declared with `shape`.
pub fn parse_value(field: &str, shape: &TypeShape, raw: &str) -> Result<Parsed, EnvbindError> {
    if shape.base().is_struct() {
        return Ok(Parsed::Recurse);
    }
    parse_scalar_or_collection(field, shape.base(), raw).map(Parsed::Value)
}

fn parse_scalar_or_collection(
    field: &str,
    shape: &TypeShape,
    raw: &str,
) -> Result<DecodedValue, EnvbindError> {
    match shape {
        TypeShape::Slice(elem) => {
            check_element(field, shape, elem)?;
            let items = split_escaped(raw, ',')
                .iter()
                .map(|part| parse_element(field, elem, part))
                .collect::<Result<_, _>>()?;
            Ok(DecodedValue::Seq(items))
        }
        TypeShape::Array(len, elem) => {
            check_element(field, shape, elem)?;
            let parts = split_escaped(raw, ',');
            if parts.len() != *len {
                return Err(EnvbindError::ArrayLength {
                    field: field.to_string(),
                    expected: *len,
                    actual: parts.len(),
                });
            }
            let items = parts
                .iter()
                .map(|part| parse_element(field, elem, part))
                .collect::<Result<_, _>>()?;
            Ok(DecodedValue::Array(items))
        }
        TypeShape::Map(key, value) => {
            check_element(field, shape, key)?;
            check_element(field, shape, value)?;
            parse_map(field, key, value, raw)
        }
        _ => parse_element(field, shape, raw),
    }
}

fn check_element(field: &str, collection: &TypeShape, elem: &TypeShape) -> Result<(), EnvbindError> {
    if elem.is_collection_element() {
        Ok(())
    } else {
        Err(EnvbindError::unsupported(field, collection))
    }
}

fn parse_map(
    field: &str,
    key: &TypeShape,
    value: &TypeShape,
    raw: &str,
) -> Result<DecodedValue, EnvbindError> {
    let mut entries = Vec::new();
    for (index, entry) in split_escaped(raw, ',').iter().enumerate() {
        let parts = split_escaped(entry, '=');
        let [key_text, value_text] = parts.as_slice() else {
            let problem = if parts.len() < 2 {
                "no unescaped '=' between key and value"
            } else {
                "more than one unescaped '='"
            };
            return Err(EnvbindError::MapEntry {
                field: field.to_string(),
                index,
                entry: entry.clone(),
                problem: problem.to_string(),
            });
        };
        entries.push((
            parse_element(field, key, key_text)?,
            parse_element(field, value, value_text)?,
        ));
    }
    Ok(DecodedValue::Map(entries))
}

/// Parse a single scalar, looking through `Option` layers.
fn parse_element(field: &str, shape: &TypeShape, raw: &str) -> Result<DecodedValue, EnvbindError> {
    let fail = |source: crate::error::BoxError| EnvbindError::parse_value(field, raw, shape, source);

    match shape {
        TypeShape::String => Ok(DecodedValue::Str(raw.to_string())),
        TypeShape::Int(bits) => parse_int(raw, *bits).map(DecodedValue::Int).map_err(fail),
        TypeShape::Uint(bits) => parse_uint(raw, *bits).map(DecodedValue::Uint).map_err(fail),
        TypeShape::Float(bits) => parse_float(raw, *bits).map(DecodedValue::Float).map_err(fail),
        TypeShape::Bool => parse_bool(raw).map(DecodedValue::Bool).map_err(fail),
        TypeShape::Duration => parse_duration(raw)
            .map(DecodedValue::Duration)
            .map_err(|e| fail(e.into())),
        TypeShape::Text(_) => Ok(DecodedValue::Text(raw.to_string())),
        TypeShape::Pointer(inner) => parse_element(field, inner, raw),
        TypeShape::Slice(_) | TypeShape::Array(..) | TypeShape::Map(..) => {
            parse_scalar_or_collection(field, shape, raw)
        }
        TypeShape::Struct(_) | TypeShape::Complex(_) | TypeShape::Unsupported(_) => {
            Err(EnvbindError::unsupported(field, shape))
        }
    }
}

fn parse_int(raw: &str, bits: u32) -> Result<i64, crate::error::BoxError> {
    let value: i64 = raw.parse()?;
    if bits < 64 {
        let max = (1i64 << (bits - 1)) - 1;
        let min = -max - 1;
        if value < min || value > max {
            return Err(format!("value out of range for i{bits}").into());
        }
    }
    Ok(value)
}

fn parse_uint(raw: &str, bits: u32) -> Result<u64, crate::error::BoxError> {
    if raw.starts_with('+') {
        return Err("unsigned values take no sign".into());
    }
    let value: u64 = raw.parse()?;
    if bits < 64 && value > (1u64 << bits) - 1 {
        return Err(format!("value out of range for u{bits}").into());
    }
    Ok(value)
}

fn parse_float(raw: &str, bits: u32) -> Result<f64, crate::error::BoxError> {
    let value: f64 = serde_json::from_str(raw)?;
    if bits == 32 {
        let narrowed = value as f32;
        if narrowed.is_infinite() {
            return Err("value out of range for f32".into());
        }
        return Ok(f64::from(narrowed));
    }
    Ok(value)
}

fn parse_bool(raw: &str) -> Result<bool, crate::error::BoxError> {
    if raw.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err("expected 'true' or 'false'".into())
    }
}
