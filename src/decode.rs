//! Struct recursion: the decode driver.
//!
//! Walks the fields of a destination struct in declaration order, derives
//! each field's key, resolves the raw text through a lookup and routes it to
//! the custom decoder, the value parser or a nested struct. Operates on a
//! lookup function with no I/O, so tests can pass synthetic data.
//!
//! Decoding fails fast. Fields assigned before an error keep their new
//! values.

use tracing::trace;

use crate::bind::Bind;
use crate::custom;
use crate::error::EnvbindError;
use crate::key::KeyNaming;
use crate::pointer::decode_into;
use crate::shape::TypeShape;
use crate::types::{Companion, DefaultCompanion, FieldDescriptor};
use crate::value::{Parsed, parse_value};

/// Raw value lookup by final key.
pub type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Object-safe view of a bindable struct.
pub trait Schema {
    fn schema_shape(&self) -> &'static TypeShape;

    fn bind_schema(&mut self, decoder: &Decoder<'_>, prefix: &str) -> Result<(), EnvbindError>;
}

impl<T: Bind> Schema for T {
    fn schema_shape(&self) -> &'static TypeShape {
        T::SHAPE
    }

    fn bind_schema(&mut self, decoder: &Decoder<'_>, prefix: &str) -> Result<(), EnvbindError> {
        self.bind_fields(decoder, prefix)
    }
}

/// One decode invocation's collaborators: the lookup, the field policy and
/// the naming policy.
pub struct Decoder<'a> {
    lookup: Lookup<'a>,
    companion: &'a dyn Companion,
    naming: &'a KeyNaming,
}

impl<'a> Decoder<'a> {
    pub fn new(lookup: Lookup<'a>, companion: &'a dyn Companion, naming: &'a KeyNaming) -> Self {
        Self {
            lookup,
            companion,
            naming,
        }
    }

    /// Decode every field of `destination` under `prefix`.
    pub fn decode(&self, prefix: &str, destination: &mut dyn Schema) -> Result<(), EnvbindError> {
        let shape = destination.schema_shape();
        if !shape.is_struct() {
            return Err(EnvbindError::unsupported("<destination>", shape));
        }
        destination.bind_schema(self, prefix)
    }

    /// Decode one field into `slot`. Called by `#[derive(Bind)]` code.
    pub fn field<T: Bind>(
        &self,
        field: &FieldDescriptor,
        prefix: &str,
        slot: &mut T,
    ) -> Result<(), EnvbindError> {
        if !self.companion.include_field(field) {
            trace!(field = field.name, "field excluded");
            return Ok(());
        }

        let key = self.naming.key_for(field, self.companion, prefix)?;
        let Some(raw) = (self.lookup)(&key) else {
            if T::SHAPE.base().is_struct() {
                trace!(field = field.name, key = %key, "no value, descending into struct");
                return self.recurse(&key, slot);
            }
            trace!(field = field.name, key = %key, "no value, skipping");
            return Ok(());
        };
        trace!(field = field.name, key = %key, "value found");

        if custom::has_text_decoder::<T>() {
            return custom::dispatch(field, slot, &raw);
        }

        match parse_value(field.name, T::SHAPE, &raw)? {
            Parsed::Recurse => self.recurse(&key, slot),
            Parsed::Value(value) if value.is_zero() => Ok(()),
            Parsed::Value(value) => {
                *slot = T::from_value(value)
                    .map_err(|source| EnvbindError::parse_value(field.name, &raw, T::SHAPE, source))?;
                Ok(())
            }
        }
    }

    /// Decode the fields of a struct-based slot, preserving what it holds.
    ///
    /// An empty `Option` chain is only allocated when the nested struct ends
    /// up non-zero.
    fn recurse<T: Bind>(&self, key: &str, slot: &mut T) -> Result<(), EnvbindError> {
        decode_into(
            slot,
            |base| base.bind_fields(self, key),
            |fresh| !fresh.is_zero(),
        )
    }
}

/// Decode `destination` from `lookup` with the default field and naming
/// policies: public fields, `env` overrides, uppercased `key` fallbacks.
pub fn decode<T: Bind>(
    lookup: impl Fn(&str) -> Option<String>,
    prefix: &str,
    destination: &mut T,
) -> Result<(), EnvbindError> {
    let naming = KeyNaming::default();
    Decoder::new(&lookup, &DefaultCompanion, &naming).decode(prefix, destination)
}
