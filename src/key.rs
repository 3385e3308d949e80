//! Key derivation: from field annotations to the final lookup key.

use std::fmt;

use crate::error::EnvbindError;
use crate::types::{Companion, FieldDescriptor};

/// Override annotation consulted by environment-style sources.
pub const ENV_TAG: &str = "env";

type Converter = Box<dyn Fn(&str) -> String>;
type Joiner = Box<dyn Fn(&str, &str) -> String>;

/// Uppercases a fallback key.
pub fn default_converter(key: &str) -> String {
    key.to_uppercase()
}

/// Joins `prefix` and `key` with a single `_`, trimming underscores at the
/// boundaries of both. An empty prefix leaves the key untouched.
pub fn default_joiner(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        return key.to_string();
    }
    format!("{}_{}", prefix.trim_matches('_'), key.trim_matches('_'))
}

/// Naming policy of one source: the override tag plus the case converter and
/// joiner applied to derived keys.
pub struct KeyNaming {
    tag: String,
    converter: Converter,
    joiner: Joiner,
}

impl Default for KeyNaming {
    fn default() -> Self {
        Self::new(ENV_TAG)
    }
}

impl fmt::Debug for KeyNaming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyNaming")
            .field("tag", &self.tag)
            .finish_non_exhaustive()
    }
}

impl KeyNaming {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            converter: Box::new(default_converter),
            joiner: Box::new(default_joiner),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Replace the case converter applied to fallback keys.
    pub fn converter(mut self, converter: impl Fn(&str) -> String + 'static) -> Self {
        self.converter = Box::new(converter);
        self
    }

    /// Replace the function joining a prefix and a local key.
    pub fn joiner(mut self, joiner: impl Fn(&str, &str) -> String + 'static) -> Self {
        self.joiner = Box::new(joiner);
        self
    }

    /// Key of `field` relative to its parent, before any prefix is applied.
    ///
    /// The override annotation wins verbatim; otherwise the companion's
    /// fallback key goes through the converter.
    pub fn local_key(
        &self,
        field: &FieldDescriptor,
        companion: &dyn Companion,
    ) -> Result<String, EnvbindError> {
        if let Some(key) = field.annotation(&self.tag)
            && !key.is_empty()
        {
            return Ok(key.to_string());
        }
        if let Some(key) = companion.fallback_key(field)
            && !key.is_empty()
        {
            return Ok((self.converter)(&*key));
        }
        Err(EnvbindError::MissingKey {
            field: field.name.to_string(),
            tag: self.tag.clone(),
        })
    }

    pub fn join(&self, prefix: &str, key: &str) -> String {
        (self.joiner)(prefix, key)
    }

    /// Final lookup key of `field` under `prefix`.
    pub fn key_for(
        &self,
        field: &FieldDescriptor,
        companion: &dyn Companion,
        prefix: &str,
    ) -> Result<String, EnvbindError> {
        let local = self.local_key(field, companion)?;
        Ok(self.join(prefix, &local))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::TypeShape;
    use crate::types::DefaultCompanion;

    fn field(annotations: &'static [(&'static str, &'static str)]) -> FieldDescriptor {
        FieldDescriptor {
            name: "FieldA",
            type_name: "String",
            shape: &TypeShape::String,
            annotations,
            public: true,
            index: 0,
        }
    }

    #[test]
    fn joiner_trims_boundary_underscores() {
        assert_eq!(default_joiner("", "FIELD"), "FIELD");
        assert_eq!(default_joiner("TEST", "FIELD"), "TEST_FIELD");
        assert_eq!(default_joiner("TEST_", "_FIELD"), "TEST_FIELD");
        assert_eq!(default_joiner("__A__", "B__"), "A_B");
    }

    #[test]
    fn joiner_keeps_empty_prefix_key_verbatim() {
        assert_eq!(default_joiner("", "_FIELD_"), "_FIELD_");
    }

    #[test]
    fn override_annotation_is_used_verbatim() {
        let naming = KeyNaming::default();
        let f = field(&[("key", "field_a"), ("env", "custom_Name")]);
        assert_eq!(naming.local_key(&f, &DefaultCompanion).unwrap(), "custom_Name");
    }

    #[test]
    fn fallback_key_is_uppercased() {
        let naming = KeyNaming::default();
        let f = field(&[("key", "field_a")]);
        assert_eq!(naming.key_for(&f, &DefaultCompanion, "").unwrap(), "FIELD_A");
        assert_eq!(
            naming.key_for(&f, &DefaultCompanion, "APP").unwrap(),
            "APP_FIELD_A"
        );
    }

    #[test]
    fn empty_override_falls_back() {
        let naming = KeyNaming::default();
        let f = field(&[("key", "field_a"), ("env", "")]);
        assert_eq!(naming.local_key(&f, &DefaultCompanion).unwrap(), "FIELD_A");
    }

    #[test]
    fn missing_key_names_field_and_tag() {
        let naming = KeyNaming::default();
        let err = naming.local_key(&field(&[]), &DefaultCompanion).unwrap_err();
        assert!(matches!(
            err,
            EnvbindError::MissingKey { ref field, ref tag } if field == "FieldA" && tag == "env"
        ));
    }

    #[test]
    fn custom_converter_and_joiner() {
        let naming = KeyNaming::default()
            .converter(|k| k.to_lowercase().replace('_', ""))
            .joiner(|p, k| format!("{p}joined{k}"));
        let f = field(&[("key", "Field_A")]);
        assert_eq!(
            naming.key_for(&f, &DefaultCompanion, "prefix").unwrap(),
            "prefixjoinedfielda"
        );
    }

    #[test]
    fn derivation_is_deterministic() {
        let naming = KeyNaming::default();
        let f = field(&[("key", "field_a")]);
        let first = naming.key_for(&f, &DefaultCompanion, "P").unwrap();
        let second = naming.key_for(&f, &DefaultCompanion, "P").unwrap();
        assert_eq!(first, second);
    }
}
