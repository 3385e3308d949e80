use std::borrow::Cow;

use crate::shape::TypeShape;

/// Annotation naming the generic fallback key of a field.
pub const KEY_TAG: &str = "key";

/// Flag annotation excluding a field from decoding.
pub const IGNORE_TAG: &str = "ignore";

/// Structural description of one struct field, produced by `#[derive(Bind)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field name as declared.
    pub name: &'static str,
    /// Declared type as written in the source, whitespace removed.
    pub type_name: &'static str,
    pub shape: &'static TypeShape,
    /// `(tag, value)` pairs from `#[bind(...)]`. Flags carry the value `"true"`.
    pub annotations: &'static [(&'static str, &'static str)],
    /// Whether the field is visible outside its module.
    pub public: bool,
    /// Declaration position within the struct.
    pub index: usize,
}

impl FieldDescriptor {
    /// Value of the first annotation with the given tag.
    pub fn annotation(&self, tag: &str) -> Option<&'static str> {
        self.annotations
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, v)| *v)
    }
}

/// Field policy consulted by the decoder: which fields to decode, and the
/// generic key a field falls back to when it has no source-specific override.
pub trait Companion {
    fn include_field(&self, field: &FieldDescriptor) -> bool;

    fn fallback_key<'f>(&self, field: &'f FieldDescriptor) -> Option<Cow<'f, str>>;
}

/// Decodes public fields that are not flagged `ignore`, falling back to their
/// `key` annotation.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultCompanion;

impl Companion for DefaultCompanion {
    fn include_field(&self, field: &FieldDescriptor) -> bool {
        field.public && field.annotation(IGNORE_TAG) != Some("true")
    }

    fn fallback_key<'f>(&self, field: &'f FieldDescriptor) -> Option<Cow<'f, str>> {
        field.annotation(KEY_TAG).map(Cow::Borrowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(annotations: &'static [(&'static str, &'static str)], public: bool) -> FieldDescriptor {
        FieldDescriptor {
            name: "FieldA",
            type_name: "String",
            shape: &TypeShape::String,
            annotations,
            public,
            index: 0,
        }
    }

    #[test]
    fn annotation_lookup() {
        let field = descriptor(&[("key", "field_a"), ("env", "FIELD_A")], true);
        assert_eq!(field.annotation("key"), Some("field_a"));
        assert_eq!(field.annotation("env"), Some("FIELD_A"));
        assert_eq!(field.annotation("json"), None);
    }

    #[test]
    fn default_companion_requires_public_fields() {
        let companion = DefaultCompanion;
        assert!(companion.include_field(&descriptor(&[("key", "a")], true)));
        assert!(!companion.include_field(&descriptor(&[("key", "a")], false)));
    }

    #[test]
    fn default_companion_honours_ignore_flag() {
        let field = descriptor(&[("key", "a"), ("ignore", "true")], true);
        assert!(!DefaultCompanion.include_field(&field));
    }

    #[test]
    fn default_companion_fallback_is_key_annotation() {
        let field = descriptor(&[("key", "field_a")], true);
        assert_eq!(
            DefaultCompanion.fallback_key(&field).as_deref(),
            Some("field_a")
        );
        assert_eq!(DefaultCompanion.fallback_key(&descriptor(&[], true)), None);
    }
}
