//! Dispatch to a type's own text decoder.

use crate::bind::Bind;
use crate::error::EnvbindError;
use crate::pointer::decode_into;
use crate::types::FieldDescriptor;

/// Whether fields of type `T` decode through [`TextDecode`](crate::TextDecode).
pub(crate) fn has_text_decoder<T: Bind>() -> bool {
    T::SHAPE.base().is_text()
}

/// Decode `raw` into `slot` with the base type's text decoder.
///
/// An allocated base is decoded in place, so defaults it already holds stay
/// visible to the decoder. An empty `Option` chain gets a fresh value.
pub(crate) fn dispatch<T: Bind>(
    field: &FieldDescriptor,
    slot: &mut T,
    raw: &str,
) -> Result<(), EnvbindError> {
    decode_into(slot, |base| base.bind_text(raw), |_| true)
        .map_err(|source| EnvbindError::parse_value(field.name, raw, T::SHAPE.base(), source))
}
