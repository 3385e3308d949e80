//! Parsing of `#[bind(...)]` attributes.

use syn::{Attribute, LitStr};

/// Annotations collected from the `#[bind(...)]` attributes on one item.
///
/// `name = "value"` pairs are kept verbatim. Bare flags such as `ignore` are
/// recorded with the value `"true"`.
#[derive(Default)]
pub struct Annotations {
    pub pairs: Vec<(String, String)>,
}

impl Annotations {
    pub fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut pairs = Vec::new();
        for attr in attrs.iter().filter(|a| a.path().is_ident("bind")) {
            attr.parse_nested_meta(|meta| {
                let Some(ident) = meta.path.get_ident() else {
                    return Err(meta.error("expected a plain annotation name"));
                };
                let name = ident.to_string();
                if meta.input.peek(syn::Token![=]) {
                    let value: LitStr = meta.value()?.parse()?;
                    pairs.push((name, value.value()));
                } else {
                    pairs.push((name, "true".to_string()));
                }
                Ok(())
            })?;
        }
        Ok(Self { pairs })
    }

    pub fn flag(&self, name: &str) -> bool {
        self.pairs.iter().any(|(n, v)| n == name && v == "true")
    }
}
