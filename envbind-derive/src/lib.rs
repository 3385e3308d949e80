//! Derive macro for [envbind](https://docs.rs/envbind).
//!
//! `#[derive(Bind)]` on a struct with named fields generates its binding
//! schema: field descriptors, the zero value, and the per-field decode calls.
//! With the container attribute `#[bind(text)]` it instead generates a leaf
//! binding that delegates to the type's `TextDecode` implementation.

mod attrs;
mod expand;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

#[proc_macro_derive(Bind, attributes(bind))]
pub fn derive_bind(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand::derive(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
