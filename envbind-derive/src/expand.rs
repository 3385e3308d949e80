use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Visibility};

use crate::attrs::Annotations;

pub fn derive(input: &DeriveInput) -> syn::Result<TokenStream> {
    let container = Annotations::parse(&input.attrs)?;
    if container.flag("text") {
        return Ok(text_binding(input));
    }

    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Bind can only be derived for structs with named fields, or with #[bind(text)]",
        ));
    };
    let Fields::Named(fields) = &data.fields else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Bind requires named fields; use #[bind(text)] for newtypes",
        ));
    };

    let ident = &input.ident;
    let name = ident.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let mut zero_inits = Vec::new();
    let mut zero_checks = Vec::new();
    let mut binds = Vec::new();

    for (index, field) in fields.named.iter().enumerate() {
        let annotations = Annotations::parse(&field.attrs)?;
        let Some(field_ident) = &field.ident else {
            return Err(syn::Error::new_spanned(field, "expected a named field"));
        };
        let ty = &field.ty;

        // Ignored fields never reach the decoder, so their type need not be bindable.
        if annotations.flag("ignore") {
            zero_inits.push(quote!(#field_ident: ::core::default::Default::default()));
            continue;
        }

        zero_inits.push(quote!(#field_ident: <#ty as ::envbind::Bind>::zero()));
        zero_checks.push(quote!(::envbind::Bind::is_zero(&self.#field_ident)));

        let field_name = field_ident.unraw().to_string();
        let type_name = ty.to_token_stream().to_string().replace(' ', "");
        let public = !matches!(field.vis, Visibility::Inherited);
        let pairs = annotations.pairs.iter().map(|(k, v)| quote!((#k, #v)));

        binds.push(quote! {
            decoder.field(
                &::envbind::FieldDescriptor {
                    name: #field_name,
                    type_name: #type_name,
                    shape: <#ty as ::envbind::Bind>::SHAPE,
                    annotations: &[#(#pairs),*],
                    public: #public,
                    index: #index,
                },
                prefix,
                &mut self.#field_ident,
            )?;
        });
    }

    let is_zero = quote!(true #(&& #zero_checks)*);

    Ok(quote! {
        impl #impl_generics ::envbind::Bind for #ident #ty_generics #where_clause {
            type Base = Self;
            const SHAPE: &'static ::envbind::TypeShape = &::envbind::TypeShape::Struct(#name);

            fn zero() -> Self {
                Self { #(#zero_inits),* }
            }

            fn is_zero(&self) -> bool {
                #is_zero
            }

            fn base_mut(&mut self) -> ::core::option::Option<&mut Self> {
                ::core::option::Option::Some(self)
            }

            fn wrap(base: Self) -> Self {
                base
            }

            fn from_value(
                _value: ::envbind::DecodedValue,
            ) -> ::core::result::Result<Self, ::envbind::BoxError> {
                ::core::result::Result::Err(::envbind::BoxError::from(
                    ::core::concat!("struct '", #name, "' is bound field by field"),
                ))
            }

            #[allow(unused_variables)]
            fn bind_fields(
                &mut self,
                decoder: &::envbind::Decoder<'_>,
                prefix: &str,
            ) -> ::core::result::Result<(), ::envbind::EnvbindError> {
                #(#binds)*
                ::core::result::Result::Ok(())
            }
        }
    })
}

/// Leaf binding for a type that decodes itself through `TextDecode`.
fn text_binding(input: &DeriveInput) -> TokenStream {
    let ident = &input.ident;
    let name = ident.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    quote! {
        impl #impl_generics ::envbind::Bind for #ident #ty_generics #where_clause {
            type Base = Self;
            const SHAPE: &'static ::envbind::TypeShape = &::envbind::TypeShape::Text(#name);

            fn zero() -> Self {
                ::core::default::Default::default()
            }

            fn is_zero(&self) -> bool {
                *self == <Self as ::core::default::Default>::default()
            }

            fn base_mut(&mut self) -> ::core::option::Option<&mut Self> {
                ::core::option::Option::Some(self)
            }

            fn wrap(base: Self) -> Self {
                base
            }

            fn from_value(
                value: ::envbind::DecodedValue,
            ) -> ::core::result::Result<Self, ::envbind::BoxError> {
                let ::envbind::DecodedValue::Text(text) = value else {
                    return ::core::result::Result::Err(::envbind::BoxError::from(
                        ::core::concat!("expected raw text for '", #name, "'"),
                    ));
                };
                let mut decoded = <Self as ::core::default::Default>::default();
                ::envbind::TextDecode::decode_text(&mut decoded, &text)?;
                ::core::result::Result::Ok(decoded)
            }

            fn bind_text(&mut self, text: &str) -> ::core::result::Result<(), ::envbind::BoxError> {
                ::envbind::TextDecode::decode_text(self, text)
            }
        }
    }
}
