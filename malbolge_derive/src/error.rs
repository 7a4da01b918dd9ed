//! Derive macro for error types.
//!
//! Generates `std::fmt::Display` and `std::error::Error` implementations.
//! Replacement for `thiserror` crate.
//!
//! # Usage
//!
//! ```ignore
//! use malbolge_derive::Error;
//!
//! #[derive(Debug, Error)]
//! pub enum LoadError {
//!     #[error("invalid character {byte} at position {position}")]
//!     InvalidCharacter { position: usize, byte: u8 },
//!
//!     #[error("io error: {0}")]
//!     Io(#[from] std::io::Error),
//!
//!     #[error("program is empty")]
//!     Empty,
//! }
//! ```
//!
//! # Supported Features
//!
//! - Unit variants: `#[error("message")]`
//! - Tuple variants with positional args: `#[error("error: {0}")]`
//! - Struct variants with named args: `#[error("expected {expected}")]`
//! - Format specs on arguments: `#[error("cell {0:?}")]`
//! - Fields the message does not mention are allowed
//! - `#[from]` on the single field of a tuple variant: generates
//!   `From<Field>` and reports the field as `Error::source`

use proc_macro::TokenStream;
use quote::{ToTokens, format_ident, quote};
use syn::{Data, DeriveInput, Fields, Lit, Meta, parse_macro_input};

/// Derives `Display` and `Error` for an enum or struct.
///
/// Each variant must have an `#[error("...")]` attribute specifying
/// the display message.
pub fn derive_error(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand_error_derive(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_error_derive(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    match &input.data {
        Data::Enum(data_enum) => {
            let mut display_arms = Vec::new();
            let mut source_arms = Vec::new();
            let mut from_impls = Vec::new();

            for variant in &data_enum.variants {
                let variant_name = &variant.ident;
                let error_msg = extract_error_message(variant)?;

                let arm = match &variant.fields {
                    Fields::Unit => quote! {
                        Self::#variant_name => write!(f, #error_msg),
                    },
                    Fields::Unnamed(fields) => {
                        let bindings: Vec<_> = (0..fields.unnamed.len())
                            .map(|i| format_ident!("f{}", i))
                            .collect();
                        let format_str =
                            convert_positional_to_named(&error_msg, fields.unnamed.len());
                        let used: Vec<_> = bindings
                            .iter()
                            .filter(|b| references(&format_str, &b.to_string()))
                            .collect();
                        quote! {
                            Self::#variant_name(#(#bindings),*) => write!(f, #format_str, #(#used = #used),*),
                        }
                    }
                    Fields::Named(fields) => {
                        let field_names: Vec<_> =
                            fields.named.iter().filter_map(|f| f.ident.as_ref()).collect();
                        let used: Vec<_> = field_names
                            .iter()
                            .filter(|n| references(&error_msg, &n.to_string()))
                            .collect();
                        quote! {
                            Self::#variant_name { #(#field_names),* } => write!(f, #error_msg, #(#used = #used),*),
                        }
                    }
                };
                display_arms.push(arm);

                if let Some(field_ty) = from_field(&variant.fields)? {
                    source_arms.push(quote! {
                        Self::#variant_name(inner) => Some(inner as &(dyn ::std::error::Error + 'static)),
                    });
                    from_impls.push(quote! {
                        impl #impl_generics ::std::convert::From<#field_ty> for #name #ty_generics #where_clause {
                            fn from(source: #field_ty) -> Self {
                                Self::#variant_name(source)
                            }
                        }
                    });
                }
            }

            let source_fn = if source_arms.is_empty() {
                quote! {}
            } else {
                quote! {
                    fn source(&self) -> ::std::option::Option<&(dyn ::std::error::Error + 'static)> {
                        match self {
                            #(#source_arms)*
                            _ => None,
                        }
                    }
                }
            };

            Ok(quote! {
                impl #impl_generics ::std::fmt::Display for #name #ty_generics #where_clause {
                    #[allow(unused_variables)]
                    fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                        match self {
                            #(#display_arms)*
                        }
                    }
                }

                impl #impl_generics ::std::error::Error for #name #ty_generics #where_clause {
                    #source_fn
                }

                #(#from_impls)*
            })
        }
        Data::Struct(data_struct) => {
            let error_msg = extract_error_message_from_attrs(
                &input.attrs,
                &input.ident,
                &format!("type `{}`", input.ident),
            )?;

            let display_body = match &data_struct.fields {
                Fields::Unit => quote! {
                    write!(f, #error_msg)
                },
                Fields::Named(fields) => {
                    let used: Vec<_> = fields
                        .named
                        .iter()
                        .filter_map(|f| f.ident.as_ref())
                        .filter(|n| references(&error_msg, &n.to_string()))
                        .collect();
                    quote! {
                        write!(f, #error_msg, #(#used = self.#used),*)
                    }
                }
                Fields::Unnamed(fields) => {
                    let format_str = convert_positional_to_named(&error_msg, fields.unnamed.len());
                    let (idents, indices): (Vec<_>, Vec<_>) = (0..fields.unnamed.len())
                        .map(|i| (format_ident!("f{}", i), syn::Index::from(i)))
                        .filter(|(ident, _)| references(&format_str, &ident.to_string()))
                        .unzip();
                    quote! {
                        write!(f, #format_str, #(#idents = self.#indices),*)
                    }
                }
            };

            Ok(quote! {
                impl #impl_generics ::std::fmt::Display for #name #ty_generics #where_clause {
                    fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                        #display_body
                    }
                }

                impl #impl_generics ::std::error::Error for #name #ty_generics #where_clause {}
            })
        }
        Data::Union(_) => Err(syn::Error::new_spanned(
            input,
            "Error derive does not support unions",
        )),
    }
}

/// Returns the type of the `#[from]` field of a variant, if any.
///
/// `#[from]` is only accepted on a tuple variant with exactly one field.
fn from_field(fields: &Fields) -> syn::Result<Option<&syn::Type>> {
    let marked = |field: &syn::Field| field.attrs.iter().any(|a| a.path().is_ident("from"));
    match fields {
        Fields::Unnamed(unnamed) => {
            let Some(field) = unnamed.unnamed.iter().find(|f| marked(f)) else {
                return Ok(None);
            };
            if unnamed.unnamed.len() != 1 {
                return Err(syn::Error::new_spanned(
                    fields,
                    "#[from] requires a tuple variant with exactly one field",
                ));
            }
            Ok(Some(&field.ty))
        }
        Fields::Named(named) => match named.named.iter().find(|f| marked(f)) {
            Some(field) => Err(syn::Error::new_spanned(
                field,
                "#[from] is only supported on tuple variants",
            )),
            None => Ok(None),
        },
        Fields::Unit => Ok(None),
    }
}

/// Extracts the error message from a variant's `#[error("...")]` attribute.
fn extract_error_message(variant: &syn::Variant) -> syn::Result<String> {
    extract_error_message_from_attrs(
        &variant.attrs,
        &variant.ident,
        &format!("variant `{}`", variant.ident),
    )
}

/// Extracts the error message from attributes.
fn extract_error_message_from_attrs<T: ToTokens>(
    attrs: &[syn::Attribute],
    target: &T,
    target_desc: &str,
) -> syn::Result<String> {
    for attr in attrs {
        if !attr.path().is_ident("error") {
            continue;
        }
        let Meta::List(meta_list) = &attr.meta else {
            return Err(syn::Error::new_spanned(
                &attr.meta,
                "invalid #[error] attribute; use #[error(\"message\")] to describe the error",
            ));
        };
        let lit = syn::parse2::<Lit>(meta_list.tokens.clone()).map_err(|_| {
            syn::Error::new_spanned(
                &attr.meta,
                "failed to parse #[error] attribute; expected a string literal like #[error(\"cell {0} is not printable\")]",
            )
        })?;
        return match lit {
            Lit::Str(lit_str) => Ok(lit_str.value()),
            _ => Err(syn::Error::new_spanned(
                &attr.meta,
                "invalid #[error] attribute: message must be a string literal",
            )),
        };
    }

    Err(syn::Error::new_spanned(
        target,
        format!(
            "missing #[error(\"...\")] attribute on {}; every error variant must declare a display message",
            target_desc
        ),
    ))
}

/// Whether `format_str` interpolates the argument `name`, with or without a format spec.
fn references(format_str: &str, name: &str) -> bool {
    format_str.contains(&format!("{{{name}}}")) || format_str.contains(&format!("{{{name}:"))
}

/// Converts positional format args `{0}`, `{1:?}` to named args `{f0}`, `{f1:?}`.
fn convert_positional_to_named(format_str: &str, field_count: usize) -> String {
    let mut result = format_str.to_string();
    for i in (0..field_count).rev() {
        result = result
            .replace(&format!("{{{i}}}"), &format!("{{f{i}}}"))
            .replace(&format!("{{{i}:"), &format!("{{f{i}:"));
    }
    result
}
