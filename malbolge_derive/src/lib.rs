//! Derive macros for the malbolge crate.
//!
//! Provides:
//! - `#[derive(Error)]` - error type boilerplate (thiserror replacement)

mod error;

use proc_macro::TokenStream;

/// Implements `Display` and `Error` for error types.
///
/// Tuple fields marked `#[from]` also get a `From` conversion and are
/// reported as the error `source`.
#[proc_macro_derive(Error, attributes(error, from))]
pub fn derive_error(input: TokenStream) -> TokenStream {
    error::derive_error(input)
}
