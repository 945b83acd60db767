//! Proc macros for the trapline crate.
//!
//! Provides `#[derive(FailureKind)]`, which implements
//! `trapline::FailureKind` for a type that already implements `Display`
//! and `Debug`.

use proc_macro::TokenStream;

mod attrs;
mod derive;

/// Derive `trapline::FailureKind`.
///
/// `render` delegates to the type's `Display` impl. `kind_name` defaults to
/// the type's identifier and can be overridden:
///
/// ```ignore
/// #[derive(Debug, thiserror::Error, FailureKind)]
/// #[error("quota exceeded")]
/// #[failure(name = "Quota")]
/// struct QuotaExceeded;
/// ```
#[proc_macro_derive(FailureKind, attributes(failure))]
pub fn derive_failure_kind(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);
    derive::expand(&input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
