//! Code generation for `#[derive(FailureKind)]`.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, LitStr, Result};

use crate::attrs;

/// Expand the derive into an `impl ::trapline::FailureKind`.
pub fn expand(input: &DeriveInput) -> Result<TokenStream> {
    if let Data::Union(u) = &input.data {
        return Err(syn::Error::new(
            u.union_token.span,
            "FailureKind cannot be derived for unions",
        ));
    }

    let opts = attrs::parse(&input.attrs)?;
    let ident = &input.ident;
    let name = opts
        .name
        .unwrap_or_else(|| LitStr::new(&ident.to_string(), ident.span()));
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::trapline::FailureKind for #ident #ty_generics #where_clause {
            #[inline]
            fn kind_name(&self) -> &'static str {
                #name
            }

            fn render(&self) -> ::std::string::String {
                ::std::string::ToString::to_string(self)
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_default_name() {
        let input: DeriveInput = parse_quote! {
            struct Timeout { secs: u64 }
        };
        let code = expand(&input).unwrap().to_string();
        assert!(code.contains(":: trapline :: FailureKind for Timeout"));
        assert!(code.contains("\"Timeout\""));
    }

    #[test]
    fn test_named_override() {
        let input: DeriveInput = parse_quote! {
            #[failure(name = "Deadline")]
            enum Timeout { Read, Write }
        };
        let code = expand(&input).unwrap().to_string();
        assert!(code.contains("\"Deadline\""));
        assert!(!code.contains("\"Timeout\""));
    }

    #[test]
    fn test_generics_carried() {
        let input: DeriveInput = parse_quote! {
            struct Rejected<T: Send> where T: Sync { item: T }
        };
        let code = expand(&input).unwrap().to_string();
        assert!(code.contains("impl < T : Send >"));
        assert!(code.contains("for Rejected < T >"));
        assert!(code.contains("where T : Sync"));
    }

    #[test]
    fn test_union_rejected() {
        let input: DeriveInput = parse_quote! {
            union Bits { a: u32, b: f32 }
        };
        let err = expand(&input).unwrap_err();
        assert!(err.to_string().contains("unions"));
    }
}
