//! Parsing of `#[failure(...)]` attributes.

use syn::{Attribute, LitStr, Result};

/// Options collected from `#[failure(...)]`.
#[derive(Debug, Default)]
pub struct FailureAttrs {
    /// Override for the kind name.
    pub name: Option<LitStr>,
}

/// Collect options from every `#[failure(...)]` attribute on the item.
pub fn parse(attrs: &[Attribute]) -> Result<FailureAttrs> {
    let mut out = FailureAttrs::default();

    for attr in attrs.iter().filter(|a| a.path().is_ident("failure")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                if out.name.is_some() {
                    return Err(meta.error("duplicate `name` option"));
                }
                let lit: LitStr = meta.value()?.parse()?;
                if lit.value().trim().is_empty() {
                    return Err(syn::Error::new(lit.span(), "kind name cannot be empty"));
                }
                out.name = Some(lit);
                Ok(())
            } else {
                Err(meta.error("unknown `failure` option, expected `name = \"...\"`"))
            }
        })?;
    }

    Ok(out)
}
