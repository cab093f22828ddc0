mod link;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use syn::{DeriveInput, Result as SynResult};

/// Implements `depreg::link::HasRegistryLink` for a struct with named fields.
///
/// The link field is the one marked with `#[registry_link]`, or else the only
/// field whose type is named `RegistryLink`.
#[proc_macro_derive(HasRegistryLink, attributes(registry_link))]
pub fn derive_has_registry_link(item: TokenStream) -> TokenStream {
    match derive_has_registry_link_impl(item) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

fn derive_has_registry_link_impl(item: TokenStream) -> SynResult<TokenStream2> {
    let input = syn::parse::<DeriveInput>(item)?;
    link::expand_implementation(&input)
}
