use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::spanned::Spanned;
use syn::{
    Data, DeriveInput, Error as SynError, Field, Fields, Ident, Result as SynResult, Type, TypePath,
};

const LINK_ATTRIBUTE: &str = "registry_link";
const LINK_TYPE: &str = "RegistryLink";

pub fn expand_implementation(input: &DeriveInput) -> SynResult<TokenStream2> {
    let field = find_link_field(input)?;
    let self_type = &input.ident;
    let (impl_generics, type_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics depreg::link::HasRegistryLink for #self_type #type_generics #where_clause {
            fn registry_link(&self) -> &depreg::link::RegistryLink {
                &self.#field
            }
        }
    })
}

fn find_link_field(input: &DeriveInput) -> SynResult<&Ident> {
    let Data::Struct(data) = &input.data else {
        return Err(SynError::new(
            input.ident.span(),
            "`HasRegistryLink` can only be derived for structs",
        ));
    };
    let Fields::Named(fields) = &data.fields else {
        return Err(SynError::new(
            data.fields.span(),
            "`HasRegistryLink` expects a struct with named fields",
        ));
    };

    let marked: Vec<&Field> = fields
        .named
        .iter()
        .filter(|field| is_marked(field))
        .collect();
    match marked.as_slice() {
        [field] => return field_ident(*field),
        [] => {}
        [_, duplicated, ..] => {
            return Err(SynError::new(
                field_span(duplicated),
                "only one field can be marked with `#[registry_link]`",
            ))
        }
    }

    let typed: Vec<&Field> = fields
        .named
        .iter()
        .filter(|field| is_link_type(&field.ty))
        .collect();
    match typed.as_slice() {
        [field] => field_ident(*field),
        [] => Err(SynError::new(
            fields.span(),
            "expects a field of type `RegistryLink` or a field marked with `#[registry_link]`",
        )),
        [_, duplicated, ..] => Err(SynError::new(
            field_span(duplicated),
            "found more than one `RegistryLink` field, mark one with `#[registry_link]`",
        )),
    }
}

fn is_marked(field: &Field) -> bool {
    field
        .attrs
        .iter()
        .any(|attr| attr.path().is_ident(LINK_ATTRIBUTE))
}

fn is_link_type(ty: &Type) -> bool {
    let Type::Path(TypePath { qself: None, path }) = ty else {
        return false;
    };
    path.segments
        .last()
        .is_some_and(|segment| segment.ident == LINK_TYPE)
}

fn field_span(field: &Field) -> Span {
    field
        .ident
        .as_ref()
        .map_or_else(|| field.span(), Ident::span)
}

fn field_ident(field: &Field) -> SynResult<&Ident> {
    field
        .ident
        .as_ref()
        .ok_or_else(|| SynError::new(field.span(), "expects a named field"))
}
