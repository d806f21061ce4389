//! `#[derive(Route)]`: parse `#[route(...)]` and generate a `Route` impl.

use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::parse::ParseStream;
use syn::punctuated::Punctuated;
use syn::{DeriveInput, Error, Ident, LitStr, Path, Result, Token};

// ---------------------------------------------------------------------------
// Attribute model
// ---------------------------------------------------------------------------

/// Kind of a trailing parameter, named after its `ParameterSegment` constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParameterKind {
    Required,
    Optional,
    Wildcard,
}

impl ParameterKind {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "required" => Some(Self::Required),
            "optional" => Some(Self::Optional),
            "wildcard" => Some(Self::Wildcard),
            _ => None,
        }
    }

    fn constructor(self) -> Ident {
        let name = match self {
            Self::Required => "required",
            Self::Optional => "optional",
            Self::Wildcard => "wildcard",
        };
        Ident::new(name, Span::call_site())
    }
}

/// Everything `#[route(...)]` can say.
#[derive(Default)]
struct RouteArgs {
    path: Option<LitStr>,
    parents: Vec<Path>,
    parameters: Vec<(ParameterKind, LitStr)>,
}

impl RouteArgs {
    fn parse_into(&mut self, input: ParseStream) -> Result<()> {
        while !input.is_empty() {
            if input.peek(LitStr) {
                self.set_path(input.parse()?)?;
            } else {
                let key: Ident = input.parse()?;
                let name = key.to_string();
                if name == "parents" {
                    let content;
                    syn::parenthesized!(content in input);
                    let parents = Punctuated::<Path, Token![,]>::parse_terminated(&content)?;
                    self.parents.extend(parents);
                } else if name == "path" {
                    input.parse::<Token![=]>()?;
                    self.set_path(input.parse()?)?;
                } else if let Some(kind) = ParameterKind::from_key(&name) {
                    input.parse::<Token![=]>()?;
                    self.parameters.push((kind, input.parse()?));
                } else {
                    return Err(Error::new(
                        key.span(),
                        format!("unknown route attribute `{name}`"),
                    ));
                }
            }

            if input.is_empty() {
                break;
            }
            input.parse::<Token![,]>()?;
        }
        Ok(())
    }

    fn set_path(&mut self, path: LitStr) -> Result<()> {
        if self.path.is_some() {
            return Err(Error::new(path.span(), "route path given more than once"));
        }
        self.path = Some(path);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Default path
// ---------------------------------------------------------------------------

/// Path derived from a type name: `UserProfileView` → `user-profile`.
///
/// `Main` and `MainView` map to the root path.
fn default_path(type_name: &str) -> String {
    let base = type_name.strip_suffix("View").unwrap_or(type_name);
    if base.is_empty() || base == "Main" {
        return String::new();
    }
    let mut path = String::with_capacity(base.len() + 4);
    for (i, ch) in base.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                path.push('-');
            }
            path.extend(ch.to_lowercase());
        } else {
            path.push(ch);
        }
    }
    path
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Entry point: generate the `Route` impl for a derive input.
pub(crate) fn route_impl(input: TokenStream) -> Result<TokenStream> {
    let input: DeriveInput = syn::parse2(input)?;

    let mut args = RouteArgs::default();
    for attr in input.attrs.iter().filter(|attr| attr.path().is_ident("route")) {
        attr.parse_args_with(|stream: ParseStream| args.parse_into(stream))?;
    }

    let ident = &input.ident;
    let path = args
        .path
        .unwrap_or_else(|| LitStr::new(&default_path(&ident.to_string()), ident.span()));
    let parents = &args.parents;
    let parameters = args.parameters.iter().map(|(kind, name)| {
        let constructor = kind.constructor();
        quote! {
            .with_parameter(::trellis::router::ParameterSegment::#constructor(#name))
        }
    });
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::trellis::router::Route for #ident #ty_generics #where_clause {
            fn route() -> ::trellis::router::RouteDescriptor {
                ::trellis::router::RouteDescriptor::new(#path)
                    #(.with_parent(::trellis::view::ParentViewType::of::<#parents>()))*
                    #(#parameters)*
            }
        }
    })
}

// ===========================================================================
// Tests
// ===========================================================================
