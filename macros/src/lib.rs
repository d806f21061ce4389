//! Proc macros for trellis: `#[derive(Route)]` route declarations.
//!
//! This crate is not meant to be used directly. Enable the `macros` feature on `trellis`.

use proc_macro::TokenStream;

mod route_derive;

/// Declare the route of a view type.
///
/// Generates an implementation of `trellis::router::Route`. The type must
/// also implement `View` and `Default`.
///
/// # Attributes
///
/// - `#[route("users")]`: the path, alone
/// - `path = "users"`: the path, as a key
/// - `parents(Layout, Shell)`: parent views, immediate parent first
/// - `required = "id"`, `optional = "tab"`, `wildcard = "rest"`: trailing
///   parameter segments, in the order written
///
/// Without a path the type name is used: a trailing `View` is dropped, the
/// rest is kebab-cased, and `Main` maps to the root path.
///
/// # Example
///
/// ```ignore
/// #[derive(Default, Route)]
/// #[route(path = "users", parents(Shell), required = "id", optional = "tab")]
/// struct UserView { /* ... */ }
///
/// #[derive(Default, Route)]
/// struct AboutView; // "about"
/// ```
#[proc_macro_derive(Route, attributes(route))]
pub fn derive_route(input: TokenStream) -> TokenStream {
    route_derive::route_impl(input.into())
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
