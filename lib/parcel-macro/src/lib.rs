//! Procedural macros for parcel.
//!
//! - `#[derive(Parameters)]` - build a parameter mapping from a struct
//!
//! # Example
//!
//! ```ignore
//! use parcel::prelude::*;
//!
//! #[derive(Parameters)]
//! struct Search {
//!     q: String,
//!     page: Option<u32>,
//! }
//!
//! let request = Request::builder(Method::Get, "https://example.com/search")
//!     .parameters(&Search { q: "rust".into(), page: None })
//!     .build()?;
//! ```

mod derive;

use proc_macro::TokenStream;

/// Derive `ToParameters` and `ToParameterValue` for a struct with named
/// fields.
///
/// Each field becomes one entry, keyed by the field name. Field values go
/// through `ToParameterValue`, so a field whose type also derives
/// `Parameters` becomes a nested mapping. `Option<T>` fields are left out
/// when `None`.
///
/// # Struct Attributes
///
/// - `#[parameters(rename_all = "camelCase")]` - Rename all fields using a case convention
///
/// Supported case conventions:
/// - `lowercase`, `UPPERCASE`
/// - `camelCase`, `PascalCase`
/// - `snake_case`, `SCREAMING_SNAKE_CASE`
/// - `kebab-case`, `SCREAMING-KEBAB-CASE`
///
/// # Field Attributes
///
/// - `#[parameters(rename = "name")]` - Use a different key (overrides `rename_all`)
/// - `#[parameters(skip)]` - Leave the field out
///
/// # Example
///
/// ```ignore
/// use parcel::Parameters;
///
/// #[derive(Parameters)]
/// #[parameters(rename_all = "camelCase")]
/// struct NewUser {
///     display_name: String,      // becomes "displayName"
///     address: Address,          // becomes "address[street]", ...
///     #[parameters(rename = "tag")]
///     labels: Vec<String>,       // becomes "tag[]"
///     #[parameters(skip)]
///     cache_key: u64,
/// }
///
/// #[derive(Parameters)]
/// struct Address {
///     street: String,
/// }
/// ```
#[proc_macro_derive(Parameters, attributes(parameters))]
pub fn derive_parameters(input: TokenStream) -> TokenStream {
    derive::expand_parameters_derive(input.into())
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
