//! `#[derive(Parameters)]` implementation.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Fields, Type, parse2};

/// Struct-level options parsed from `#[parameters(...)]` attributes.
#[derive(Debug, Clone, Default)]
struct StructOptions {
    rename_all: Option<RenameRule>,
}

/// Field options parsed from `#[parameters(...)]` attributes.
#[derive(Debug, Clone, Default)]
struct FieldOptions {
    rename: Option<String>,
    skip: bool,
}

/// Case conversion rules for `rename_all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::enum_variant_names)]
enum RenameRule {
    LowerCase,
    UpperCase,
    CamelCase,
    PascalCase,
    SnakeCase,
    ScreamingSnakeCase,
    KebabCase,
    ScreamingKebabCase,
}

impl RenameRule {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "lowercase" => Some(Self::LowerCase),
            "UPPERCASE" => Some(Self::UpperCase),
            "camelCase" => Some(Self::CamelCase),
            "PascalCase" => Some(Self::PascalCase),
            "snake_case" => Some(Self::SnakeCase),
            "SCREAMING_SNAKE_CASE" => Some(Self::ScreamingSnakeCase),
            "kebab-case" => Some(Self::KebabCase),
            "SCREAMING-KEBAB-CASE" => Some(Self::ScreamingKebabCase),
            _ => None,
        }
    }

    /// Field names are `snake_case` already, so that rule is the identity.
    fn apply(self, field: &str) -> String {
        match self {
            Self::LowerCase => field.to_lowercase(),
            Self::UpperCase => field.to_uppercase(),
            Self::CamelCase => to_camel_case(field),
            Self::PascalCase => to_pascal_case(field),
            Self::SnakeCase => field.to_string(),
            Self::ScreamingSnakeCase => field.to_uppercase(),
            Self::KebabCase => field.replace('_', "-"),
            Self::ScreamingKebabCase => field.to_uppercase().replace('_', "-"),
        }
    }
}

fn to_camel_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = false;
    for c in s.chars() {
        if c == '_' {
            capitalize_next = !result.is_empty();
        } else if capitalize_next {
            result.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }
    result
}

fn to_pascal_case(s: &str) -> String {
    let camel = to_camel_case(s);
    let mut chars = camel.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Expand `#[derive(Parameters)]`.
pub fn expand_parameters_derive(input: TokenStream) -> syn::Result<TokenStream> {
    let input: DeriveInput = parse2(input)?;
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let struct_options = parse_struct_options(&input.attrs)?;

    let fields = match &input.data {
        syn::Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Parameters derive only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Parameters derive only supports structs",
            ));
        }
    };

    let mut inserts = Vec::new();
    for field in fields {
        let Some(field_name) = field.ident.as_ref() else {
            continue;
        };
        let options = parse_field_options(&field.attrs)?;
        if options.skip {
            continue;
        }

        // Explicit rename > rename_all > field name
        let raw_name = field_name.to_string();
        let field_key = raw_name.strip_prefix("r#").unwrap_or(&raw_name);
        let key = match (&options.rename, struct_options.rename_all) {
            (Some(rename), _) => rename.clone(),
            (None, Some(rule)) => rule.apply(field_key),
            (None, None) => field_key.to_string(),
        };

        inserts.push(generate_insert(field_name, &field.ty, &key));
    }

    Ok(quote! {
        impl #impl_generics ::parcel::ToParameters for #name #ty_generics #where_clause {
            fn to_parameters(&self) -> ::parcel::Parameters {
                let mut parameters = ::parcel::Parameters::new();
                #(#inserts)*
                parameters
            }
        }

        impl #impl_generics ::parcel::ToParameterValue for #name #ty_generics #where_clause {
            fn to_parameter_value(&self) -> ::parcel::ParameterValue {
                ::parcel::ParameterValue::Mapping(::parcel::ToParameters::to_parameters(self))
            }
        }
    })
}

fn parse_struct_options(attrs: &[syn::Attribute]) -> syn::Result<StructOptions> {
    let mut options = StructOptions::default();

    for attr in attrs {
        if !attr.path().is_ident("parameters") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                let value: syn::LitStr = meta.value()?.parse()?;
                let rule = RenameRule::parse(&value.value()).ok_or_else(|| {
                    syn::Error::new_spanned(
                        &value,
                        format!(
                            "unknown rename_all value: \"{}\". Expected one of: \
                             lowercase, UPPERCASE, camelCase, PascalCase, \
                             snake_case, SCREAMING_SNAKE_CASE, kebab-case, SCREAMING-KEBAB-CASE",
                            value.value()
                        ),
                    )
                })?;
                options.rename_all = Some(rule);
                Ok(())
            } else {
                Err(meta.error("unsupported parameters attribute, expected `rename_all`"))
            }
        })?;
    }

    Ok(options)
}

fn parse_field_options(attrs: &[syn::Attribute]) -> syn::Result<FieldOptions> {
    let mut options = FieldOptions::default();

    for attr in attrs {
        if !attr.path().is_ident("parameters") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                options.skip = true;
            } else if meta.path.is_ident("rename") {
                let value: syn::LitStr = meta.value()?.parse()?;
                options.rename = Some(value.value());
            } else {
                return Err(
                    meta.error("unsupported parameters attribute, expected `rename` or `skip`")
                );
            }
            Ok(())
        })?;
    }

    Ok(options)
}

fn generate_insert(field_name: &syn::Ident, field_ty: &Type, key: &str) -> TokenStream {
    if is_option_type(field_ty) {
        quote! {
            if let ::std::option::Option::Some(value) = &self.#field_name {
                parameters.insert(#key, ::parcel::ToParameterValue::to_parameter_value(value));
            }
        }
    } else {
        quote! {
            parameters.insert(
                #key,
                ::parcel::ToParameterValue::to_parameter_value(&self.#field_name),
            );
        }
    }
}

/// Check if a type is `Option<T>`.
fn is_option_type(ty: &Type) -> bool {
    matches!(ty, Type::Path(type_path)
        if type_path.path.segments.last()
            .is_some_and(|seg| seg.ident == "Option"))
}
