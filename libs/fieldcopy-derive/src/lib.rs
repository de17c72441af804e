use std::collections::HashSet;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Ident, LitStr, Type, parse_macro_input};

/// Derive macro for copyable records.
///
/// Generates a `fieldcopy::record::Record` impl on the annotated struct:
///
/// - `schema()`: one `Field` per struct field, in declaration order, typed
///   through `FieldValue::field_type()`.
/// - `read_field(index)` / `write_field(index, value)`: positional accessors
///   matching that schema.
///
/// Every participating field type must implement `fieldcopy::value::FieldValue`.
///
/// # Example
///
/// ```ignore
/// #[derive(Record, Default)]
/// pub struct Target {
///     pub id: String,
///
///     #[field(rename = "name")]
///     pub display_name: String,
///
///     pub age: Option<i32>,
///
///     #[field(skip)]
///     pub cache: Vec<String>,
/// }
/// ```
#[proc_macro_derive(Record, attributes(field))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

/// A struct field that takes part in copies.
struct RecordField<'a> {
    ident: &'a Ident,
    ty: &'a Type,
    /// Name the field is matched under.
    name: String,
}

fn derive_impl(input: &DeriveInput) -> Result<TokenStream2, syn::Error> {
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Record cannot be derived for generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Record only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(name, "Record only supports structs"));
        }
    };

    let mut record_fields = Vec::new();
    let mut seen = HashSet::new();

    for field in fields {
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected named field"))?;

        // Parse #[field(...)] attribute.
        let mut rename: Option<String> = None;
        let mut skip = false;

        for attr in &field.attrs {
            if !attr.path().is_ident("field") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let value: LitStr = meta.value()?.parse()?;
                    rename = Some(value.value());
                    Ok(())
                } else if meta.path.is_ident("skip") {
                    skip = true;
                    Ok(())
                } else {
                    Err(meta.error("unknown field attribute (expected `rename` or `skip`)"))
                }
            })?;
        }

        if skip {
            continue;
        }

        let field_name = rename.unwrap_or_else(|| unraw(ident));
        if !seen.insert(field_name.clone()) {
            return Err(syn::Error::new_spanned(
                ident,
                format!("duplicate record field name '{field_name}'"),
            ));
        }

        record_fields.push(RecordField {
            ident,
            ty: &field.ty,
            name: field_name,
        });
    }

    let type_name = name.to_string();

    let schema_fields = record_fields.iter().map(|f| {
        let field_name = &f.name;
        let ty = f.ty;
        quote! {
            ::fieldcopy::schema::Field::new(
                #field_name,
                <#ty as ::fieldcopy::value::FieldValue>::field_type(),
            )
        }
    });

    let read_arms = record_fields.iter().enumerate().map(|(index, f)| {
        let ident = f.ident;
        quote! {
            #index => ::core::option::Option::Some(
                ::fieldcopy::value::FieldValue::to_value(&self.#ident)
            ),
        }
    });

    let write_arms = record_fields.iter().enumerate().map(|(index, f)| {
        let ident = f.ident;
        let ty = f.ty;
        quote! {
            #index => {
                self.#ident = <#ty as ::fieldcopy::value::FieldValue>::from_value(__value)?;
                ::core::result::Result::Ok(())
            }
        }
    });

    Ok(quote! {
        impl ::fieldcopy::record::Record for #name {
            fn schema() -> ::fieldcopy::schema::Schema {
                ::fieldcopy::schema::Schema::new(
                    #type_name,
                    ::std::vec![
                        #(#schema_fields),*
                    ],
                )
            }

            fn read_field(
                &self,
                __index: usize,
            ) -> ::core::option::Option<::fieldcopy::value::Value> {
                match __index {
                    #(#read_arms)*
                    _ => ::core::option::Option::None,
                }
            }

            fn write_field(
                &mut self,
                __index: usize,
                __value: ::fieldcopy::value::Value,
            ) -> ::core::result::Result<(), ::fieldcopy::value::Value> {
                match __index {
                    #(#write_arms)*
                    _ => ::core::result::Result::Err(__value),
                }
            }
        }
    })
}

/// Field name as written, without a raw-identifier prefix (`r#type` → `type`).
fn unraw(ident: &Ident) -> String {
    let s = ident.to_string();
    match s.strip_prefix("r#") {
        Some(stripped) => stripped.to_string(),
        None => s,
    }
}
