//! Derive macro for `ActiveRecord`
//!
//! Generates both `FromRow` and `ActiveRecord` for a struct with named
//! fields. Every field is one column.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Ident, Type};

use crate::attributes;
use crate::utils;

/// Column mapping of one struct field
struct ColumnField<'a> {
    ident: &'a Ident,
    ty: &'a Type,
    column: String,
    primary_key: bool,
}

pub fn derive_active_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;

    let fields = match &input.data {
        Data::Struct(syn::DataStruct {
            fields: Fields::Named(fields),
            ..
        }) => &fields.named,
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "ActiveRecord can only be derived for structs with named fields",
            ));
        }
    };

    let table_name = attributes::extract_table_name(&input.attrs).ok_or_else(|| {
        syn::Error::new_spanned(
            &input.ident,
            "ActiveRecord requires #[table_name = \"...\"] on the struct",
        )
    })?;

    let columns: Vec<ColumnField> = fields
        .iter()
        .filter_map(|field| {
            let ident = field.ident.as_ref()?;
            Some(ColumnField {
                ident,
                ty: &field.ty,
                column: attributes::extract_column_name(field)
                    .unwrap_or_else(|| utils::snake_case(&ident.to_string())),
                primary_key: attributes::has_primary_key(field),
            })
        })
        .collect();

    let marked: Vec<&ColumnField> = columns.iter().filter(|c| c.primary_key).collect();
    let primary_key = match marked.as_slice() {
        [single] => *single,
        [] => columns.iter().find(|c| c.ident == "id").ok_or_else(|| {
            syn::Error::new_spanned(
                &input.ident,
                "ActiveRecord needs a field marked #[primary_key] or a field named `id`",
            )
        })?,
        [_, second, ..] => {
            return Err(syn::Error::new_spanned(
                second.ident,
                "only one field can be marked #[primary_key]",
            ));
        }
    };

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let from_row_fields = columns.iter().map(|c| {
        let ident = c.ident;
        let column = &c.column;
        quote! { #ident: row.try_get(#column)?, }
    });

    let column_names = columns.iter().map(|c| &c.column);

    let value_inserts = columns.iter().map(|c| {
        let ident = c.ident;
        let column = &c.column;
        quote! {
            values.insert(
                #column.to_string(),
                ::sqlwright::Value::from(::std::clone::Clone::clone(&self.#ident)),
            );
        }
    });

    let pk_ident = primary_key.ident;
    let pk_ty = primary_key.ty;
    let pk_column = &primary_key.column;

    Ok(quote! {
        impl #impl_generics ::sqlwright::FromRow for #struct_name #ty_generics #where_clause {
            fn from_row(row: &::sqlwright::Row) -> ::sqlwright::Result<Self> {
                Ok(Self {
                    #(#from_row_fields)*
                })
            }
        }

        impl #impl_generics ::sqlwright::ActiveRecord for #struct_name #ty_generics #where_clause {
            const TABLE: &'static str = #table_name;
            const PRIMARY_KEY: &'static str = #pk_column;
            const COLUMNS: &'static [&'static str] = &[#(#column_names),*];

            fn values(&self) -> ::sqlwright::Values {
                let mut values = ::sqlwright::Values::new();
                #(#value_inserts)*
                values
            }

            fn primary_key_value(&self) -> ::sqlwright::Value {
                ::sqlwright::Value::from(::std::clone::Clone::clone(&self.#pk_ident))
            }

            fn set_primary_key(&mut self, value: ::sqlwright::Value) -> ::sqlwright::Result<()> {
                self.#pk_ident = <#pk_ty as ::sqlwright::TryGetable>::try_get(value).map_err(
                    |source| ::sqlwright::Error::InvalidValue {
                        column: #pk_column.to_string(),
                        source,
                    },
                )?;
                Ok(())
            }
        }
    })
}
