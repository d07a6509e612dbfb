//! Attribute parsing utilities

use syn::{Attribute, ExprLit, Field, Lit};

fn name_value(attrs: &[Attribute], name: &str) -> Option<String> {
    for attr in attrs {
        if attr.path().is_ident(name) {
            if let Ok(meta) = attr.meta.require_name_value() {
                if let syn::Expr::Lit(ExprLit {
                    lit: Lit::Str(s), ..
                }) = &meta.value
                {
                    return Some(s.value());
                }
            }
        }
    }
    None
}

/// Extract table name from struct attributes
pub fn extract_table_name(attrs: &[Attribute]) -> Option<String> {
    name_value(attrs, "table_name")
}

/// Extract column name from field attributes
pub fn extract_column_name(field: &Field) -> Option<String> {
    name_value(&field.attrs, "column_name")
}

/// Check if field has the `#[primary_key]` attribute
pub fn has_primary_key(field: &Field) -> bool {
    field
        .attrs
        .iter()
        .any(|attr| attr.path().is_ident("primary_key"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::{parse_quote, DeriveInput};

    #[test]
    fn test_extract_table_name() {
        let input: DeriveInput = parse_quote! {
            #[table_name = "users"]
            struct User { id: i64 }
        };
        assert_eq!(extract_table_name(&input.attrs).as_deref(), Some("users"));
    }

    #[test]
    fn test_field_attributes() {
        let input: DeriveInput = parse_quote! {
            struct User {
                #[primary_key]
                #[column_name = "user_id"]
                id: i64,
                name: String,
            }
        };
        let syn::Data::Struct(data) = input.data else {
            panic!("expected struct");
        };
        let fields: Vec<_> = data.fields.iter().collect();
        assert!(has_primary_key(fields[0]));
        assert_eq!(extract_column_name(fields[0]).as_deref(), Some("user_id"));
        assert!(!has_primary_key(fields[1]));
        assert_eq!(extract_column_name(fields[1]), None);
    }
}
