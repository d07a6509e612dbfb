//! Procedural macros for sqlwright
//!
//! This crate provides the `ActiveRecord` derive. Use it through the
//! re-export `sqlwright::ActiveRecord`.

mod attributes;
mod macros;
mod utils;

use proc_macro::TokenStream;

/// Derive macro for `ActiveRecord`
///
/// This macro generates:
/// - `FromRow`, reading each field from its column with `Row::try_get`
/// - `ActiveRecord`, with `TABLE`, `PRIMARY_KEY`, `COLUMNS` and the value accessors
///
/// # Attributes
///
/// - `#[table_name = "users"]` on the struct (required)
/// - `#[primary_key]` on one field; defaults to the field named `id`
/// - `#[column_name = "user_name"]` on a field; defaults to the snake_case field name
///
/// ```ignore
/// #[derive(ActiveRecord)]
/// #[table_name = "users"]
/// struct User {
///     #[primary_key]
///     user_id: i64,
///     #[column_name = "user_name"]
///     name: String,
///     email: Option<String>,
/// }
/// ```
#[proc_macro_derive(ActiveRecord, attributes(table_name, primary_key, column_name))]
pub fn derive_active_record(input: TokenStream) -> TokenStream {
    macros::derive_active_record(input)
}
