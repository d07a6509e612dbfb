//! Bind-parameter naming.
//!
//! Every parameter is stored under its marker-prefixed name (`:id`). A key
//! that is already taken gets the first free numeric suffix: `id`, `id_0`,
//! `id_1`, and so on. The name returned by [`bind`] is the one the rendered
//! fragment must use.

use crate::value::Value;
use indexmap::IndexMap;

/// Prefix of every named parameter in rendered SQL
pub const PARAM_MARKER: char = ':';

/// Marker-prefixed parameter name → bound value, in registration order
pub type Params = IndexMap<String, Value>;

/// Derive a parameter key from a column expression.
///
/// Characters outside `[A-Za-z0-9_]` become `_`, so `users.id` binds as
/// `users_id`. Plain column names pass through unchanged.
pub fn param_key(column: &str) -> String {
    column
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Marker-prefixed form of a key
pub fn marked(key: &str) -> String {
    format!("{PARAM_MARKER}{key}")
}

/// Return `key` if it is free in `params`, otherwise the first free `key_n`
pub fn uniquify(params: &Params, key: &str) -> String {
    if !params.contains_key(&marked(key)) {
        return key.to_string();
    }
    let mut n = 0usize;
    loop {
        let candidate = format!("{key}_{n}");
        if !params.contains_key(&marked(&candidate)) {
            return candidate;
        }
        n += 1;
    }
}

/// Register `value` under a collision-free variant of `key`.
///
/// Returns the key actually used, without the marker.
pub fn bind(params: &mut Params, key: &str, value: Value) -> String {
    let key = uniquify(params, key);
    params.insert(marked(&key), value);
    key
}
