//! Rendered statement handed to a [`Database`](crate::Database).

use super::params::Params;
use serde::Serialize;
use std::fmt;

/// Final SQL text plus its bound parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statement {
    pub sql: String,
    pub params: Params,
}

impl Statement {
    pub fn new(sql: impl Into<String>, params: Params) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// Statement without parameters
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::new(sql, Params::new())
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}
