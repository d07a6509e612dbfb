//! Predicates, connectors and sort directions.

use super::builder::QueryBuilder;
use crate::row::Row;
use crate::value::Value;
use std::fmt;
use std::str::FromStr;

/// Closure building a parenthesized group on the same builder
pub type GroupFn<'a, 'db, M> = Box<dyn FnOnce(&mut QueryBuilder<'db, M>) + 'a>;

/// One argument form of `where`/`having`
///
/// The helpers on [`QueryBuilder`] (`where_`, `where_op`, `where_group`, ...)
/// build these; pass one directly to `where_condition` when the form is
/// decided at runtime.
pub enum Condition<'a, 'db, M = Row> {
    /// `<column> = :<key>`
    ColumnEquals { column: String, value: Value },
    /// `<column> <operator> :<key>`
    ColumnOp {
        column: String,
        operator: String,
        value: Value,
    },
    /// `( ... )` built by a closure receiving the builder itself
    Group(GroupFn<'a, 'db, M>),
}

impl<'a, 'db, M> Condition<'a, 'db, M> {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Condition::ColumnEquals {
            column: column.into(),
            value: value.into(),
        }
    }

    pub fn op(column: impl Into<String>, operator: impl Into<String>, value: impl Into<Value>) -> Self {
        Condition::ColumnOp {
            column: column.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }

    pub fn group<F>(f: F) -> Self
    where
        F: FnOnce(&mut QueryBuilder<'db, M>) + 'a,
    {
        Condition::Group(Box::new(f))
    }
}

impl<M> fmt::Debug for Condition<'_, '_, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::ColumnEquals { column, value } => f
                .debug_struct("ColumnEquals")
                .field("column", column)
                .field("value", value)
                .finish(),
            Condition::ColumnOp {
                column,
                operator,
                value,
            } => f
                .debug_struct("ColumnOp")
                .field("column", column)
                .field("operator", operator)
                .field("value", value)
                .finish(),
            Condition::Group(_) => f.write_str("Group(..)"),
        }
    }
}

/// Boolean connector placed between predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    And,
    Or,
}

impl Connector {
    pub fn as_str(self) -> &'static str {
        match self {
            Connector::And => "AND",
            Connector::Or => "OR",
        }
    }
}

/// Sort direction for `ORDER BY`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ASC" => Ok(Direction::Asc),
            "DESC" => Ok(Direction::Desc),
            other => Err(crate::Error::InvalidConfiguration(format!(
                "Invalid sort direction: {other}"
            ))),
        }
    }
}
