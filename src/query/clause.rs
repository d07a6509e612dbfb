//! Clause slots and statement rendering.
//!
//! [`ClauseBuffer`] keeps one fragment per [`Clause`] plus the parameter map.
//! Fragments are stored trimmed; rendering joins the non-empty slots of the
//! selected statement shape with single spaces.

use super::params::{self, Params};
use crate::value::Value;

/// One named fragment of a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Clause {
    Select,
    From,
    LeftJoin,
    RightJoin,
    InnerJoin,
    Where,
    GroupBy,
    Having,
    OrderBy,
    Limit,
    Insert,
    Update,
    Delete,
}

impl Clause {
    /// Slots rendered for a select statement, in output order
    pub const SELECT_SHAPE: [Clause; 10] = [
        Clause::Select,
        Clause::From,
        Clause::LeftJoin,
        Clause::RightJoin,
        Clause::InnerJoin,
        Clause::Where,
        Clause::GroupBy,
        Clause::Having,
        Clause::OrderBy,
        Clause::Limit,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Statement kind selected by slot precedence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementShape {
    Insert,
    Update,
    Delete,
    Select,
}

/// Clause fragments and bound parameters of one statement under construction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClauseBuffer {
    slots: [String; 13],
    params: Params,
}

impl ClauseBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, clause: Clause) -> &str {
        &self.slots[clause.index()]
    }

    pub fn is_empty(&self, clause: Clause) -> bool {
        self.slots[clause.index()].is_empty()
    }

    /// True when no slot holds text and no parameter is bound
    pub fn is_blank(&self) -> bool {
        self.slots.iter().all(String::is_empty) && self.params.is_empty()
    }

    /// Overwrite a slot
    pub fn set(&mut self, clause: Clause, text: &str) {
        self.slots[clause.index()] = text.trim().to_string();
    }

    /// Append a token, separated from the existing text by one space
    pub fn push(&mut self, clause: Clause, token: &str) {
        let token = token.trim();
        if token.is_empty() {
            return;
        }
        let slot = &mut self.slots[clause.index()];
        if !slot.is_empty() {
            slot.push(' ');
        }
        slot.push_str(token);
    }

    /// Append raw text with no separator
    pub fn extend(&mut self, clause: Clause, text: &str) {
        self.slots[clause.index()].push_str(text);
    }

    /// Whether the slot currently ends inside a just-opened group
    pub fn ends_with_group_open(&self, clause: Clause) -> bool {
        self.slots[clause.index()].ends_with('(')
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Direct access to the bound parameters, keyed with their `:` marker
    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    /// Register a parameter and return the collision-free key used
    pub fn bind(&mut self, key: &str, value: Value) -> String {
        params::bind(self.params_mut(), key, value)
    }

    /// Shape chosen by precedence: insert, then update, then delete, then select
    pub fn shape(&self) -> StatementShape {
        if !self.is_empty(Clause::Insert) {
            StatementShape::Insert
        } else if !self.is_empty(Clause::Update) {
            StatementShape::Update
        } else if !self.is_empty(Clause::Delete) {
            StatementShape::Delete
        } else {
            StatementShape::Select
        }
    }

    /// Join the given slots, skipping empty ones
    pub fn render_clauses(&self, clauses: &[Clause]) -> String {
        clauses
            .iter()
            .map(|clause| self.get(*clause))
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Render the final statement text
    pub fn render(&self) -> String {
        match self.shape() {
            StatementShape::Insert => self.render_clauses(&[Clause::Insert]),
            StatementShape::Update => self.render_clauses(&[Clause::Update, Clause::Where]),
            StatementShape::Delete => {
                self.render_clauses(&[Clause::Delete, Clause::From, Clause::Where])
            }
            StatementShape::Select => self.render_clauses(&Clause::SELECT_SHAPE),
        }
    }

    /// Clear every slot and the parameter map
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            slot.clear();
        }
        self.params.clear();
    }
}
