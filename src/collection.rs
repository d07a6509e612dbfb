//! Ordered container for query results.
//!
//! `Collection<T>` is what [`QueryBuilder::get`](crate::QueryBuilder::get)
//! and [`QueryBuilder::all`](crate::QueryBuilder::all) hand back. It is a thin
//! wrapper over `Vec<T>`; transforming operations (`merge`, `sort_by`, `map`,
//! `filter`) return a new collection and leave the receiver untouched.

use crate::row::Row;
use crate::value::Value;
use std::fmt;

/// An ordered collection of hydrated records
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Collection<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn push(&mut self, item: T) -> &mut Self {
        self.items.push(item);
        self
    }

    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Alias of [`len`](Self::len)
    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.items.contains(value)
    }

    /// New collection with `other` appended after the current items
    pub fn merge(&self, other: impl IntoIterator<Item = T>) -> Self
    where
        T: Clone,
    {
        let mut items = self.items.clone();
        items.extend(other);
        Self { items }
    }

    /// New collection sorted with `compare`; the sort is stable
    pub fn sort_by<F>(&self, compare: F) -> Self
    where
        T: Clone,
        F: FnMut(&T, &T) -> std::cmp::Ordering,
    {
        let mut items = self.items.clone();
        items.sort_by(compare);
        Self { items }
    }

    /// Apply `f` to every item in place
    pub fn each<F: FnMut(&mut T)>(&mut self, f: F) -> &mut Self {
        self.items.iter_mut().for_each(f);
        self
    }

    pub fn map<U, F: FnMut(&T) -> U>(&self, f: F) -> Collection<U> {
        Collection {
            items: self.items.iter().map(f).collect(),
        }
    }

    pub fn filter<F>(&self, mut predicate: F) -> Self
    where
        T: Clone,
        F: FnMut(&T) -> bool,
    {
        Self {
            items: self
                .items
                .iter()
                .filter(|item| predicate(*item))
                .cloned()
                .collect(),
        }
    }

    /// First item matching `predicate`
    pub fn find<F: FnMut(&T) -> bool>(&self, mut predicate: F) -> Option<&T> {
        self.items.iter().find(|item| predicate(*item))
    }

    pub fn exists<F: FnMut(&T) -> bool>(&self, predicate: F) -> bool {
        self.find(predicate).is_some()
    }

    pub fn reduce<A, F: FnMut(A, &T) -> A>(&self, f: F, initial: A) -> A {
        self.items.iter().fold(initial, f)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    /// Take ownership of the first item, dropping the rest
    pub fn into_first(self) -> Option<T> {
        self.items.into_iter().next()
    }
}

impl Collection<Row> {
    /// Values of one column across all rows; rows without it yield `Null`
    pub fn pluck(&self, column: &str) -> Collection<Value> {
        self.map(|row| row.get(column).cloned().unwrap_or(Value::Null))
    }
}

impl<T> From<Vec<T>> for Collection<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T> FromIterator<T> for Collection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T> IntoIterator for Collection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: fmt::Display> fmt::Display for Collection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}
