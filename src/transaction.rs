//! Transactions and savepoints.
//!
//! This module provides:
//! - [`Transaction`], a guard over an open transaction on a [`Database`]
//! - SQLite locking modes ([`TransactionMode`])
//! - Nested transactions through savepoints
//! - Commit/rollback operations, with rollback on drop

use crate::error::{Error, Result};
use crate::executor::Database;
use crate::factory::QueryBuilderFactory;
use crate::query::{Params, QueryBuilder};
use crate::row::Row;

#[cfg(feature = "metrics")]
use crate::metrics::METRICS;
#[cfg(feature = "tracing")]
use crate::metrics::tracing_helpers;

/// SQLite transaction locking mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionMode {
    /// Locks are taken on first access (default)
    #[default]
    Deferred,
    /// A write lock is taken immediately
    Immediate,
    /// No other connection may read or write until commit
    Exclusive,
}

impl TransactionMode {
    fn to_sql(self) -> &'static str {
        match self {
            TransactionMode::Deferred => "BEGIN DEFERRED",
            TransactionMode::Immediate => "BEGIN IMMEDIATE",
            TransactionMode::Exclusive => "BEGIN EXCLUSIVE",
        }
    }
}

/// A database transaction
///
/// All statements executed through the database while the transaction is
/// open are committed or rolled back together. A transaction that is dropped
/// without `commit` or `rollback` is rolled back.
///
/// # Examples
///
/// ```
/// use sqlwright::{Database, QueryBuilder, SqliteDatabase, Transaction};
///
/// let db = SqliteDatabase::open_in_memory()?;
/// db.execute_batch("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)")?;
///
/// let tx = Transaction::begin(&db)?;
/// tx.query().insert("users", [("name", "Alice")]).save()?;
/// tx.rollback()?;
///
/// assert_eq!(QueryBuilder::new(&db).select(["*"]).from("users").count()?, 0);
/// # Ok::<(), sqlwright::Error>(())
/// ```
pub struct Transaction<'db> {
    db: &'db dyn Database,
    depth: u32,
    closed: bool,
}

impl<'db> Transaction<'db> {
    /// Start a deferred transaction
    pub fn begin(db: &'db dyn Database) -> Result<Self> {
        Self::begin_with_mode(db, TransactionMode::Deferred)
    }

    /// Start a transaction with a specific locking mode
    pub fn begin_with_mode(db: &'db dyn Database, mode: TransactionMode) -> Result<Self> {
        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::begin_transaction_span().entered();

        db.execute_batch(mode.to_sql())?;

        #[cfg(feature = "metrics")]
        METRICS.record_transaction();

        Ok(Self {
            db,
            depth: 0,
            closed: false,
        })
    }

    /// Start a nested transaction (savepoint)
    ///
    /// Each nested transaction creates savepoint `sp_<depth>`; rolling it back
    /// undoes only the work done since the savepoint and keeps the outer
    /// transaction open.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sqlwright::{Database, SqliteDatabase, Transaction};
    /// # let db = SqliteDatabase::open_in_memory()?;
    /// # db.execute_batch("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)")?;
    /// let mut tx = Transaction::begin(&db)?;
    /// tx.query().insert("users", [("name", "Alice")]).save()?;
    ///
    /// let nested = tx.begin_nested()?;
    /// nested.query().insert("users", [("name", "Bob")]).save()?;
    /// nested.rollback()?;
    ///
    /// tx.commit()?;
    /// # Ok::<(), sqlwright::Error>(())
    /// ```
    ///
    /// The savepoint borrows its parent, so the parent cannot be committed
    /// or rolled back while the savepoint is still open:
    ///
    /// ```compile_fail
    /// # use sqlwright::{SqliteDatabase, Transaction};
    /// # let db = SqliteDatabase::open_in_memory()?;
    /// let mut tx = Transaction::begin(&db)?;
    /// let nested = tx.begin_nested()?;
    /// tx.commit()?;
    /// nested.rollback()?;
    /// # Ok::<(), sqlwright::Error>(())
    /// ```
    pub fn begin_nested(&mut self) -> Result<Transaction<'_>> {
        if self.closed {
            return Err(Error::TransactionClosed);
        }

        let depth = self.depth + 1;
        self.db.execute_batch(&format!("SAVEPOINT {}", savepoint_name(depth)))?;

        Ok(Transaction {
            db: self.db,
            depth,
            closed: false,
        })
    }

    /// Commit the transaction
    ///
    /// A nested transaction releases its savepoint instead.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TransactionClosed`] if the transaction is already closed.
    pub fn commit(mut self) -> Result<()> {
        if self.closed {
            return Err(Error::TransactionClosed);
        }

        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::commit_transaction_span().entered();

        if self.depth == 0 {
            self.db.commit()?;
        } else {
            self.db
                .execute_batch(&format!("RELEASE SAVEPOINT {}", savepoint_name(self.depth)))?;
        }

        self.closed = true;
        Ok(())
    }

    /// Rollback the transaction
    ///
    /// A nested transaction rolls back to its savepoint instead.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TransactionClosed`] if the transaction is already closed.
    pub fn rollback(mut self) -> Result<()> {
        self.rollback_in_place()
    }

    /// Execute a statement inside the transaction
    pub fn execute(&self, sql: &str, params: &Params) -> Result<u64> {
        self.ensure_open()?;
        self.db.execute(sql, params)
    }

    /// Select rows inside the transaction
    pub fn select_rows(&self, sql: &str, params: &Params) -> Result<Vec<Row>> {
        self.ensure_open()?;
        self.db.select_rows(sql, params)
    }

    /// Fresh query builder on the transaction's database
    pub fn query(&self) -> QueryBuilder<'db> {
        QueryBuilder::new(self.db)
    }

    pub fn factory(&self) -> QueryBuilderFactory<'db> {
        QueryBuilderFactory::new(self.db)
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Check if the transaction is closed
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            Err(Error::TransactionClosed)
        } else {
            Ok(())
        }
    }

    fn rollback_in_place(&mut self) -> Result<()> {
        self.ensure_open()?;

        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::rollback_transaction_span().entered();

        // closed even if the rollback fails; Drop must not retry it
        self.closed = true;
        if self.depth == 0 {
            self.db.rollback()
        } else {
            let name = savepoint_name(self.depth);
            self.db
                .execute_batch(&format!("ROLLBACK TO SAVEPOINT {name}; RELEASE SAVEPOINT {name}"))
        }
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        log::warn!(
            "Transaction at depth {} dropped without commit or rollback, rolling back",
            self.depth
        );
        if let Err(e) = self.rollback_in_place() {
            log::warn!("Rollback of dropped transaction failed: {}", e);
        }
    }
}

fn savepoint_name(depth: u32) -> String {
    format!("sp_{depth}")
}
