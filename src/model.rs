//! Active-record layer.
//!
//! A type implementing [`ActiveRecord`] maps to one table. The associated
//! functions hand out builders already pinned to that table (its columns
//! selected, its primary key configured), so a model reads like
//!
//! ```
//! use sqlwright::{ActiveRecord, Database, QueryBuilderFactory, SqliteDatabase};
//!
//! #[derive(Debug, ActiveRecord)]
//! #[table_name = "users"]
//! struct User {
//!     id: i64,
//!     name: String,
//! }
//!
//! let db = SqliteDatabase::open_in_memory()?;
//! db.execute_batch("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)")?;
//! let factory = QueryBuilderFactory::new(&db);
//!
//! let mut user = User { id: 0, name: "Alice".into() };
//! user.save(&factory)?;
//! assert_eq!(user.id, 1);
//!
//! let found = User::where_(&factory, "name", "Alice").first()?;
//! assert_eq!(found.map(|u| u.id), Some(1));
//! # Ok::<(), sqlwright::Error>(())
//! ```

use crate::collection::Collection;
use crate::error::{Error, Result};
use crate::factory::QueryBuilderFactory;
use crate::query::{Direction, QueryBuilder};
use crate::row::FromRow;
use crate::value::{Value, Values};

/// A struct persisted as one row of [`TABLE`](ActiveRecord::TABLE)
///
/// Usually derived with `#[derive(ActiveRecord)]`.
pub trait ActiveRecord: FromRow {
    /// Table the record lives in
    const TABLE: &'static str;

    /// Primary key column
    const PRIMARY_KEY: &'static str;

    /// Columns selected when loading the record, in field order
    const COLUMNS: &'static [&'static str];

    /// Every column value of this record, primary key included
    fn values(&self) -> Values;

    fn primary_key_value(&self) -> Value;

    /// Store a generated primary key
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValue`] if `value` does not fit the key field.
    fn set_primary_key(&mut self, value: Value) -> Result<()>;

    /// Builder selecting this model's columns from its table
    fn query<'db>(factory: &QueryBuilderFactory<'db>) -> QueryBuilder<'db, Self> {
        let mut query = factory.create_for::<Self>();
        query
            .set_primary_key(Self::PRIMARY_KEY)
            .select(Self::COLUMNS.iter().copied())
            .from(Self::TABLE);
        query
    }

    /// Builder selecting only `columns` from this model's table
    fn select<'db, I, S>(factory: &QueryBuilderFactory<'db>, columns: I) -> QueryBuilder<'db, Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut query = Self::query(factory);
        query.select(columns);
        query
    }

    fn where_<'db>(
        factory: &QueryBuilderFactory<'db>,
        column: &str,
        value: impl Into<Value>,
    ) -> QueryBuilder<'db, Self> {
        let mut query = Self::query(factory);
        query.where_(column, value);
        query
    }

    fn where_op<'db>(
        factory: &QueryBuilderFactory<'db>,
        column: &str,
        operator: &str,
        value: impl Into<Value>,
    ) -> QueryBuilder<'db, Self> {
        let mut query = Self::query(factory);
        query.where_op(column, operator, value);
        query
    }

    /// On a fresh builder the first `OR` condition opens the `WHERE` clause
    fn or_where<'db>(
        factory: &QueryBuilderFactory<'db>,
        column: &str,
        value: impl Into<Value>,
    ) -> QueryBuilder<'db, Self> {
        let mut query = Self::query(factory);
        query.or_where(column, value);
        query
    }

    fn left_join<'db>(
        factory: &QueryBuilderFactory<'db>,
        table: &str,
        left: &str,
        right: &str,
    ) -> QueryBuilder<'db, Self> {
        let mut query = Self::query(factory);
        query.left_join(table, left, right);
        query
    }

    fn right_join<'db>(
        factory: &QueryBuilderFactory<'db>,
        table: &str,
        left: &str,
        right: &str,
    ) -> QueryBuilder<'db, Self> {
        let mut query = Self::query(factory);
        query.right_join(table, left, right);
        query
    }

    fn inner_join<'db>(
        factory: &QueryBuilderFactory<'db>,
        table: &str,
        left: &str,
        right: &str,
    ) -> QueryBuilder<'db, Self> {
        let mut query = Self::query(factory);
        query.inner_join(table, left, right);
        query
    }

    fn order_by<'db>(
        factory: &QueryBuilderFactory<'db>,
        column: &str,
        direction: Direction,
    ) -> QueryBuilder<'db, Self> {
        let mut query = Self::query(factory);
        query.order_by(column, direction);
        query
    }

    fn limit<'db>(factory: &QueryBuilderFactory<'db>, limit: u64) -> QueryBuilder<'db, Self> {
        let mut query = Self::query(factory);
        query.limit(limit);
        query
    }

    fn group_by<'db, I, S>(factory: &QueryBuilderFactory<'db>, columns: I) -> QueryBuilder<'db, Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut query = Self::query(factory);
        query.group_by(columns);
        query
    }

    fn having<'db>(
        factory: &QueryBuilderFactory<'db>,
        column: &str,
        value: impl Into<Value>,
    ) -> QueryBuilder<'db, Self> {
        let mut query = Self::query(factory);
        query.having(column, value);
        query
    }

    fn or_having<'db>(
        factory: &QueryBuilderFactory<'db>,
        column: &str,
        value: impl Into<Value>,
    ) -> QueryBuilder<'db, Self> {
        let mut query = Self::query(factory);
        query.or_having(column, value);
        query
    }

    /// Pending `UPDATE` of this table; chain a `where_` and call `save`
    fn update<'db, I, K, V>(factory: &QueryBuilderFactory<'db>, values: I) -> QueryBuilder<'db, Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut query = Self::query(factory);
        query.update(Self::TABLE, values);
        query
    }

    /// Pending `DELETE FROM` this table; chain a `where_` and call `save`
    fn delete<'db>(factory: &QueryBuilderFactory<'db>) -> QueryBuilder<'db, Self> {
        let mut query = factory.create_for::<Self>();
        query
            .set_primary_key(Self::PRIMARY_KEY)
            .delete()
            .from(Self::TABLE);
        query
    }

    /// Insert a row and load it back by its generated key
    ///
    /// # Errors
    ///
    /// Returns the database error unchanged, or [`Error::RecordNotFound`] if
    /// the inserted row cannot be read back.
    fn insert<I, K, V>(factory: &QueryBuilderFactory<'_>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut query = factory.create_for::<Self>();
        query.insert(Self::TABLE, values).save()?;
        let id = query.last_insert_id()?;
        Self::find(factory, id)?.ok_or(Error::RecordNotFound)
    }

    fn first(factory: &QueryBuilderFactory<'_>) -> Result<Option<Self>> {
        Self::query(factory).first()
    }

    /// Record with the highest primary key
    fn last(factory: &QueryBuilderFactory<'_>) -> Result<Option<Self>> {
        Self::query(factory).last()
    }

    fn find(factory: &QueryBuilderFactory<'_>, id: impl Into<Value>) -> Result<Option<Self>> {
        Self::query(factory).find(id)
    }

    fn all(factory: &QueryBuilderFactory<'_>) -> Result<Collection<Self>> {
        Self::query(factory).all()
    }

    fn count(factory: &QueryBuilderFactory<'_>) -> Result<usize> {
        Self::query(factory).count()
    }

    fn exists(factory: &QueryBuilderFactory<'_>) -> Result<bool> {
        Self::query(factory).exists()
    }

    /// Insert or update this record
    ///
    /// A record whose primary key is empty (see [`Value::is_empty`]) is
    /// inserted without that column and receives the generated key. Any other
    /// record updates its non-key columns filtered by primary key.
    ///
    /// # Returns
    ///
    /// `Ok(true)` once the statement ran.
    fn save(&mut self, factory: &QueryBuilderFactory<'_>) -> Result<bool> {
        let mut values = self.values();
        values.shift_remove(Self::PRIMARY_KEY);
        let primary_key = self.primary_key_value();

        let mut query = factory.create_for::<Self>();
        if primary_key.is_empty() {
            let saved = query.insert(Self::TABLE, values).save()?;
            let id = query.last_insert_id()?;
            log::debug!("Inserted {} row with {} = {}", Self::TABLE, Self::PRIMARY_KEY, id);
            self.set_primary_key(Value::Int(id))?;
            Ok(saved)
        } else {
            query
                .update(Self::TABLE, values)
                .where_(Self::PRIMARY_KEY, primary_key)
                .save()
        }
    }

    /// Delete this record's row
    ///
    /// # Errors
    ///
    /// Returns [`Error::PrimaryKeyRequired`] if the primary key is empty.
    fn destroy(&self, factory: &QueryBuilderFactory<'_>) -> Result<bool> {
        let primary_key = self.primary_key_value();
        if primary_key.is_empty() {
            return Err(Error::PrimaryKeyRequired);
        }
        Self::delete(factory)
            .where_(Self::PRIMARY_KEY, primary_key)
            .save()
    }
}
