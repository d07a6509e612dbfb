//! Fluent statement builder.
//!
//! A [`QueryBuilder`] owns one [`ClauseBuffer`] and borrows the
//! [`Database`] it executes against. Clause methods mutate the buffer and
//! return `&mut Self`; execution methods render the buffer, run it, and
//! hydrate rows into the builder's model type `M`.
//!
//! Mutating executions (`save`, `count`, `exists`) reset the buffer on
//! success so the builder can be reused. Failures leave it untouched.

use super::clause::{Clause, ClauseBuffer, StatementShape};
use super::condition::{Condition, Connector, Direction};
use super::params::{marked, param_key, Params};
use super::statement::Statement;
use crate::collection::Collection;
use crate::error::{Error, Result};
use crate::executor::{select, Database};
use crate::row::{FromRow, Row};
use crate::value::Value;
use std::marker::PhantomData;

/// Primary key column used when none is configured
pub const DEFAULT_PRIMARY_KEY: &str = "id";

/// Builder for one parameterized statement
///
/// # Examples
///
/// ```
/// use sqlwright::{QueryBuilder, SqliteDatabase};
///
/// let db = SqliteDatabase::open_in_memory()?;
/// let mut query = QueryBuilder::new(&db);
/// query.select(["*"]).from("users").where_("id", 1);
///
/// assert_eq!(query.query(), "SELECT * FROM users WHERE id = :id");
/// assert_eq!(query.params().len(), 1);
/// # Ok::<(), sqlwright::Error>(())
/// ```
pub struct QueryBuilder<'db, M = Row> {
    db: &'db dyn Database,
    buffer: ClauseBuffer,
    primary_key: String,
    _model: PhantomData<fn() -> M>,
}

impl<'db> QueryBuilder<'db, Row> {
    /// Create a builder that hydrates results as [`Row`]s
    pub fn new(db: &'db dyn Database) -> Self {
        Self::for_model(db)
    }
}

impl<'db, M> QueryBuilder<'db, M> {
    /// Create a builder that hydrates results as `M`
    pub fn for_model(db: &'db dyn Database) -> Self {
        Self {
            db,
            buffer: ClauseBuffer::new(),
            primary_key: DEFAULT_PRIMARY_KEY.to_string(),
            _model: PhantomData,
        }
    }

    /// Switch the hydration type, keeping the buffer and primary key
    pub fn into_model<N>(self) -> QueryBuilder<'db, N> {
        QueryBuilder {
            db: self.db,
            buffer: self.buffer,
            primary_key: self.primary_key,
            _model: PhantomData,
        }
    }

    pub fn set_primary_key(&mut self, primary_key: impl Into<String>) -> &mut Self {
        self.primary_key = primary_key.into();
        self
    }

    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    pub fn database(&self) -> &'db dyn Database {
        self.db
    }

    pub fn buffer(&self) -> &ClauseBuffer {
        &self.buffer
    }

    /// `SELECT <columns>`, or `SELECT *` when `columns` is empty
    pub fn select<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let columns = join_columns(columns);
        let columns = if columns.is_empty() { "*" } else { columns.as_str() };
        self.buffer.set(Clause::Select, &format!("SELECT {columns}"));
        self
    }

    pub fn select_all(&mut self) -> &mut Self {
        self.buffer.set(Clause::Select, "SELECT *");
        self
    }

    pub fn from(&mut self, table: &str) -> &mut Self {
        self.buffer.set(Clause::From, &format!("FROM {table}"));
        self
    }

    /// Append `LEFT JOIN <table> ON <left> = <right>`
    pub fn left_join(&mut self, table: &str, left: &str, right: &str) -> &mut Self {
        self.join(Clause::LeftJoin, table, left, "=", right)
    }

    pub fn left_join_op(&mut self, table: &str, left: &str, operator: &str, right: &str) -> &mut Self {
        self.join(Clause::LeftJoin, table, left, operator, right)
    }

    /// Append `RIGHT JOIN <table> ON <left> = <right>`
    pub fn right_join(&mut self, table: &str, left: &str, right: &str) -> &mut Self {
        self.join(Clause::RightJoin, table, left, "=", right)
    }

    pub fn right_join_op(&mut self, table: &str, left: &str, operator: &str, right: &str) -> &mut Self {
        self.join(Clause::RightJoin, table, left, operator, right)
    }

    /// Append `INNER JOIN <table> ON <left> = <right>`
    pub fn inner_join(&mut self, table: &str, left: &str, right: &str) -> &mut Self {
        self.join(Clause::InnerJoin, table, left, "=", right)
    }

    pub fn inner_join_op(&mut self, table: &str, left: &str, operator: &str, right: &str) -> &mut Self {
        self.join(Clause::InnerJoin, table, left, operator, right)
    }

    /// Add `<column> = :<column>` to WHERE, joined with `AND`
    ///
    /// The parameter name is derived from the column and disambiguated
    /// against every parameter already bound in this statement.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlwright::{QueryBuilder, SqliteDatabase};
    ///
    /// let db = SqliteDatabase::open_in_memory()?;
    /// let mut query = QueryBuilder::new(&db);
    /// query.where_("id", 1).where_("id", 2);
    ///
    /// assert_eq!(query.query(), "WHERE id = :id AND id = :id_0");
    /// # Ok::<(), sqlwright::Error>(())
    /// ```
    pub fn where_(&mut self, column: &str, value: impl Into<Value>) -> &mut Self {
        self.predicate(Clause::Where, Connector::And, column, "=", value.into())
    }

    pub fn where_op(&mut self, column: &str, operator: &str, value: impl Into<Value>) -> &mut Self {
        self.predicate(Clause::Where, Connector::And, column, operator, value.into())
    }

    /// Add a parenthesized group to WHERE, joined with `AND`
    ///
    /// The closure receives this same builder; conditions it adds land
    /// inside the parentheses.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlwright::{QueryBuilder, SqliteDatabase};
    ///
    /// let db = SqliteDatabase::open_in_memory()?;
    /// let mut query = QueryBuilder::new(&db);
    /// query
    ///     .where_group(|q| {
    ///         q.where_("a", 1).or_where("b", 2);
    ///     })
    ///     .where_("c", 3);
    ///
    /// assert_eq!(query.query(), "WHERE ( a = :a OR b = :b ) AND c = :c");
    /// # Ok::<(), sqlwright::Error>(())
    /// ```
    pub fn where_group<F: FnOnce(&mut Self)>(&mut self, f: F) -> &mut Self {
        self.group(Clause::Where, Connector::And, f)
    }

    pub fn where_condition(&mut self, condition: Condition<'_, 'db, M>) -> &mut Self {
        self.condition(Clause::Where, Connector::And, condition)
    }

    pub fn or_where(&mut self, column: &str, value: impl Into<Value>) -> &mut Self {
        self.predicate(Clause::Where, Connector::Or, column, "=", value.into())
    }

    pub fn or_where_op(&mut self, column: &str, operator: &str, value: impl Into<Value>) -> &mut Self {
        self.predicate(Clause::Where, Connector::Or, column, operator, value.into())
    }

    pub fn or_where_group<F: FnOnce(&mut Self)>(&mut self, f: F) -> &mut Self {
        self.group(Clause::Where, Connector::Or, f)
    }

    pub fn or_where_condition(&mut self, condition: Condition<'_, 'db, M>) -> &mut Self {
        self.condition(Clause::Where, Connector::Or, condition)
    }

    pub fn having(&mut self, column: &str, value: impl Into<Value>) -> &mut Self {
        self.predicate(Clause::Having, Connector::And, column, "=", value.into())
    }

    pub fn having_op(&mut self, column: &str, operator: &str, value: impl Into<Value>) -> &mut Self {
        self.predicate(Clause::Having, Connector::And, column, operator, value.into())
    }

    pub fn having_group<F: FnOnce(&mut Self)>(&mut self, f: F) -> &mut Self {
        self.group(Clause::Having, Connector::And, f)
    }

    pub fn having_condition(&mut self, condition: Condition<'_, 'db, M>) -> &mut Self {
        self.condition(Clause::Having, Connector::And, condition)
    }

    pub fn or_having(&mut self, column: &str, value: impl Into<Value>) -> &mut Self {
        self.predicate(Clause::Having, Connector::Or, column, "=", value.into())
    }

    pub fn or_having_op(&mut self, column: &str, operator: &str, value: impl Into<Value>) -> &mut Self {
        self.predicate(Clause::Having, Connector::Or, column, operator, value.into())
    }

    pub fn or_having_group<F: FnOnce(&mut Self)>(&mut self, f: F) -> &mut Self {
        self.group(Clause::Having, Connector::Or, f)
    }

    pub fn or_having_condition(&mut self, condition: Condition<'_, 'db, M>) -> &mut Self {
        self.condition(Clause::Having, Connector::Or, condition)
    }

    /// `ORDER BY <column> <direction>`; later calls append `, <column> <direction>`
    pub fn order_by(&mut self, column: &str, direction: Direction) -> &mut Self {
        if self.buffer.is_empty(Clause::OrderBy) {
            self.buffer
                .set(Clause::OrderBy, &format!("ORDER BY {column} {direction}"));
        } else {
            self.buffer
                .extend(Clause::OrderBy, &format!(", {column} {direction}"));
        }
        self
    }

    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.limit_offset(limit, 0)
    }

    /// `LIMIT <limit>`, plus ` OFFSET <offset>` when the offset is non-zero
    pub fn limit_offset(&mut self, limit: u64, offset: u64) -> &mut Self {
        let text = if offset != 0 {
            format!("LIMIT {limit} OFFSET {offset}")
        } else {
            format!("LIMIT {limit}")
        };
        self.buffer.set(Clause::Limit, &text);
        self
    }

    pub fn group_by<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let columns = join_columns(columns);
        self.buffer.set(Clause::GroupBy, &format!("GROUP BY {columns}"));
        self
    }

    /// `INSERT INTO <table> (<columns>) VALUES (<markers>)` in caller order
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlwright::{QueryBuilder, SqliteDatabase};
    ///
    /// let db = SqliteDatabase::open_in_memory()?;
    /// let mut query = QueryBuilder::new(&db);
    /// query.insert("users", [("name", "John"), ("email", "j@x.com")]);
    ///
    /// assert_eq!(
    ///     query.query(),
    ///     "INSERT INTO users (name, email) VALUES (:name, :email)"
    /// );
    /// # Ok::<(), sqlwright::Error>(())
    /// ```
    pub fn insert<I, K, V>(&mut self, table: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut columns = Vec::new();
        let mut markers = Vec::new();
        for (column, value) in values {
            let column = column.as_ref();
            let key = self.buffer.bind(&param_key(column), value.into());
            columns.push(column.to_string());
            markers.push(marked(&key));
        }
        self.buffer.set(
            Clause::Insert,
            &format!(
                "INSERT INTO {table} ({}) VALUES ({})",
                columns.join(", "),
                markers.join(", ")
            ),
        );
        self
    }

    /// `UPDATE <table> SET <column> = <marker>, ...` in caller order
    pub fn update<I, K, V>(&mut self, table: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut assignments = Vec::new();
        for (column, value) in values {
            let column = column.as_ref();
            let key = self.buffer.bind(&param_key(column), value.into());
            assignments.push(format!("{column} = {}", marked(&key)));
        }
        self.buffer.set(
            Clause::Update,
            &format!("UPDATE {table} SET {}", assignments.join(", ")),
        );
        self
    }

    pub fn delete(&mut self) -> &mut Self {
        self.buffer.set(Clause::Delete, "DELETE");
        self
    }

    /// Rendered statement text; empty when nothing has been built
    pub fn query(&self) -> String {
        self.buffer.render()
    }

    pub fn params(&self) -> &Params {
        self.buffer.params()
    }

    /// Rendered statement and a copy of its parameters
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoStatementToExecute`] if the buffer is empty.
    pub fn statement(&self) -> Result<Statement> {
        Ok(Statement::new(self.checked_sql()?, self.buffer.params().clone()))
    }

    /// Clear every clause and parameter
    pub fn reset(&mut self) -> &mut Self {
        self.buffer.reset();
        self
    }

    /// Number of rows the statement yields; resets the buffer on success
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoStatementToExecute`] for an empty buffer, or the
    /// database error unchanged. The buffer is kept on failure.
    pub fn count(&mut self) -> Result<usize> {
        let sql = self.checked_sql()?;
        let count = self.db.row_count(&sql, self.buffer.params())?;
        self.buffer.reset();
        Ok(count)
    }

    /// `count() > 0`, so the buffer is reset on success as well
    pub fn exists(&mut self) -> Result<bool> {
        Ok(self.count()? > 0)
    }

    /// Execute the pending insert, update or delete
    ///
    /// Precedence follows rendering: insert, then update, then delete.
    ///
    /// # Returns
    ///
    /// `Ok(true)` once the mutating statement ran, `Ok(false)` when the
    /// buffer held only select-shape clauses. The buffer is reset in both cases.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoStatementToExecute`] for an empty buffer, or the
    /// database error unchanged. The buffer is kept on failure.
    pub fn save(&mut self) -> Result<bool> {
        let sql = self.checked_sql()?;
        if self.buffer.shape() == StatementShape::Select {
            self.buffer.reset();
            return Ok(false);
        }
        self.db.execute(&sql, self.buffer.params())?;
        self.buffer.reset();
        Ok(true)
    }

    /// Row id generated by the most recent insert on this database
    pub fn last_insert_id(&self) -> Result<i64> {
        self.db.last_insert_id()
    }

    fn checked_sql(&self) -> Result<String> {
        let sql = self.buffer.render();
        if sql.is_empty() {
            return Err(Error::NoStatementToExecute);
        }
        Ok(sql)
    }

    fn join(&mut self, clause: Clause, table: &str, left: &str, operator: &str, right: &str) -> &mut Self {
        let kind = match clause {
            Clause::LeftJoin => "LEFT",
            Clause::RightJoin => "RIGHT",
            _ => "INNER",
        };
        self.buffer.push(
            clause,
            &format!("{kind} JOIN {table} ON {left} {operator} {right}"),
        );
        self
    }

    /// Seed the slot keyword or place the connector.
    ///
    /// No connector is emitted as the first token of the clause or right
    /// after an opening parenthesis.
    fn connect(&mut self, slot: Clause, connector: Connector) {
        if self.buffer.is_empty(slot) {
            let keyword = if slot == Clause::Having { "HAVING" } else { "WHERE" };
            self.buffer.set(slot, keyword);
        } else if !self.buffer.ends_with_group_open(slot) {
            self.buffer.push(slot, connector.as_str());
        }
    }

    fn predicate(
        &mut self,
        slot: Clause,
        connector: Connector,
        column: &str,
        operator: &str,
        value: Value,
    ) -> &mut Self {
        self.connect(slot, connector);
        let key = self.buffer.bind(&param_key(column), value);
        self.buffer
            .push(slot, &format!("{column} {operator} {}", marked(&key)));
        self
    }

    fn group<F: FnOnce(&mut Self)>(&mut self, slot: Clause, connector: Connector, f: F) -> &mut Self {
        self.connect(slot, connector);
        self.buffer.push(slot, "(");
        f(self);
        self.buffer.push(slot, ")");
        self
    }

    fn condition(&mut self, slot: Clause, connector: Connector, condition: Condition<'_, 'db, M>) -> &mut Self {
        match condition {
            Condition::ColumnEquals { column, value } => {
                self.predicate(slot, connector, &column, "=", value)
            }
            Condition::ColumnOp {
                column,
                operator,
                value,
            } => self.predicate(slot, connector, &column, &operator, value),
            Condition::Group(f) => self.group(slot, connector, f),
        }
    }
}

impl<'db, M: FromRow> QueryBuilder<'db, M> {
    /// Execute the rendered select and hydrate every row; the buffer is kept
    pub fn get(&self) -> Result<Collection<M>> {
        let sql = self.checked_sql()?;
        select(self.db, &sql, self.buffer.params())
    }

    /// Execute only the select and from clauses, without parameters
    pub fn all(&self) -> Result<Collection<M>> {
        let sql = self
            .buffer
            .render_clauses(&[Clause::Select, Clause::From]);
        if sql.is_empty() {
            return Err(Error::NoStatementToExecute);
        }
        select(self.db, &sql, &Params::new())
    }

    /// First row of the statement with `LIMIT 1` applied for this call only
    pub fn first(&mut self) -> Result<Option<M>> {
        self.with_temporary(|q| {
            q.limit(1);
        })
        .map(Collection::into_first)
    }

    /// Highest primary key: `ORDER BY <pk> DESC LIMIT 1` for this call only
    pub fn last(&mut self) -> Result<Option<M>> {
        self.with_temporary(|q| {
            let primary_key = q.primary_key.clone();
            q.order_by(&primary_key, Direction::Desc).limit(1);
        })
        .map(|rows| rows.into_vec().pop())
    }

    /// Row whose primary key equals `id`, filtered for this call only
    pub fn find(&mut self, id: impl Into<Value>) -> Result<Option<M>> {
        let id = id.into();
        self.with_temporary(|q| {
            let primary_key = q.primary_key.clone();
            q.where_(&primary_key, id);
        })
        .map(Collection::into_first)
    }

    /// Run `get` with extra clauses, restoring the buffer afterwards
    fn with_temporary<F: FnOnce(&mut Self)>(&mut self, apply: F) -> Result<Collection<M>> {
        self.checked_sql()?;
        let snapshot = self.buffer.clone();
        apply(self);
        let result = self.get();
        self.buffer = snapshot;
        result
    }
}

fn join_columns<I, S>(columns: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    columns
        .into_iter()
        .map(|c| c.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::SqliteDatabase;
    use rstest::{fixture, rstest};

    #[fixture]
    fn db() -> SqliteDatabase {
        SqliteDatabase::open_in_memory().unwrap()
    }

    fn params(pairs: &[(&str, Value)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    #[derive(Debug, Clone, Copy)]
    enum Kind {
        Where,
        OrWhere,
        Having,
        OrHaving,
    }

    fn apply<'db>(q: &mut QueryBuilder<'db>, kind: Kind, condition: Condition<'_, 'db>) {
        match kind {
            Kind::Where => q.where_condition(condition),
            Kind::OrWhere => q.or_where_condition(condition),
            Kind::Having => q.having_condition(condition),
            Kind::OrHaving => q.or_having_condition(condition),
        };
    }

    #[rstest]
    fn test_select(db: SqliteDatabase) {
        let mut q = QueryBuilder::new(&db);
        assert_eq!(q.select(["*"]).query(), "SELECT *");
        assert_eq!(q.select(["id", "name"]).query(), "SELECT id, name");
    }

    #[rstest]
    fn test_select_twice_keeps_only_last_select(db: SqliteDatabase) {
        let mut q = QueryBuilder::new(&db);
        assert_eq!(q.select_all().select_all().query(), "SELECT *");
        assert_eq!(q.select(["id", "name"]).select(["id"]).query(), "SELECT id");
    }

    #[rstest]
    fn test_select_without_columns_is_star(db: SqliteDatabase) {
        let mut q = QueryBuilder::new(&db);
        assert_eq!(q.select(Vec::<String>::new()).query(), "SELECT *");
    }

    #[rstest]
    fn test_from_multiple_keeps_only_last_from(db: SqliteDatabase) {
        let mut q = QueryBuilder::new(&db);
        assert_eq!(q.from("users").query(), "FROM users");
        assert_eq!(q.from("users").from("roles").query(), "FROM roles");
    }

    #[rstest]
    #[case::left(Clause::LeftJoin, "LEFT")]
    #[case::right(Clause::RightJoin, "RIGHT")]
    #[case::inner(Clause::InnerJoin, "INNER")]
    fn test_join_appends(db: SqliteDatabase, #[case] clause: Clause, #[case] keyword: &str) {
        fn join(q: &mut QueryBuilder<'_>, clause: Clause, table: &str, left: &str, right: &str) {
            match clause {
                Clause::LeftJoin => q.left_join(table, left, right),
                Clause::RightJoin => q.right_join(table, left, right),
                _ => q.inner_join(table, left, right),
            };
        }

        let mut q = QueryBuilder::new(&db);
        join(&mut q, clause, "roles", "roles.id", "users.role_id");
        assert_eq!(
            q.query(),
            format!("{keyword} JOIN roles ON roles.id = users.role_id")
        );

        join(&mut q, clause, "permissions", "permissions.id", "users.permission_id");
        assert_eq!(
            q.query(),
            format!(
                "{keyword} JOIN roles ON roles.id = users.role_id \
                 {keyword} JOIN permissions ON permissions.id = users.permission_id"
            )
        );
    }

    #[rstest]
    fn test_join_with_operator(db: SqliteDatabase) {
        let mut q = QueryBuilder::new(&db);
        q.left_join_op("roles", "roles.level", ">=", "users.level");
        assert_eq!(q.query(), "LEFT JOIN roles ON roles.level >= users.level");
    }

    #[rstest]
    #[case::where_(Kind::Where, "WHERE")]
    #[case::or_where(Kind::OrWhere, "WHERE")]
    #[case::having(Kind::Having, "HAVING")]
    #[case::or_having(Kind::OrHaving, "HAVING")]
    fn test_condition(db: SqliteDatabase, #[case] kind: Kind, #[case] keyword: &str) {
        let mut q = QueryBuilder::new(&db);
        apply(&mut q, kind, Condition::eq("id", 1));
        assert_eq!(q.query(), format!("{keyword} id = :id"));
        assert_eq!(q.params(), &params(&[(":id", Value::Int(1))]));
    }

    #[rstest]
    #[case::where_(Kind::Where, "WHERE")]
    #[case::or_where(Kind::OrWhere, "WHERE")]
    #[case::having(Kind::Having, "HAVING")]
    #[case::or_having(Kind::OrHaving, "HAVING")]
    fn test_condition_with_operator(db: SqliteDatabase, #[case] kind: Kind, #[case] keyword: &str) {
        let mut q = QueryBuilder::new(&db);
        apply(&mut q, kind, Condition::op("id", ">", 5));
        assert_eq!(q.query(), format!("{keyword} id > :id"));
        assert_eq!(q.params(), &params(&[(":id", Value::Int(5))]));
    }

    #[rstest]
    #[case::where_(Kind::Where, "WHERE", "AND")]
    #[case::or_where(Kind::OrWhere, "WHERE", "OR")]
    #[case::having(Kind::Having, "HAVING", "AND")]
    #[case::or_having(Kind::OrHaving, "HAVING", "OR")]
    fn test_condition_multiple(
        db: SqliteDatabase,
        #[case] kind: Kind,
        #[case] keyword: &str,
        #[case] connector: &str,
    ) {
        let mut q = QueryBuilder::new(&db);
        apply(&mut q, kind, Condition::eq("id", 1));
        apply(&mut q, kind, Condition::op("name", "LIKE", "%John%"));
        assert_eq!(
            q.query(),
            format!("{keyword} id = :id {connector} name LIKE :name")
        );
        assert_eq!(
            q.params(),
            &params(&[(":id", Value::Int(1)), (":name", text("%John%"))])
        );
    }

    #[rstest]
    #[case::where_(Kind::Where, "WHERE", "AND")]
    #[case::or_where(Kind::OrWhere, "WHERE", "OR")]
    #[case::having(Kind::Having, "HAVING", "AND")]
    #[case::or_having(Kind::OrHaving, "HAVING", "OR")]
    fn test_condition_with_group(
        db: SqliteDatabase,
        #[case] kind: Kind,
        #[case] keyword: &str,
        #[case] connector: &str,
    ) {
        let mut q = QueryBuilder::new(&db);
        apply(
            &mut q,
            kind,
            Condition::group(move |q| {
                apply(q, kind, Condition::op("name", "LIKE", "%John%"));
                apply(q, kind, Condition::op("name", "LIKE", "%Doe%"));
            }),
        );
        assert_eq!(
            q.query(),
            format!("{keyword} ( name LIKE :name {connector} name LIKE :name_0 )")
        );
        assert_eq!(
            q.params(),
            &params(&[(":name", text("%John%")), (":name_0", text("%Doe%"))])
        );
    }

    #[rstest]
    #[case::where_(Kind::Where, "WHERE", "AND")]
    #[case::or_where(Kind::OrWhere, "WHERE", "OR")]
    #[case::having(Kind::Having, "HAVING", "AND")]
    #[case::or_having(Kind::OrHaving, "HAVING", "OR")]
    fn test_condition_with_nested_group(
        db: SqliteDatabase,
        #[case] kind: Kind,
        #[case] keyword: &str,
        #[case] connector: &str,
    ) {
        let mut q = QueryBuilder::new(&db);
        apply(
            &mut q,
            kind,
            Condition::group(move |q| {
                apply(
                    q,
                    kind,
                    Condition::group(move |q| {
                        apply(q, kind, Condition::op("name", "LIKE", "%John%"));
                    }),
                );
                apply(q, kind, Condition::op("name", "LIKE", "%Doe%"));
            }),
        );
        apply(&mut q, kind, Condition::eq("id", 1));

        assert_eq!(
            q.query(),
            format!(
                "{keyword} ( ( name LIKE :name ) {connector} name LIKE :name_0 ) {connector} id = :id"
            )
        );
        let keys: Vec<&str> = q.params().keys().map(String::as_str).collect();
        assert_eq!(keys, vec![":name", ":name_0", ":id"]);
    }

    #[rstest]
    fn test_where_or_where_having(db: SqliteDatabase) {
        let mut q = QueryBuilder::new(&db);
        q.where_op("name", "LIKE", "%John%")
            .or_where_op("name", "LIKE", "%Doe%")
            .where_op("id", ">", 5)
            .having_op("name", "LIKE", "%John%")
            .or_having_op("name", "LIKE", "%Doe%");

        assert_eq!(
            q.query(),
            "WHERE name LIKE :name OR name LIKE :name_0 AND id > :id \
             HAVING name LIKE :name_1 OR name LIKE :name_2"
        );
        let keys: Vec<&str> = q.params().keys().map(String::as_str).collect();
        assert_eq!(keys, vec![":name", ":name_0", ":id", ":name_1", ":name_2"]);
    }

    #[rstest]
    fn test_group_helpers_match_condition_form(db: SqliteDatabase) {
        let mut q = QueryBuilder::new(&db);
        q.where_group(|q| {
            q.where_("a", 1).or_where("b", 2);
        })
        .where_("c", 3);
        assert_eq!(q.query(), "WHERE ( a = :a OR b = :b ) AND c = :c");

        let mut q = QueryBuilder::new(&db);
        q.where_("x", 0).or_where_group(|q| {
            q.where_("a", 1).where_("b", 2);
        });
        assert_eq!(q.query(), "WHERE x = :x OR ( a = :a AND b = :b )");
    }

    #[rstest]
    fn test_qualified_column_binds_sanitized_key(db: SqliteDatabase) {
        let mut q = QueryBuilder::new(&db);
        q.where_("users.id", 1);
        assert_eq!(q.query(), "WHERE users.id = :users_id");
        assert!(q.params().contains_key(":users_id"));
    }

    #[rstest]
    fn test_order_by(db: SqliteDatabase) {
        let mut q = QueryBuilder::new(&db);
        assert_eq!(q.order_by("id", Direction::Desc).query(), "ORDER BY id DESC");
        assert_eq!(
            q.order_by("name", Direction::default()).query(),
            "ORDER BY id DESC, name ASC"
        );
    }

    #[rstest]
    #[case(5, 0, "LIMIT 5")]
    #[case(5, 5, "LIMIT 5 OFFSET 5")]
    fn test_limit(db: SqliteDatabase, #[case] limit: u64, #[case] offset: u64, #[case] expected: &str) {
        let mut q = QueryBuilder::new(&db);
        assert_eq!(q.limit_offset(limit, offset).query(), expected);
    }

    #[rstest]
    fn test_limit_multiple_keeps_only_last_limit(db: SqliteDatabase) {
        let mut q = QueryBuilder::new(&db);
        assert_eq!(q.limit_offset(5, 5).limit(10).query(), "LIMIT 10");
    }

    #[rstest]
    fn test_group_by(db: SqliteDatabase) {
        let mut q = QueryBuilder::new(&db);
        assert_eq!(q.group_by(["id"]).query(), "GROUP BY id");
        assert_eq!(q.group_by(["id", "name"]).query(), "GROUP BY id, name");
        assert_eq!(q.group_by(["id"]).group_by(["name"]).query(), "GROUP BY name");
    }

    #[rstest]
    fn test_insert(db: SqliteDatabase) {
        let mut q = QueryBuilder::new(&db);
        q.insert("users", [("name", "John"), ("email", "john@gmail.com")]);
        assert_eq!(
            q.query(),
            "INSERT INTO users (name, email) VALUES (:name, :email)"
        );
        let keys: Vec<&str> = q.params().keys().map(String::as_str).collect();
        assert_eq!(keys, vec![":name", ":email"]);
        assert_eq!(q.params()[":email"], text("john@gmail.com"));
    }

    #[rstest]
    fn test_update(db: SqliteDatabase) {
        let mut q = QueryBuilder::new(&db);
        q.update("users", [("name", "John"), ("email", "john@gmail.com")]);
        assert_eq!(q.query(), "UPDATE users SET name = :name, email = :email");
        assert_eq!(
            q.params(),
            &params(&[(":name", text("John")), (":email", text("john@gmail.com"))])
        );
    }

    #[rstest]
    fn test_delete(db: SqliteDatabase) {
        let mut q = QueryBuilder::new(&db);
        assert_eq!(q.delete().from("users").query(), "DELETE FROM users");
    }

    #[rstest]
    fn test_full_query_select(db: SqliteDatabase) {
        let mut q = QueryBuilder::new(&db);
        q.select(["*"])
            .from("users")
            .left_join("roles", "role_id", "roles.id")
            .right_join("tests", "user_id", "users.id")
            .inner_join("permissions", "permission_id", "permissions.id")
            .where_("created_at", "2021-01-01")
            .order_by("id", Direction::Desc)
            .limit_offset(5, 5)
            .group_by(["id", "name"])
            .having_op("name", "LIKE", "%John%");

        assert_eq!(
            q.query(),
            "SELECT * FROM users \
             LEFT JOIN roles ON role_id = roles.id \
             RIGHT JOIN tests ON user_id = users.id \
             INNER JOIN permissions ON permission_id = permissions.id \
             WHERE created_at = :created_at \
             GROUP BY id, name \
             HAVING name LIKE :name \
             ORDER BY id DESC \
             LIMIT 5 OFFSET 5"
        );
        assert_eq!(
            q.params(),
            &params(&[(":created_at", text("2021-01-01")), (":name", text("%John%"))])
        );
    }

    #[rstest]
    fn test_full_query_update(db: SqliteDatabase) {
        let mut q = QueryBuilder::new(&db);
        q.update("users", [("name", "John"), ("email", "john@gmail.com")])
            .where_("id", 1);
        assert_eq!(
            q.query(),
            "UPDATE users SET name = :name, email = :email WHERE id = :id"
        );
        let keys: Vec<&str> = q.params().keys().map(String::as_str).collect();
        assert_eq!(keys, vec![":name", ":email", ":id"]);
    }

    #[rstest]
    fn test_full_query_delete(db: SqliteDatabase) {
        let mut q = QueryBuilder::new(&db);
        q.delete().from("users").where_("id", 1);
        assert_eq!(q.query(), "DELETE FROM users WHERE id = :id");
        assert_eq!(q.params(), &params(&[(":id", Value::Int(1))]));
    }

    #[rstest]
    fn test_update_then_where_on_same_column_is_uniquified(db: SqliteDatabase) {
        let mut q = QueryBuilder::new(&db);
        q.update("users", [("name", "Jane")]).where_("name", "John");
        assert_eq!(q.query(), "UPDATE users SET name = :name WHERE name = :name_0");
        assert_eq!(q.params()[":name_0"], text("John"));
    }

    #[rstest]
    fn test_repeated_key_params(db: SqliteDatabase) {
        let mut q = QueryBuilder::new(&db);
        q.where_("id", 1).where_("id", 2);
        assert_eq!(
            q.params(),
            &params(&[(":id", Value::Int(1)), (":id_0", Value::Int(2))])
        );
    }

    #[rstest]
    fn test_getters_are_idempotent(db: SqliteDatabase) {
        let mut q = QueryBuilder::new(&db);
        q.select(["*"]).from("users").where_("id", 1);
        assert_eq!(q.query(), q.query());
        assert_eq!(q.params().clone(), q.params().clone());
        assert_eq!(q.query(), "SELECT * FROM users WHERE id = :id");
    }

    #[rstest]
    fn test_statement_on_empty_buffer(db: SqliteDatabase) {
        let q = QueryBuilder::new(&db);
        assert!(matches!(q.statement(), Err(Error::NoStatementToExecute)));
        assert_eq!(q.query(), "");
    }

    #[rstest]
    fn test_statement_carries_params(db: SqliteDatabase) {
        let mut q = QueryBuilder::new(&db);
        q.select(["id"]).from("users").where_("id", 7);
        let statement = q.statement().unwrap();
        assert_eq!(statement.sql, "SELECT id FROM users WHERE id = :id");
        assert_eq!(statement.params[":id"], Value::Int(7));
    }

    #[rstest]
    fn test_reset_and_into_model(db: SqliteDatabase) {
        let mut q = QueryBuilder::new(&db);
        q.set_primary_key("uuid").select(["*"]).from("users");
        let mut q = q.into_model::<Row>();
        assert_eq!(q.primary_key(), "uuid");
        assert_eq!(q.query(), "SELECT * FROM users");
        q.reset();
        assert_eq!(q.query(), "");
        assert!(q.params().is_empty());
    }
}
