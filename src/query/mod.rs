//! Statement construction and execution.
//!
//! This module provides the [`QueryBuilder`] API for assembling parameterized
//! SQL from clause fragments and running it against a [`Database`](crate::Database).
//!
//! # Architecture
//!
//! - **Clause**: one fragment per clause slot and the rendering rules (`ClauseBuffer`)
//! - **Params**: collision-free bind-parameter naming
//! - **Condition**: the three argument forms of `where`/`having`
//! - **Builder**: the fluent façade and the execution methods
//! - **Statement**: rendered SQL plus parameters
//!
//! # Examples
//!
//! ```
//! use sqlwright::{Direction, QueryBuilder, SqliteDatabase};
//!
//! let db = SqliteDatabase::open_in_memory()?;
//! let mut query = QueryBuilder::new(&db);
//! query
//!     .select(["id", "name"])
//!     .from("users")
//!     .where_op("name", "LIKE", "%John%")
//!     .order_by("id", Direction::Desc)
//!     .limit(10);
//!
//! assert_eq!(
//!     query.query(),
//!     "SELECT id, name FROM users WHERE name LIKE :name ORDER BY id DESC LIMIT 10"
//! );
//! # Ok::<(), sqlwright::Error>(())
//! ```

// Clause slots and rendering
pub mod clause;
#[doc(inline)]
pub use clause::{Clause, ClauseBuffer, StatementShape};

// Parameter naming
pub mod params;
#[doc(inline)]
pub use params::{Params, PARAM_MARKER};

// Condition argument forms
pub mod condition;
#[doc(inline)]
pub use condition::{Condition, Connector, Direction};

// Fluent builder
pub mod builder;
#[doc(inline)]
pub use builder::{QueryBuilder, DEFAULT_PRIMARY_KEY};

// Rendered statement DTO
pub mod statement;
#[doc(inline)]
pub use statement::Statement;
