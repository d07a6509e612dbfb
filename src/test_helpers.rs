use crate::executor::{Database, SqliteDatabase};

/// Schema of the `tests` fixture table
pub const TESTS_SCHEMA: &str = "(id INTEGER PRIMARY KEY, name TEXT UNIQUE NOT NULL)";

pub fn create_temp_table(db: &dyn Database, name: &str, schema: &str) -> crate::Result<()> {
    db.execute_batch(&format!("CREATE TEMP TABLE IF NOT EXISTS {} {}", name, schema))
}

#[allow(dead_code)]
pub fn drop_temp_table(db: &dyn Database, name: &str) -> crate::Result<()> {
    db.execute_batch(&format!("DROP TABLE IF EXISTS {}", name))
}

/// In-memory database with `tests` holding test1, test2, test3 (ids 1..=3)
pub fn seeded_tests_db() -> SqliteDatabase {
    let db = SqliteDatabase::open_in_memory().unwrap();
    create_temp_table(&db, "tests", TESTS_SCHEMA).unwrap();
    db.execute_batch("INSERT INTO tests (name) VALUES ('test1'), ('test2'), ('test3')")
        .unwrap();
    db
}
