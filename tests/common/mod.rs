//! Shared fixtures for integration tests

use sqlwright::{Database, SqliteDatabase};

/// Route `log` output to the test harness; safe to call from every test
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// In-memory database with a seeded `users` table (ids 1..=3)
pub fn users_db() -> SqliteDatabase {
    init_logging();
    let db = SqliteDatabase::open_in_memory().expect("Failed to open in-memory database");
    db.execute_batch(
        r#"
        CREATE TABLE users (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT,
            age INTEGER
        );
        INSERT INTO users (name, email, age) VALUES
            ('Alice', 'alice@example.com', 34),
            ('Bob', NULL, 17),
            ('Carol', 'carol@example.com', 52);
        "#,
    )
    .expect("Failed to seed users");
    db
}
