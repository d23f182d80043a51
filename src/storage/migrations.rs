//! Catalog schema migrations, tracked with `PRAGMA user_version`.

use rusqlite::Connection;

use crate::error::Result;

pub const SCHEMA_VERSION: u32 = 2;

const MIGRATIONS: &[&str] = &[
    // 1: authors and books
    "CREATE TABLE IF NOT EXISTS authors (
         id INTEGER PRIMARY KEY AUTOINCREMENT,
         full_name TEXT NOT NULL,
         surname TEXT NOT NULL DEFAULT '',
         created_at TEXT NOT NULL
     );
     CREATE TABLE IF NOT EXISTS books (
         id INTEGER PRIMARY KEY AUTOINCREMENT,
         main_title TEXT NOT NULL,
         sub_title TEXT NOT NULL DEFAULT '',
         pub_date INTEGER,
         rating TEXT NOT NULL DEFAULT '',
         author_full_name TEXT NOT NULL DEFAULT '',
         date_added TEXT NOT NULL
     );",
    // 2: many-to-many book authorship
    "CREATE TABLE IF NOT EXISTS book_authors (
         book_id INTEGER NOT NULL REFERENCES books(id) ON DELETE CASCADE,
         author_id INTEGER NOT NULL REFERENCES authors(id) ON DELETE CASCADE,
         PRIMARY KEY (book_id, author_id)
     );
     CREATE INDEX IF NOT EXISTS idx_books_main_title ON books(main_title);",
];

/// Apply pending migrations and return the resulting schema version.
pub fn run_migrations(conn: &Connection) -> Result<u32> {
    let current: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;

    for (idx, sql) in MIGRATIONS.iter().enumerate() {
        let version = u32::try_from(idx + 1).unwrap_or(u32::MAX);
        if version <= current {
            continue;
        }
        tracing::debug!(version, "applying catalog migration");
        conn.execute_batch(&format!(
            "BEGIN;\n{sql}\nPRAGMA user_version = {version};\nCOMMIT;"
        ))?;
    }

    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}
