//! SQLite catalog database

use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;

use crate::error::Result;
use crate::storage::migrations;
use crate::versioning::StoreCounts;

/// A book to insert.
#[derive(Debug, Clone, Default)]
pub struct NewBook {
    pub main_title: String,
    pub sub_title: String,
    pub pub_date: Option<i64>,
    pub rating: String,
}

impl NewBook {
    pub fn titled(main_title: impl Into<String>) -> Self {
        Self {
            main_title: main_title.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookRecord {
    pub id: i64,
    pub main_title: String,
    pub sub_title: String,
    pub pub_date: Option<i64>,
    pub rating: String,
    pub author_full_name: String,
}

/// Handle to the catalog database file.
///
/// The handle is the caller's to manage around a rollback: call
/// [`Database::close`] first and [`Database::open`] again afterwards.
pub struct Database {
    conn: Connection,
    path: PathBuf,
    schema_version: u32,
}

impl Database {
    /// Open database at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        Self::configure_pragmas(&conn)?;
        let schema_version = migrations::run_migrations(&conn)?;

        Ok(Self {
            conn,
            path: path.to_path_buf(),
            schema_version,
        })
    }

    /// Get a reference to the connection
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current schema version after migrations.
    pub fn schema_version(&self) -> u32 {
        self.schema_version
    }

    /// Close the connection, surfacing any error from the final flush.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, err)| err)?;
        Ok(())
    }

    // The checkpointed file must hold the complete state on its own, so no
    // write-ahead log: every commit lands in the main database file.
    fn configure_pragmas(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "PRAGMA journal_mode = DELETE;
             PRAGMA synchronous = FULL;
             PRAGMA foreign_keys = ON;",
        )?;
        Ok(())
    }

    pub fn book_count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    pub fn author_count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM authors", [], |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Counts recorded in checkpoint messages.
    pub fn counts(&self) -> Result<StoreCounts> {
        Ok(StoreCounts::new(self.book_count()?, self.author_count()?))
    }

    /// Find an author by exact full name, or create one.
    pub fn find_or_create_author(&self, full_name: &str) -> Result<i64> {
        let existing = self
            .conn
            .query_row(
                "SELECT id FROM authors WHERE full_name = ?",
                [full_name],
                |row| row.get(0),
            )
            .optional()?;
        if let Some(id) = existing {
            return Ok(id);
        }

        self.conn.execute(
            "INSERT INTO authors (full_name, surname, created_at) VALUES (?, ?, ?)",
            params![full_name, extract_surname(full_name), Utc::now().to_rfc3339()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Insert a book, optionally linked to an author.
    pub fn add_book(&self, book: &NewBook, author_id: Option<i64>) -> Result<i64> {
        let author_name: String = match author_id {
            Some(id) => self
                .conn
                .query_row("SELECT full_name FROM authors WHERE id = ?", [id], |row| {
                    row.get(0)
                })?,
            None => String::new(),
        };

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO books (main_title, sub_title, pub_date, rating, author_full_name, date_added)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                book.main_title,
                book.sub_title,
                book.pub_date,
                book.rating,
                author_name,
                Utc::now().to_rfc3339(),
            ],
        )?;
        let book_id = tx.last_insert_rowid();
        if let Some(author_id) = author_id {
            tx.execute(
                "INSERT INTO book_authors (book_id, author_id) VALUES (?, ?)",
                params![book_id, author_id],
            )?;
        }
        tx.commit()?;
        Ok(book_id)
    }

    /// All books ordered by insertion.
    pub fn list_books(&self) -> Result<Vec<BookRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, main_title, sub_title, pub_date, rating, author_full_name
             FROM books ORDER BY id",
        )?;
        let books = stmt
            .query_map([], |row| {
                Ok(BookRecord {
                    id: row.get(0)?,
                    main_title: row.get(1)?,
                    sub_title: row.get(2)?,
                    pub_date: row.get(3)?,
                    rating: row.get(4)?,
                    author_full_name: row.get(5)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(books)
    }
}

/// Last whitespace-delimited word of a full name.
pub fn extract_surname(full_name: &str) -> String {
    full_name
        .split_whitespace()
        .last()
        .unwrap_or_default()
        .to_string()
}
