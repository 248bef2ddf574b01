//! In-memory SQLite statistics index for parcel vegetation data.
//!
//! The statistics table is a CSV export with one row per parcel and date:
//! `kmlId,date,mean,min,max`. It is loaded once at startup and only read
//! afterwards.
//!
//! # Architecture
//!
//! - `Rc<RefCell<Connection>>` wrapper for interior mutability in single-threaded WASM
//! - In-memory SQLite via `rusqlite`
//! - Typed lookups returning serializable structs
//!
//! # Usage
//!
//! ```rust
//! use pv_db::Database;
//!
//! let db = Database::new().unwrap();
//! db.load_statistics("kmlId,date,mean,min,max\n42,01-06-2024,0.61,0.20,0.83\n").unwrap();
//!
//! let stats = db.lookup("42", "01-06-2024").unwrap().unwrap();
//! assert!((stats.mean - 0.61).abs() < 1e-9);
//! ```

pub mod schema;
mod loader;
mod queries;
pub mod models;

use rusqlite::Connection;
use std::cell::RefCell;
use std::rc::Rc;

/// In-memory SQLite database holding the statistics index.
///
/// Cheaply cloneable (via `Rc`); clones share one connection.
#[derive(Clone)]
pub struct Database {
    conn: Rc<RefCell<Connection>>,
}

impl Database {
    /// Create a new in-memory database with the schema applied.
    pub fn new() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(schema::create_schema())?;
        Ok(Self {
            conn: Rc::new(RefCell::new(conn)),
        })
    }
}

impl PartialEq for Database {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.conn, &other.conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_creates_successfully() {
        let db = Database::new();
        assert!(db.is_ok(), "Database should create without errors");
    }

    #[test]
    fn database_is_cloneable() {
        let db = Database::new().unwrap();
        let db2 = db.clone();
        db.load_statistics("kmlId,date,mean,min,max\n42,01-06-2024,0.5,0.1,0.9\n")
            .unwrap();
        assert_eq!(db2.count().unwrap(), 1, "Clone should see same data via shared Rc");
        assert!(db == db2);
    }

    #[test]
    fn database_starts_empty() {
        let db = Database::new().unwrap();
        assert_eq!(db.count().unwrap(), 0);
        assert!(db.lookup("42", "01-06-2024").unwrap().is_none());
    }
}
