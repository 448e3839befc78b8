//! # cafe-db
//!
//! libSQL-backed store for the coffee knowledge base.
//!
//! [`CafeDb`] owns the connection and runs the embedded migrations on open.
//! [`service::CafeService`] layers the registry, coffee type and binding
//! operations on top of it (one `impl CafeService` block per repo under
//! [`repos`]), runs every write through the core validators first, and keeps
//! the cached completeness report in step with mutations.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;

pub struct CafeDb {
    // Kept alive for the lifetime of `conn`.
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl CafeDb {
    /// Open (or create) a local database and bring its schema up to date.
    ///
    /// Pass `":memory:"` for a throwaway store.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the file cannot be opened or a migration fails.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let cafe_db = Self { db, conn };
        cafe_db.run_migrations().await?;
        tracing::debug!(path, "opened knowledge base");
        Ok(cafe_db)
    }

    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = CafeDb::open_local(":memory:").await.unwrap();

        let tables = [
            "characteristics",
            "characteristic_values",
            "coffee_types",
            "bindings",
            "binding_values",
        ];
        for table in &tables {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [*table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn foreign_keys_are_enforced() {
        let db = CafeDb::open_local(":memory:").await.unwrap();
        let mut rows = db.conn().query("PRAGMA foreign_keys", ()).await.unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<i64>(0).unwrap(), 1);
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let db = CafeDb::open_local(":memory:").await.unwrap();
        db.run_migrations().await.unwrap();
    }
}
