pub mod memory;
pub mod migrations;
pub mod sqlite;

use anyhow::Context;
use rusqlite::Connection;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Blob store the booking collection is persisted in. Mirrors the browser's
/// local storage: whole values under string keys, no transactions.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
    fn remove(&self, key: &str) -> anyhow::Result<()>;
}

pub fn init_db(path: &str) -> anyhow::Result<Connection> {
    let conn = Connection::open(path).context("failed to open database")?;

    conn.execute_batch("PRAGMA journal_mode=WAL;")
        .context("failed to set database pragmas")?;

    migrations::run_migrations(&conn)?;

    Ok(conn)
}
