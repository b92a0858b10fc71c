use rusqlite::Connection;
use std::path::Path;

use crate::error::Result;

/// Name accepted in settings for a throwaway in-memory store.
pub const MEMORY_PATH: &str = ":memory:";

#[derive(Debug)]
pub struct DbConnection {
    conn: Connection,
}

impl DbConnection {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let conn = if path.as_os_str() == MEMORY_PATH {
            Connection::open_in_memory()?
        } else {
            Connection::open(path)?
        };
        let db = DbConnection { conn };
        db.initialize()?;
        tracing::info!(path = %path.display(), "opened movement database");
        Ok(db)
    }

    pub fn in_memory() -> Result<Self> {
        Self::new(MEMORY_PATH)
    }

    pub fn get_connection(&mut self) -> &mut Connection {
        &mut self.conn
    }

    pub fn into_inner(self) -> Connection {
        self.conn
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS movements (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                amount TEXT NOT NULL,
                description TEXT NOT NULL,
                date TEXT NOT NULL,
                type TEXT NOT NULL,
                category TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_movements_date ON movements(date)",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_movements_category ON movements(category)",
            [],
        )?;

        Ok(())
    }
}
