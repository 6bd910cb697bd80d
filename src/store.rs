//! Persistent button store backed by SQLite.
//!
//! The store is a single four-row table keyed by slot id. Callers read the
//! whole table and write records back with an upsert; nothing is ever
//! deleted. Both the terminal UI and the background listener open their own
//! connection and keep their own copy of the rows.

use log::info;
use rusqlite::{Connection, params};
use std::path::{Path, PathBuf};

use crate::error::{HornError, Result};
use crate::slots::{ButtonConfig, default_slots};

pub trait ButtonStore {
    /// Every stored record in id order; empty before first run.
    fn get_all(&self) -> Result<Vec<ButtonConfig>>;

    /// Insert records, replacing any with the same id.
    fn upsert(&self, configs: &[ButtonConfig]) -> Result<()>;
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| HornError::io(parent, e))?;
        }

        let conn = Connection::open(db_path)?;
        run_migrations(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;
        Ok(Self { conn })
    }
}

fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS button_config (
            id INTEGER PRIMARY KEY,
            text TEXT NOT NULL,
            sound_path TEXT NOT NULL,
            color INTEGER NOT NULL
        )",
        [],
    )?;
    Ok(())
}

impl ButtonStore for SqliteStore {
    fn get_all(&self) -> Result<Vec<ButtonConfig>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, text, sound_path, color FROM button_config ORDER BY id")?;

        let rows = stmt.query_map([], |row| {
            Ok(ButtonConfig {
                id: row.get::<_, i64>(0)? as usize,
                text: row.get(1)?,
                sound_path: PathBuf::from(row.get::<_, String>(2)?),
                color: row.get::<_, i64>(3)? as u32,
            })
        })?;

        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    fn upsert(&self, configs: &[ButtonConfig]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO button_config (id, text, sound_path, color)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(id) DO UPDATE SET
                    text = excluded.text,
                    sound_path = excluded.sound_path,
                    color = excluded.color",
            )?;
            for config in configs {
                stmt.execute(params![
                    config.id as i64,
                    config.text,
                    config.sound_path.to_string_lossy().into_owned(),
                    config.color as i64,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

/// Load the stored records, seeding the four defaults on first run.
pub fn load_or_seed<S: ButtonStore>(store: &S, bundled_dir: &Path) -> Result<Vec<ButtonConfig>> {
    let configs = store.get_all()?;
    if !configs.is_empty() {
        return Ok(configs);
    }

    let defaults = default_slots(bundled_dir);
    store.upsert(&defaults)?;
    info!("Seeded {} default buttons", defaults.len());
    Ok(defaults)
}
