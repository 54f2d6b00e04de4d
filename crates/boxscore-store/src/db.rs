// SQLite sink for per-game feature rows, scaler statistics and pipeline state.

use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use boxscore_core::{FeatureRow, ScalerStats};
use rusqlite::{params, Connection, OptionalExtension};

/// Timestamp format used in the `game` table. Sorts chronologically as text.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Row ids of the two scaler statistics.
const SCALER_MEAN_ID: i64 = 0;
const SCALER_STD_ID: i64 = 1;

/// A game row as read back from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredGame {
    pub game_id: String,
    pub timestamp: String,
    pub visitor_score: u32,
    pub home_score: u32,
    pub home_win: bool,
    pub features: Vec<f64>,
}

/// SQLite-backed storage for feature rows. Feature vectors are stored as JSON
/// arrays: a full layout is thousands of columns, beyond SQLite's column
/// limit.
pub struct FeatureStore {
    conn: Mutex<Connection>,
}

impl FeatureStore {
    /// Open (or create) the store at `path` and ensure all tables exist. Pass
    /// `":memory:"` for an ephemeral database.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS game (
                game_id    TEXT PRIMARY KEY,
                timestamp  TEXT NOT NULL,
                vis_score  INTEGER NOT NULL,
                home_score INTEGER NOT NULL,
                result     INTEGER NOT NULL,
                features   TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS scaler (
                id        INTEGER PRIMARY KEY,
                statistic TEXT NOT NULL,
                features  TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS pipeline_state (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_game_timestamp ON game(timestamp);
            ",
        )
        .context("failed to create database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Panics if the mutex is poisoned.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }

    /// Write a batch of game rows in one transaction. Re-running a season
    /// replaces its rows.
    pub fn insert_games(&self, rows: &[FeatureRow]) -> Result<usize> {
        let mut conn = self.conn();
        let tx = conn.transaction().context("failed to begin insert transaction")?;
        {
            let mut stmt = tx
                .prepare(
                    "INSERT OR REPLACE INTO game
                        (game_id, timestamp, vis_score, home_score, result, features)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                )
                .context("failed to prepare game insert")?;

            for row in rows {
                let features =
                    serde_json::to_string(&row.features).context("failed to serialize features")?;
                stmt.execute(params![
                    row.game_id.as_str(),
                    row.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                    row.visitor_score,
                    row.home_score,
                    row.winner.is_home(),
                    features,
                ])
                .with_context(|| format!("failed to insert game {}", row.game_id))?;
            }
        }
        tx.commit().context("failed to commit game batch")?;
        Ok(rows.len())
    }

    pub fn game_count(&self) -> Result<usize> {
        let conn = self.conn();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM game", [], |row| row.get(0))
            .context("failed to count games")?;
        Ok(count as usize)
    }

    pub fn load_game(&self, game_id: &str) -> Result<Option<StoredGame>> {
        let conn = self.conn();
        let row = conn
            .query_row(
                "SELECT game_id, timestamp, vis_score, home_score, result, features
                 FROM game WHERE game_id = ?1",
                params![game_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, u32>(2)?,
                        row.get::<_, u32>(3)?,
                        row.get::<_, bool>(4)?,
                        row.get::<_, String>(5)?,
                    ))
                },
            )
            .optional()
            .context("failed to query game")?;

        row.map(|(game_id, timestamp, visitor_score, home_score, home_win, json)| {
            let features: Vec<f64> =
                serde_json::from_str(&json).context("failed to deserialize features")?;
            Ok(StoredGame {
                game_id,
                timestamp,
                visitor_score,
                home_score,
                home_win,
                features,
            })
        })
        .transpose()
    }

    /// Game ids in chronological order.
    pub fn game_ids(&self) -> Result<Vec<String>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT game_id FROM game ORDER BY timestamp, game_id")
            .context("failed to prepare game_ids query")?;
        let ids = stmt
            .query_map([], |row| row.get(0))
            .context("failed to query game ids")?
            .collect::<rusqlite::Result<Vec<String>>>()
            .context("failed to read game id row")?;
        Ok(ids)
    }

    // ------------------------------------------------------------------
    // Scaler
    // ------------------------------------------------------------------

    /// Replace the stored mean (`mu`) and standard deviation (`std`) rows.
    pub fn save_scaler(&self, stats: &ScalerStats) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction().context("failed to begin scaler transaction")?;
        for (id, name, values) in [
            (SCALER_MEAN_ID, "mu", &stats.mean),
            (SCALER_STD_ID, "std", &stats.std),
        ] {
            let json = serde_json::to_string(values).context("failed to serialize scaler row")?;
            tx.execute(
                "INSERT OR REPLACE INTO scaler (id, statistic, features) VALUES (?1, ?2, ?3)",
                params![id, name, json],
            )
            .with_context(|| format!("failed to save scaler row {name}"))?;
        }
        tx.commit().context("failed to commit scaler")?;
        Ok(())
    }

    pub fn load_scaler(&self) -> Result<Option<ScalerStats>> {
        let load_row = |id: i64| -> Result<Option<Vec<f64>>> {
            let conn = self.conn();
            let json: Option<String> = conn
                .query_row(
                    "SELECT features FROM scaler WHERE id = ?1",
                    params![id],
                    |row| row.get(0),
                )
                .optional()
                .context("failed to query scaler row")?;
            json.map(|j| serde_json::from_str(&j).context("failed to deserialize scaler row"))
                .transpose()
        };

        match (load_row(SCALER_MEAN_ID)?, load_row(SCALER_STD_ID)?) {
            (Some(mean), Some(std)) => Ok(Some(ScalerStats { mean, std })),
            _ => Ok(None),
        }
    }

    // ------------------------------------------------------------------
    // Key-value state
    // ------------------------------------------------------------------

    pub fn save_state(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        let conn = self.conn();
        let json_str = serde_json::to_string(value).context("failed to serialize state value")?;
        conn.execute(
            "INSERT OR REPLACE INTO pipeline_state (key, value) VALUES (?1, ?2)",
            params![key, json_str],
        )
        .context("failed to save state")?;
        Ok(())
    }

    pub fn load_state(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let conn = self.conn();
        let json_str: Option<String> = conn
            .query_row(
                "SELECT value FROM pipeline_state WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .context("failed to query pipeline state")?;

        json_str
            .map(|s| serde_json::from_str(&s).context("failed to deserialize state value"))
            .transpose()
    }

    /// Drop every game, scaler and state row, for a from-scratch run.
    pub fn clear(&self) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction().context("failed to begin transaction")?;
        tx.execute("DELETE FROM game", [])
            .context("failed to delete games")?;
        tx.execute("DELETE FROM scaler", [])
            .context("failed to delete scaler rows")?;
        tx.execute("DELETE FROM pipeline_state", [])
            .context("failed to delete pipeline state")?;
        tx.commit().context("failed to commit clear")?;
        Ok(())
    }
}
