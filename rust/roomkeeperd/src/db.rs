use crate::store::StateBlob;
use anyhow::Context;
use rusqlite::{Connection, OptionalExtension};
use serde::Serialize;
use std::path::Path;
use uuid::Uuid;

pub const DB_FILE: &str = "roomkeeper.sqlite3";
const STATE_KEY: &str = "state";

pub fn open_db(workspace: &Path) -> anyhow::Result<Connection> {
    std::fs::create_dir_all(workspace)?;
    let db_path = workspace.join(DB_FILE);
    let conn = Connection::open(db_path)?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv(
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS snapshots(
            id TEXT PRIMARY KEY,
            seq INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            state TEXT NOT NULL
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_snapshots_seq ON snapshots(seq)",
        [],
    )?;

    Ok(conn)
}

pub fn kv_get_json(conn: &Connection, key: &str) -> anyhow::Result<Option<serde_json::Value>> {
    let raw: Option<String> = conn
        .query_row("SELECT value FROM kv WHERE key = ?", [key], |r| r.get(0))
        .optional()?;
    match raw {
        Some(text) => Ok(Some(
            serde_json::from_str(&text).with_context(|| format!("kv entry {} is invalid JSON", key))?,
        )),
        None => Ok(None),
    }
}

pub fn kv_set_json(conn: &Connection, key: &str, value: &serde_json::Value) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO kv(key, value, updated_at)
         VALUES(?, ?, ?)
         ON CONFLICT(key) DO UPDATE SET
           value = excluded.value,
           updated_at = excluded.updated_at",
        (key, value.to_string(), chrono::Utc::now().to_rfc3339()),
    )?;
    Ok(())
}

pub fn state_load(conn: &Connection) -> anyhow::Result<Option<StateBlob>> {
    let Some(value) = kv_get_json(conn, STATE_KEY)? else {
        return Ok(None);
    };
    let blob = serde_json::from_value(value).context("stored state has an unexpected shape")?;
    Ok(Some(blob))
}

pub fn state_save(conn: &Connection, blob: &StateBlob) -> anyhow::Result<()> {
    let value = serde_json::to_value(blob).context("failed to serialize state")?;
    kv_set_json(conn, STATE_KEY, &value)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMeta {
    pub id: String,
    pub created_at: String,
    pub seat_count: usize,
    pub table_count: usize,
}

/// Stores a snapshot and drops the oldest ones beyond `limit`.
pub fn snapshot_save(conn: &Connection, blob: &StateBlob, limit: usize) -> anyhow::Result<SnapshotMeta> {
    let id = Uuid::new_v4().to_string();
    let created_at = chrono::Utc::now().to_rfc3339();
    let text = serde_json::to_string(blob).context("failed to serialize snapshot")?;
    let next_seq: i64 = conn.query_row(
        "SELECT COALESCE(MAX(seq), 0) + 1 FROM snapshots",
        [],
        |r| r.get(0),
    )?;
    conn.execute(
        "INSERT INTO snapshots(id, seq, created_at, state) VALUES(?, ?, ?, ?)",
        (&id, next_seq, &created_at, &text),
    )?;
    conn.execute(
        "DELETE FROM snapshots WHERE seq <= ?",
        [next_seq - limit.max(1) as i64],
    )?;
    Ok(SnapshotMeta {
        id,
        created_at,
        seat_count: blob.seats.len(),
        table_count: blob.tables.len(),
    })
}

/// Newest first.
pub fn snapshot_list(conn: &Connection) -> anyhow::Result<Vec<SnapshotMeta>> {
    let mut stmt = conn.prepare("SELECT id, created_at, state FROM snapshots ORDER BY seq DESC")?;
    let rows = stmt
        .query_map([], |r| {
            Ok((
                r.get::<_, String>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, String>(2)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;
    let mut out = Vec::with_capacity(rows.len());
    for (id, created_at, text) in rows {
        let blob: StateBlob = serde_json::from_str(&text)
            .with_context(|| format!("snapshot {} is invalid JSON", id))?;
        out.push(SnapshotMeta {
            id,
            created_at,
            seat_count: blob.seats.len(),
            table_count: blob.tables.len(),
        });
    }
    Ok(out)
}

pub fn snapshot_get(conn: &Connection, id: &str) -> anyhow::Result<Option<StateBlob>> {
    let text: Option<String> = conn
        .query_row("SELECT state FROM snapshots WHERE id = ?", [id], |r| r.get(0))
        .optional()?;
    match text {
        Some(t) => Ok(Some(
            serde_json::from_str(&t).with_context(|| format!("snapshot {} is invalid JSON", id))?,
        )),
        None => Ok(None),
    }
}
