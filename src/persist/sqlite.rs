//! SQLite-backed append-only throw journal.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};

use crate::{
    core::game::DartMatch,
    record::{RECORD_FORMAT_VERSION, ThrowRecord, ThrowRecordEnvelope},
    types::ThrowSeq,
};

use super::{HistorySink, PersistResult};

/// SQLite implementation of [`crate::persist::HistorySink`].
pub struct SqliteHistorySink {
    conn: Connection,
}

impl SqliteHistorySink {
    /// Opens or creates a SQLite-backed journal at `path`.
    ///
    /// Enables WAL mode and sets `synchronous=NORMAL`.
    pub fn open(path: impl AsRef<Path>) -> PersistResult<Self> {
        let conn = Connection::open(path)?;
        Self::init_connection(conn)
    }

    /// Opens an in-memory SQLite journal.
    pub fn open_in_memory() -> PersistResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(conn)
    }

    fn init_connection(conn: Connection) -> PersistResult<Self> {
        conn.execute_batch(include_str!("schema.sql"))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(Self { conn })
    }

    /// Re-drives a fresh match from the journal.
    ///
    /// `game` must be newly built from the same variant settings and roster
    /// the journal was recorded under; configuration storage stays outside
    /// this crate.
    pub fn replay_match(&self, mut game: DartMatch) -> PersistResult<DartMatch> {
        for record in self.load_records_after(0)? {
            game.apply_replayed_throw(record)?;
        }
        // Replay is not a new mutation; nothing should be re-journaled.
        let _ = game.drain_pending_records();
        Ok(game)
    }

    /// Loads records strictly after `seq`, in sequence order.
    pub fn load_records_after(&self, seq: ThrowSeq) -> PersistResult<Vec<ThrowRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT seq, ts_ms, player_id, payload FROM throws WHERE seq > ?1 ORDER BY seq ASC",
        )?;

        let rows = stmt.query_map(params![seq], |row| {
            let seq: i64 = row.get(0)?;
            let ts_ms: i64 = row.get(1)?;
            let payload: Vec<u8> = row.get(3)?;
            let mut record = decode_record_payload(&payload).map_err(|err| {
                rusqlite::Error::FromSqlConversionFailure(
                    payload.len(),
                    rusqlite::types::Type::Blob,
                    Box::new(std::io::Error::other(err)),
                )
            })?;
            record.seq = seq as ThrowSeq;
            record.ts_ms = ts_ms as u64;
            Ok(record)
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Returns the latest sequence persisted in the journal.
    pub fn latest_seq(&self) -> PersistResult<ThrowSeq> {
        let seq: Option<i64> = self
            .conn
            .query_row("SELECT MAX(seq) FROM throws", [], |row| row.get(0))
            .optional()?;
        Ok(seq.unwrap_or(0) as ThrowSeq)
    }
}

impl HistorySink for SqliteHistorySink {
    fn append_throws(&mut self, records: &[ThrowRecord]) -> PersistResult<ThrowSeq> {
        if records.is_empty() {
            return self.latest_seq();
        }

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO throws(seq, ts_ms, player_id, payload) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for record in records {
                let payload = serde_json::to_vec(&ThrowRecordEnvelope::new(*record))?;
                stmt.execute(params![
                    record.seq as i64,
                    record.ts_ms as i64,
                    record.player_id as i64,
                    payload,
                ])?;
            }
        }
        tx.commit()?;

        Ok(records.last().map(|r| r.seq).unwrap_or(0))
    }

    fn flush(&mut self) -> PersistResult<()> {
        self.conn.execute_batch("PRAGMA wal_checkpoint(PASSIVE);")?;
        Ok(())
    }
}

fn decode_record_payload(payload: &[u8]) -> Result<ThrowRecord, String> {
    let envelope = serde_json::from_slice::<ThrowRecordEnvelope>(payload)
        .map_err(|e| format!("throw payload decode failed: {e}"))?;
    if envelope.format_version != RECORD_FORMAT_VERSION {
        return Err(format!(
            "unsupported throw record format version: {}",
            envelope.format_version
        ));
    }
    Ok(envelope.record)
}
