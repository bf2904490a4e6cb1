/*
 * SPDX-FileCopyrightText: 2026 Campus Mail Systems Group
 *
 * SPDX-License-Identifier: MIT OR Apache-2.0
 */

//! Persistent store for sticky notices: a single `(uid, type, msgid, data)`
//! table, backed by SQLite via `rusqlite`.

use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StickyNotice {
    pub row_id: i64,
    pub uid: i64,
    pub notice_type: i64,
    pub msgid: i64,
    pub data: Option<Vec<u8>>,
}

/// A single-table sticky-notice store. `uid = 0` denotes a broadcast
/// notice, matched by every registered client regardless of its own uid.
pub struct StickyStore {
    conn: Connection,
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS sticky_notices (
    uid     INTEGER NOT NULL,
    type    INTEGER NOT NULL,
    msgid   INTEGER NOT NULL,
    data    BLOB
)";

impl StickyStore {
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute(SCHEMA, [])?;
        Ok(StickyStore { conn })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute(SCHEMA, [])?;
        Ok(StickyStore { conn })
    }

    pub fn insert(&self, uid: i64, notice_type: i64, msgid: i64, data: Option<&[u8]>) -> Result<i64, StoreError> {
        self.conn.execute(
            "INSERT INTO sticky_notices (uid, type, msgid, data) VALUES (?1, ?2, ?3, ?4)",
            params![uid, notice_type, msgid, data],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn list(&self) -> Result<Vec<StickyNotice>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT rowid, uid, type, msgid, data FROM sticky_notices ORDER BY rowid")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(StickyNotice {
                    row_id: row.get(0)?,
                    uid: row.get(1)?,
                    notice_type: row.get(2)?,
                    msgid: row.get(3)?,
                    data: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Deletes every row matching both `uid` and `notice_type`.
    pub fn clear_by(&self, uid: i64, notice_type: i64) -> Result<usize, StoreError> {
        let n = self.conn.execute(
            "DELETE FROM sticky_notices WHERE uid = ?1 AND type = ?2",
            params![uid, notice_type],
        )?;
        Ok(n)
    }

    pub fn flush(&self) -> Result<usize, StoreError> {
        Ok(self.conn.execute("DELETE FROM sticky_notices", [])?)
    }

    pub fn count(&self) -> Result<i64, StoreError> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM sticky_notices", [], |r| r.get(0))
            .optional()?
            .unwrap_or(0))
    }

    pub fn close(self) {
        drop(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_list_returns_inserted_row() {
        let store = StickyStore::open_in_memory().unwrap();
        store.insert(7, 1, 100, Some(b"hi")).unwrap();
        let notices = store.list().unwrap();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].uid, 7);
        assert_eq!(notices[0].data.as_deref(), Some(&b"hi"[..]));
    }

    #[test]
    fn clear_by_removes_matching_rows_only() {
        let store = StickyStore::open_in_memory().unwrap();
        store.insert(7, 1, 100, None).unwrap();
        store.insert(7, 2, 101, None).unwrap();
        store.insert(8, 1, 102, None).unwrap();
        store.clear_by(7, 1).unwrap();
        let remaining = store.list().unwrap();
        assert_eq!(remaining.len(), 2);
        assert!(remaining.iter().all(|n| !(n.uid == 7 && n.notice_type == 1)));
    }

    #[test]
    fn flush_empties_the_table() {
        let store = StickyStore::open_in_memory().unwrap();
        store.insert(0, 2, 1, None).unwrap();
        store.insert(0, 2, 2, None).unwrap();
        store.flush().unwrap();
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn broadcast_notices_use_uid_zero() {
        let store = StickyStore::open_in_memory().unwrap();
        store.insert(0, 2, 200, Some(b"all")).unwrap();
        let notices = store.list().unwrap();
        assert_eq!(notices[0].uid, 0);
    }
}
