//! SQLite-backed local collection endpoint.

use std::{path::Path, sync::Arc};

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use crate::car::{CarDraft, CarRecord};

use super::{Transport, TransportError, TransportResult};

const SELECT_COLUMNS: &str = "SELECT id, make, bhp, extra FROM cars";

/// [`Transport`] that keeps the collection in a SQLite database.
///
/// Ids are assigned from the row sequence, so a fresh database hands out
/// `"1"`, `"2"`, ... in creation order.
#[derive(Clone)]
pub struct SqliteTransport {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteTransport {
    /// Opens or creates a collection database at `path`.
    pub fn open(path: impl AsRef<Path>) -> TransportResult<Self> {
        let conn = Connection::open(path)?;
        Self::init_connection(conn)
    }

    /// Opens an in-memory collection.
    pub fn open_in_memory() -> TransportResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(conn)
    }

    fn init_connection(conn: Connection) -> TransportResult<Self> {
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Inserts records with their ids as given, in order.
    pub async fn seed(&self, records: Vec<CarRecord>) -> TransportResult<()> {
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt =
                    tx.prepare("INSERT INTO cars(id, make, bhp, extra) VALUES (?1, ?2, ?3, ?4)")?;
                for rec in &records {
                    let extra = serde_json::to_string(&rec.extra)?;
                    stmt.execute(params![rec.id, rec.make, rec.bhp, extra])?;
                }
            }
            tx.commit()?;
            Ok(())
        })
        .await
    }

    async fn with_conn<T, F>(&self, f: F) -> TransportResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> TransportResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut conn = conn.blocking_lock();
            f(&mut conn)
        })
        .await
        .map_err(|e| TransportError::Message(format!("join error: {e}")))?
    }
}

#[async_trait]
impl Transport for SqliteTransport {
    async fn fetch_all(&self) -> TransportResult<Vec<CarRecord>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY seq ASC"))?;
            let rows = stmt.query_map([], read_row)?;

            let mut out = Vec::new();
            for row in rows {
                out.push(decode_row(row?)?);
            }
            Ok(out)
        })
        .await
    }

    async fn create(&self, payload: &CarDraft) -> TransportResult<CarRecord> {
        let payload = payload.clone();
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO cars(make, bhp) VALUES (?1, ?2)",
                params![payload.make, payload.bhp],
            )?;
            let seq = tx.last_insert_rowid();
            let id = seq.to_string();
            tx.execute("UPDATE cars SET id = ?1 WHERE seq = ?2", params![id, seq])?;
            tx.commit()?;
            Ok(CarRecord::new(id, payload.make, payload.bhp))
        })
        .await
    }

    async fn update(&self, id: &str, payload: &CarDraft) -> TransportResult<Option<CarRecord>> {
        let id = id.to_string();
        let payload = payload.clone();
        self.with_conn(move |conn| {
            let changed = conn.execute(
                "UPDATE cars SET make = ?1, bhp = ?2 WHERE id = ?3",
                params![payload.make, payload.bhp, id],
            )?;
            if changed == 0 {
                return Err(not_found(&id));
            }
            let row = conn
                .query_row(&format!("{SELECT_COLUMNS} WHERE id = ?1"), params![id], read_row)
                .optional()?;
            row.map(decode_row).transpose()
        })
        .await
    }

    async fn delete(&self, id: &str) -> TransportResult<()> {
        let id = id.to_string();
        self.with_conn(move |conn| {
            let changed = conn.execute("DELETE FROM cars WHERE id = ?1", params![id])?;
            if changed == 0 {
                return Err(not_found(&id));
            }
            Ok(())
        })
        .await
    }
}

type RawRow = (String, String, i64, String);

fn read_row(row: &Row<'_>) -> rusqlite::Result<RawRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn decode_row((id, make, bhp, extra): RawRow) -> TransportResult<CarRecord> {
    let extra: Map<String, Value> = serde_json::from_str(&extra)?;
    Ok(CarRecord {
        id,
        make,
        bhp,
        extra,
    })
}

fn not_found(id: &str) -> TransportError {
    TransportError::Status {
        status: 404,
        message: format!("car {id} not found"),
    }
}
