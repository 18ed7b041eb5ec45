// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `SQLite`-backed record store.
//!
//! Every record lives in one row of the `records` table, keyed by its
//! collection and record id (the first two path segments), with the
//! record body stored as JSON text. Paths deeper than a record patch the
//! body in place. A write batch runs inside a single SQL transaction.
//! A row whose body is not valid JSON reads back as a JSON string holding
//! the raw text, so one corrupt row never fails a collection read.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use diesel::prelude::*;
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::RecordStore;
use crate::batch::WriteBatch;
use crate::diesel_schema::records;
use crate::error::StoreError;
use crate::path::StorePath;
use crate::tree::{apply_at, get_at, is_vacant};

/// Embedded schema migrations.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A record store persisted in a `SQLite` database.
pub struct SqliteStore {
    conn: Mutex<SqliteConnection>,
}

impl SqliteStore {
    /// Opens an isolated in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be created or migrated.
    pub fn new_in_memory() -> Result<Self, StoreError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let url: String = format!("file:roster_mem_{db_id}?mode=memory&cache=shared");
        let conn: SqliteConnection = initialize_database(&url)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens (creating if needed) a database file.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not valid UTF-8 or the database
    /// cannot be opened or migrated.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            StoreError::ConnectionFailed(String::from("Database path is not valid UTF-8"))
        })?;
        let mut conn: SqliteConnection = initialize_database(path_str)?;

        // NOTE: PRAGMA is raw SQL (Diesel has no PRAGMA DSL)
        diesel::sql_query("PRAGMA journal_mode = WAL").execute(&mut conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

/// Connects to `database_url` and applies pending migrations.
fn initialize_database(database_url: &str) -> Result<SqliteConnection, StoreError> {
    info!("Initializing SQLite record store at: {}", database_url);
    let mut conn: SqliteConnection = SqliteConnection::establish(database_url)?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| StoreError::MigrationFailed(e.to_string()))?;
    Ok(conn)
}

/// Parses a stored body. A body that is not JSON is returned as its raw
/// text so the caller can reject that one record and keep the rest.
fn parse_body(collection: &str, record_id: &str, body: String) -> Value {
    match serde_json::from_str(&body) {
        Ok(value) => value,
        Err(err) => {
            warn!(
                collection,
                record_id,
                error = %err,
                "Stored record body is not valid JSON"
            );
            Value::String(body)
        }
    }
}

fn load_record(
    conn: &mut SqliteConnection,
    collection: &str,
    record_id: &str,
) -> Result<Option<Value>, StoreError> {
    let body: Option<String> = records::table
        .filter(records::collection.eq(collection))
        .filter(records::record_id.eq(record_id))
        .select(records::body)
        .first::<String>(conn)
        .optional()?;
    Ok(body.map(|body| parse_body(collection, record_id, body)))
}

fn load_collection(
    conn: &mut SqliteConnection,
    collection: &str,
) -> Result<Map<String, Value>, StoreError> {
    let rows: Vec<(String, String)> = records::table
        .filter(records::collection.eq(collection))
        .select((records::record_id, records::body))
        .load::<(String, String)>(conn)?;

    let mut map: Map<String, Value> = Map::new();
    for (record_id, body) in rows {
        let value: Value = parse_body(collection, &record_id, body);
        map.insert(record_id, value);
    }
    Ok(map)
}

fn load_everything(conn: &mut SqliteConnection) -> Result<Value, StoreError> {
    let rows: Vec<(String, String, String)> = records::table
        .select((records::collection, records::record_id, records::body))
        .load::<(String, String, String)>(conn)?;

    let mut root: Map<String, Value> = Map::new();
    for (collection, record_id, body) in rows {
        let value: Value = parse_body(&collection, &record_id, body);
        let entry: &mut Value = root
            .entry(collection)
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(records_map) = entry {
            records_map.insert(record_id, value);
        }
    }
    Ok(Value::Object(root))
}

fn put_record(
    conn: &mut SqliteConnection,
    collection: &str,
    record_id: &str,
    body: &Value,
) -> Result<(), StoreError> {
    if is_vacant(body) {
        return delete_record(conn, collection, record_id);
    }
    diesel::replace_into(records::table)
        .values((
            records::collection.eq(collection),
            records::record_id.eq(record_id),
            records::body.eq(body.to_string()),
        ))
        .execute(conn)?;
    Ok(())
}

fn delete_record(
    conn: &mut SqliteConnection,
    collection: &str,
    record_id: &str,
) -> Result<(), StoreError> {
    diesel::delete(
        records::table
            .filter(records::collection.eq(collection))
            .filter(records::record_id.eq(record_id)),
    )
    .execute(conn)?;
    Ok(())
}

/// Applies one batch entry inside an open transaction.
fn apply_entry(
    conn: &mut SqliteConnection,
    path: &StorePath,
    value: Option<Value>,
) -> Result<(), StoreError> {
    match path.segments() {
        [] => Err(StoreError::RootWrite),
        [collection] => {
            diesel::delete(records::table.filter(records::collection.eq(collection.as_str())))
                .execute(conn)?;
            match value {
                None => Ok(()),
                Some(Value::Object(children)) => {
                    for (record_id, body) in children {
                        put_record(conn, collection, &record_id, &body)?;
                    }
                    Ok(())
                }
                Some(_) => Err(StoreError::NotAnObject {
                    path: path.to_string(),
                }),
            }
        }
        [collection, record_id] => match value {
            Some(body) => put_record(conn, collection, record_id, &body),
            None => delete_record(conn, collection, record_id),
        },
        [collection, record_id, rest @ ..] => {
            let existing: Option<Value> = load_record(conn, collection, record_id)?;
            if existing.is_none() && value.is_none() {
                return Ok(());
            }
            let mut body: Value = existing.unwrap_or(Value::Null);
            apply_at(&mut body, rest, value, path)?;
            put_record(conn, collection, record_id, &body)
        }
    }
}

impl RecordStore for SqliteStore {
    async fn read(&self, path: &StorePath) -> Result<Option<Value>, StoreError> {
        let mut conn = self.conn.lock().await;
        match path.segments() {
            [] => {
                let root: Value = load_everything(&mut conn)?;
                Ok(get_at(&root, &[]).cloned())
            }
            [collection] => {
                let map: Map<String, Value> = load_collection(&mut conn, collection)?;
                let node: Value = Value::Object(map);
                Ok(get_at(&node, &[]).cloned())
            }
            [collection, record_id, rest @ ..] => {
                let record: Option<Value> = load_record(&mut conn, collection, record_id)?;
                Ok(record.and_then(|body| get_at(&body, rest).cloned()))
            }
        }
    }

    async fn write(&self, batch: WriteBatch) -> Result<(), StoreError> {
        batch.validate()?;
        let path_count: usize = batch.len();

        let mut conn = self.conn.lock().await;
        conn.transaction::<_, StoreError, _>(|tx| {
            for (path, value) in batch.into_entries() {
                apply_entry(tx, &path, value)?;
            }
            Ok(())
        })?;
        drop(conn);

        debug!(paths = path_count, "Committed write batch to SQLite store");
        Ok(())
    }
}
