//! Local record backend on top of SQLite.
//!
//! # Responsibility
//! - Serve the record protocol in-process for tests, tooling and offline use.
//! - Assign `Id` values and validate writes against registered table schemas.
//!
//! # Invariants
//! - `Id` lives only in the `records.id` column, never inside `body`.
//! - Each protocol call holds the connection lock for one short, await-free
//!   critical section.
//! - Batch elements succeed or fail independently.

use crate::client::protocol::{
    BatchResult, DeleteParams, DeleteResponse, DeleteResult, FetchParams, FetchResponse,
    FieldError, MutationParams, MutationResponse, RecordResponse,
};
use crate::client::schema::TableSchema;
use crate::client::{ClientError, ClientResult, RecordClient};
use crate::db::{open_db, open_db_in_memory};
use crate::model::entity::ID_FIELD;
use crate::model::{Record, RecordId};
use async_trait::async_trait;
use log::debug;
use rusqlite::{params, Connection};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

pub struct SqliteRecordClient {
    conn: Mutex<Connection>,
    schemas: HashMap<String, TableSchema>,
}

impl SqliteRecordClient {
    /// Wraps an already-migrated connection.
    pub fn new(conn: Connection, schemas: impl IntoIterator<Item = TableSchema>) -> Self {
        Self {
            conn: Mutex::new(conn),
            schemas: schemas
                .into_iter()
                .map(|schema| (schema.name().to_string(), schema))
                .collect(),
        }
    }

    pub fn open(
        path: impl AsRef<Path>,
        schemas: impl IntoIterator<Item = TableSchema>,
    ) -> ClientResult<Self> {
        Ok(Self::new(open_db(path)?, schemas))
    }

    pub fn open_in_memory(schemas: impl IntoIterator<Item = TableSchema>) -> ClientResult<Self> {
        Ok(Self::new(open_db_in_memory()?, schemas))
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> ClientResult<T>) -> ClientResult<T> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| ClientError::Transport("record store lock poisoned".to_string()))?;
        f(&conn)
    }

    fn schema(&self, table: &str) -> Result<&TableSchema, String> {
        self.schemas
            .get(table)
            .ok_or_else(|| format!("Table '{table}' does not exist"))
    }

    fn fetch(&self, table: &str, params: &FetchParams) -> ClientResult<FetchResponse> {
        if let Err(message) = self.schema(table) {
            return Ok(FetchResponse::failure(message));
        }

        let rows = self.with_conn(|conn| load_table(conn, table))?;
        let data: Vec<Record> = rows
            .into_iter()
            .map(|(id, body)| with_id(id, body))
            .filter(|record| params.filters.iter().all(|filter| filter.matches(record)))
            .map(|record| project(record, params))
            .collect();

        debug!(
            "event=record_fetch module=client status=ok table={table} filters={} rows={}",
            params.filters.len(),
            data.len()
        );
        Ok(FetchResponse::ok(data))
    }

    fn get(&self, table: &str, id: RecordId, params: &FetchParams) -> ClientResult<RecordResponse> {
        if let Err(message) = self.schema(table) {
            return Ok(RecordResponse {
                success: false,
                message: Some(message),
                data: None,
            });
        }

        let body = self.with_conn(|conn| load_one(conn, table, id))?;
        Ok(match body {
            Some(body) => RecordResponse::found(project(with_id(id, body), params)),
            None => RecordResponse::missing(),
        })
    }

    fn create(&self, table: &str, params: &MutationParams) -> ClientResult<MutationResponse> {
        let schema = match self.schema(table) {
            Ok(schema) => schema,
            Err(message) => return Ok(MutationResponse::failure(message)),
        };

        let results = self.with_conn(|conn| {
            params
                .records
                .iter()
                .map(|record| -> ClientResult<BatchResult> {
                    let mut body = record.clone();
                    body.remove(ID_FIELD);
                    let errors = schema.validate(&body);
                    if !errors.is_empty() {
                        return Ok(BatchResult::failed(errors, None));
                    }

                    conn.execute(
                        "INSERT INTO records (table_name, body) VALUES (?1, ?2);",
                        params![table, serde_json::to_string(&body)?],
                    )?;
                    Ok(BatchResult::succeeded(with_id(conn.last_insert_rowid(), body)))
                })
                .collect::<ClientResult<Vec<_>>>()
        })?;

        debug!(
            "event=record_create module=client status=ok table={table} batch={}",
            results.len()
        );
        Ok(MutationResponse::with_results(results))
    }

    fn update(&self, table: &str, params: &MutationParams) -> ClientResult<MutationResponse> {
        let schema = match self.schema(table) {
            Ok(schema) => schema,
            Err(message) => return Ok(MutationResponse::failure(message)),
        };

        let results = self.with_conn(|conn| {
            params
                .records
                .iter()
                .map(|record| -> ClientResult<BatchResult> {
                    let Some(id) = record.get(ID_FIELD).and_then(Value::as_i64) else {
                        return Ok(BatchResult::failed(
                            vec![FieldError::new(ID_FIELD, "Record Id is required")],
                            None,
                        ));
                    };

                    let mut body = record.clone();
                    body.remove(ID_FIELD);
                    let errors = schema.validate(&body);
                    if !errors.is_empty() {
                        return Ok(BatchResult::failed(errors, None));
                    }

                    let changed = conn.execute(
                        "UPDATE records
                         SET body = ?1, updated_at = (strftime('%s', 'now') * 1000)
                         WHERE id = ?2 AND table_name = ?3;",
                        params![serde_json::to_string(&body)?, id, table],
                    )?;
                    if changed == 0 {
                        return Ok(BatchResult::failed(
                            Vec::new(),
                            Some(format!("Record {id} not found")),
                        ));
                    }
                    Ok(BatchResult::succeeded(with_id(id, body)))
                })
                .collect::<ClientResult<Vec<_>>>()
        })?;

        debug!(
            "event=record_update module=client status=ok table={table} batch={}",
            results.len()
        );
        Ok(MutationResponse::with_results(results))
    }

    fn delete(&self, table: &str, params: &DeleteParams) -> ClientResult<DeleteResponse> {
        if let Err(message) = self.schema(table) {
            return Ok(DeleteResponse::failure(message));
        }

        let results = self.with_conn(|conn| {
            params
                .record_ids
                .iter()
                .map(|id| -> ClientResult<DeleteResult> {
                    let changed = conn.execute(
                        "DELETE FROM records WHERE id = ?1 AND table_name = ?2;",
                        params![id, table],
                    )?;
                    Ok(if changed == 0 {
                        DeleteResult {
                            success: false,
                            message: Some(format!("Record {id} not found")),
                        }
                    } else {
                        DeleteResult {
                            success: true,
                            message: None,
                        }
                    })
                })
                .collect::<ClientResult<Vec<_>>>()
        })?;

        debug!(
            "event=record_delete module=client status=ok table={table} batch={}",
            results.len()
        );
        Ok(DeleteResponse::with_results(results))
    }
}

#[async_trait]
impl RecordClient for SqliteRecordClient {
    async fn fetch_records(
        &self,
        table: &str,
        params: &FetchParams,
    ) -> ClientResult<FetchResponse> {
        self.fetch(table, params)
    }

    async fn get_record_by_id(
        &self,
        table: &str,
        id: RecordId,
        params: &FetchParams,
    ) -> ClientResult<Option<RecordResponse>> {
        self.get(table, id, params).map(Some)
    }

    async fn create_record(
        &self,
        table: &str,
        params: &MutationParams,
    ) -> ClientResult<MutationResponse> {
        self.create(table, params)
    }

    async fn update_record(
        &self,
        table: &str,
        params: &MutationParams,
    ) -> ClientResult<MutationResponse> {
        self.update(table, params)
    }

    async fn delete_record(
        &self,
        table: &str,
        params: &DeleteParams,
    ) -> ClientResult<DeleteResponse> {
        self.delete(table, params)
    }
}

fn load_table(conn: &Connection, table: &str) -> ClientResult<Vec<(RecordId, Record)>> {
    let mut stmt =
        conn.prepare("SELECT id, body FROM records WHERE table_name = ?1 ORDER BY id ASC;")?;
    let mut rows = stmt.query([table])?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let body: String = row.get(1)?;
        out.push((row.get(0)?, serde_json::from_str(&body)?));
    }
    Ok(out)
}

fn load_one(conn: &Connection, table: &str, id: RecordId) -> ClientResult<Option<Record>> {
    let mut stmt = conn.prepare("SELECT body FROM records WHERE id = ?1 AND table_name = ?2;")?;
    let mut rows = stmt.query(params![id, table])?;
    match rows.next()? {
        Some(row) => {
            let body: String = row.get(0)?;
            Ok(Some(serde_json::from_str(&body)?))
        }
        None => Ok(None),
    }
}

fn with_id(id: RecordId, mut body: Record) -> Record {
    body.insert(ID_FIELD.to_string(), Value::from(id));
    body
}

/// Keeps `Id` plus the selected fields; an empty selection keeps everything.
fn project(record: Record, params: &FetchParams) -> Record {
    if params.fields.is_empty() {
        return record;
    }
    record
        .into_iter()
        .filter(|(field, _)| {
            field == ID_FIELD || params.fields.iter().any(|selected| selected.name() == field)
        })
        .collect()
}
