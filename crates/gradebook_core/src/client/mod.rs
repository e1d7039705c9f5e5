//! Backend record client contract.
//!
//! # Responsibility
//! - Define the generic record protocol every backend speaks
//!   (`fetch`/`get`/`create`/`update`/`delete` over named tables).
//! - Keep transport concerns behind one injected trait object.
//!
//! # Invariants
//! - Backend-reported failures travel as `success: false` payloads, not as
//!   `ClientError`. `ClientError` means the call itself did not complete.
//! - Mutation payloads are batch-shaped even for a single record.

pub mod protocol;
pub mod schema;
pub mod sqlite;

use crate::db::DbError;
use crate::model::RecordId;
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use protocol::{
    BatchResult, DeleteParams, DeleteResponse, DeleteResult, FetchParams, FetchResponse,
    FieldError, FieldSelection, Filter, FilterOperator, MutationParams, MutationResponse,
    RecordResponse,
};
pub use schema::{ColumnKind, TableSchema};
pub use sqlite::SqliteRecordClient;

pub type ClientResult<T> = Result<T, ClientError>;

/// The call did not produce a backend response.
#[derive(Debug)]
pub enum ClientError {
    Transport(String),
    Storage(DbError),
    Decode(serde_json::Error),
}

impl Display for ClientError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(message) => write!(f, "backend transport failure: {message}"),
            Self::Storage(err) => write!(f, "backend storage failure: {err}"),
            Self::Decode(err) => write!(f, "malformed backend payload: {err}"),
        }
    }
}

impl Error for ClientError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(_) => None,
            Self::Storage(err) => Some(err),
            Self::Decode(err) => Some(err),
        }
    }
}

impl From<DbError> for ClientError {
    fn from(value: DbError) -> Self {
        Self::Storage(value)
    }
}

impl From<rusqlite::Error> for ClientError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Storage(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value)
    }
}

/// Generic record operations against a backend table.
#[async_trait]
pub trait RecordClient: Send + Sync {
    async fn fetch_records(&self, table: &str, params: &FetchParams)
        -> ClientResult<FetchResponse>;

    /// `Ok(None)` models a backend that answers with no envelope at all.
    async fn get_record_by_id(
        &self,
        table: &str,
        id: RecordId,
        params: &FetchParams,
    ) -> ClientResult<Option<RecordResponse>>;

    async fn create_record(
        &self,
        table: &str,
        params: &MutationParams,
    ) -> ClientResult<MutationResponse>;

    async fn update_record(
        &self,
        table: &str,
        params: &MutationParams,
    ) -> ClientResult<MutationResponse>;

    async fn delete_record(&self, table: &str, params: &DeleteParams)
        -> ClientResult<DeleteResponse>;
}
