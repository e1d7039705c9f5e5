//! Generic entity repository.
//!
//! # Failure policy
//!
//! | Operation   | `success: false`      | partial batch failure     | client error            |
//! |-------------|-----------------------|---------------------------|-------------------------|
//! | `get_all`   | notify, empty list    | n/a                       | notify, empty list      |
//! | `get_by_id` | `NotFound` if no data | n/a                       | log, `Err`              |
//! | `create`    | notify, `Err`         | notify each, first success| notify, `Err`           |
//! | `update`    | notify, `Err`         | notify each, first success| notify, `Err`           |
//! | `delete`    | notify, `Err`         | notify each, `Err`        | notify, `Err`           |
//!
//! Every failure is also logged with table, operation and id. Rows that do
//! not decode into the entity are logged and left out of list results; a
//! stored record whose echo does not decode is notified and returned as `None`.

use crate::client::protocol::{DeleteParams, FetchParams, Filter, MutationParams};
use crate::client::{ClientError, RecordClient};
use crate::model::entity::ID_FIELD;
use crate::model::{Attendance, Class, Entity, Grade, Record, RecordId, Student};
use crate::notify::Notifier;
use crate::repo::error::{Operation, RepoError, RepoResult};
use crate::repo::reconcile::{BatchOutcome, DeleteOutcome};
use log::{debug, error, warn};
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::Mutex;

pub type StudentRepository<C> = Repository<Student, C>;
pub type ClassRepository<C> = Repository<Class, C>;
pub type GradeRepository<C> = Repository<Grade, C>;
pub type AttendanceRepository<C> = Repository<Attendance, C>;

/// CRUD gateway for one backend table described by `E`.
pub struct Repository<E: Entity, C: RecordClient + ?Sized> {
    client: Arc<C>,
    notifier: Arc<dyn Notifier>,
    /// Serializes read-then-write sequences issued through this instance.
    pub(crate) upsert_lock: Mutex<()>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity, C: RecordClient + ?Sized> Repository<E, C> {
    pub fn new(client: Arc<C>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            notifier,
            upsert_lock: Mutex::new(()),
            _entity: PhantomData,
        }
    }

    pub fn table(&self) -> &'static str {
        E::TABLE
    }

    /// Lists every record of the table. Never fails: backend and client
    /// failures are reported and yield an empty list.
    pub async fn get_all(&self) -> Vec<E> {
        let params = FetchParams::select(E::FIELDS);
        let response = match self.client.fetch_records(E::TABLE, &params).await {
            Ok(response) => response,
            Err(err) => {
                error!(
                    "event=record_fetch module=repo status=error table={} error_code=client_failed error={err}",
                    E::TABLE
                );
                self.notifier.error(E::FETCH_FAILED_MESSAGE);
                return Vec::new();
            }
        };

        if !response.success {
            let message = response
                .message
                .unwrap_or_else(|| E::FETCH_FAILED_MESSAGE.to_string());
            error!(
                "event=record_fetch module=repo status=error table={} error_code=backend_rejected error={message}",
                E::TABLE
            );
            self.notifier.error(&message);
            return Vec::new();
        }

        let records = decode_rows::<E>("record_fetch", response.data.unwrap_or_default());
        debug!(
            "event=record_fetch module=repo status=ok table={} rows={}",
            E::TABLE,
            records.len()
        );
        records
    }

    /// Lists records matching every filter.
    ///
    /// A `success: false` answer is logged and treated as "no match"; client
    /// failures propagate.
    pub async fn find_where(&self, filters: Vec<Filter>) -> RepoResult<Vec<E>> {
        let params = FetchParams {
            filters,
            ..FetchParams::select(E::FIELDS)
        };
        let response = self
            .client
            .fetch_records(E::TABLE, &params)
            .await
            .map_err(|err| {
                error!(
                    "event=record_query module=repo status=error table={} error_code=client_failed error={err}",
                    E::TABLE
                );
                RepoError::Client(err)
            })?;

        if !response.success {
            warn!(
                "event=record_query module=repo status=rejected table={} error={}",
                E::TABLE,
                response.message.as_deref().unwrap_or("")
            );
            return Ok(Vec::new());
        }

        Ok(decode_rows("record_query", response.data.unwrap_or_default()))
    }

    /// Fetches one record; `NotFound` when the backend returns no data.
    pub async fn get_by_id(&self, id: RecordId) -> RepoResult<E> {
        let params = FetchParams::select(E::FIELDS);
        let response = self
            .client
            .get_record_by_id(E::TABLE, id, &params)
            .await
            .map_err(|err| {
                error!(
                    "event=record_get module=repo status=error table={} id={id} error_code=client_failed error={err}",
                    E::TABLE
                );
                RepoError::Client(err)
            })?;

        let Some(mut data) = response.and_then(|response| response.data) else {
            error!(
                "event=record_get module=repo status=error table={} id={id} error_code=not_found",
                E::TABLE
            );
            return Err(RepoError::NotFound {
                table: E::TABLE,
                id,
                message: E::NOT_FOUND_MESSAGE,
            });
        };

        data.entry(ID_FIELD).or_insert_with(|| Value::from(id));
        decode(data).inspect_err(|err| {
            error!(
                "event=record_get module=repo status=error table={} id={id} error_code=decode_failed error={err}",
                E::TABLE
            );
        })
    }

    /// Creates one record. Returns the stored record, or `None` when the
    /// backend rejected the element (failures are notified, not returned).
    pub async fn create(&self, draft: &E::Draft) -> RepoResult<Option<E>> {
        let record = self.build_record(draft, Operation::Create)?;
        self.submit(Operation::Create, None, MutationParams::single(record))
            .await
    }

    /// Replaces every attribute of record `id` with `draft`.
    pub async fn update(&self, id: RecordId, draft: &E::Draft) -> RepoResult<Option<E>> {
        let mut record = self.build_record(draft, Operation::Update)?;
        record.insert(ID_FIELD.to_string(), Value::from(id));
        self.submit(Operation::Update, Some(id), MutationParams::single(record))
            .await
    }

    /// Deletes record `id`. Any failed element fails the whole call.
    pub async fn delete(&self, id: RecordId) -> RepoResult<bool> {
        let params = DeleteParams {
            record_ids: vec![id],
        };
        let response = self
            .client
            .delete_record(E::TABLE, &params)
            .await
            .map_err(|err| self.client_failure(Operation::Delete, Some(id), err))?;

        if !response.success {
            return Err(self.backend_failure(Operation::Delete, Some(id), response.message));
        }

        let outcome = DeleteOutcome::from_results(response.results.unwrap_or_default());
        if outcome.has_failures() {
            error!(
                "event=record_delete module=repo status=error table={} id={id} error_code=partial_batch failed={}",
                E::TABLE,
                outcome.failed.len()
            );
            for message in outcome.failure_messages() {
                self.notifier.error(&message);
            }
            return Err(RepoError::PartialBatch {
                table: E::TABLE,
                operation: Operation::Delete,
                failed: outcome.failed.len(),
                message: E::DELETE_FAILED_MESSAGE,
            });
        }

        debug!(
            "event=record_delete module=repo status=ok table={} id={id}",
            E::TABLE
        );
        Ok(true)
    }

    fn build_record(&self, draft: &E::Draft, operation: Operation) -> RepoResult<Record> {
        E::to_record(draft).map_err(|err| {
            error!(
                "event=record_{operation} module=repo status=error table={} error_code=encode_failed error={err}",
                E::TABLE
            );
            RepoError::InvalidData(err.to_string())
        })
    }

    async fn submit(
        &self,
        operation: Operation,
        id: Option<RecordId>,
        params: MutationParams,
    ) -> RepoResult<Option<E>> {
        let result = match operation {
            Operation::Update => self.client.update_record(E::TABLE, &params).await,
            _ => self.client.create_record(E::TABLE, &params).await,
        };
        let response = result.map_err(|err| self.client_failure(operation, id, err))?;

        if !response.success {
            return Err(self.backend_failure(operation, id, response.message));
        }

        let Some(results) = response.results else {
            return Ok(None);
        };

        let outcome = BatchOutcome::from_results(results);
        if outcome.has_failures() {
            error!(
                "event=record_{operation} module=repo status=partial table={} id={} failed={} succeeded={}",
                E::TABLE,
                display_id(id),
                outcome.failed.len(),
                outcome.succeeded.len()
            );
            for message in outcome.failure_messages() {
                self.notifier.error(&message);
            }
        }

        let Some(mut data) = outcome.into_first_success() else {
            return Ok(None);
        };
        if let Some(id) = id {
            data.entry(ID_FIELD).or_insert_with(|| Value::from(id));
        }

        // The write is stored at this point; a decode failure is never an `Err`.
        match decode::<E>(data) {
            Ok(stored) => {
                debug!(
                    "event=record_{operation} module=repo status=ok table={} id={}",
                    E::TABLE,
                    stored.id()
                );
                Ok(Some(stored))
            }
            Err(err) => {
                error!(
                    "event=record_{operation} module=repo status=error table={} id={} error_code=decode_failed error={err}",
                    E::TABLE,
                    display_id(id)
                );
                self.notifier
                    .error(&format!("Saved {} record could not be read back", E::TABLE));
                Ok(None)
            }
        }
    }

    fn client_failure(
        &self,
        operation: Operation,
        id: Option<RecordId>,
        err: ClientError,
    ) -> RepoError {
        error!(
            "event=record_{operation} module=repo status=error table={} id={} error_code=client_failed error={err}",
            E::TABLE,
            display_id(id)
        );
        self.notifier.error(&err.to_string());
        RepoError::Client(err)
    }

    fn backend_failure(
        &self,
        operation: Operation,
        id: Option<RecordId>,
        message: Option<String>,
    ) -> RepoError {
        let message =
            message.unwrap_or_else(|| format!("Failed to {operation} {} record", E::TABLE));
        error!(
            "event=record_{operation} module=repo status=error table={} id={} error_code=backend_rejected error={message}",
            E::TABLE,
            display_id(id)
        );
        self.notifier.error(&message);
        RepoError::Backend {
            table: E::TABLE,
            operation,
            message,
        }
    }
}

fn decode<E: Entity>(record: Record) -> RepoResult<E> {
    E::from_record(record)
        .map_err(|err| RepoError::InvalidData(format!("{} record: {err}", E::TABLE)))
}

/// Decodes rows one by one; a row that does not fit `E` is logged and
/// skipped so the rest of the table still reaches the caller.
fn decode_rows<E: Entity>(event: &str, rows: Vec<Record>) -> Vec<E> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.get(ID_FIELD).cloned().unwrap_or(Value::Null);
            decode::<E>(row)
                .inspect_err(|err| {
                    warn!(
                        "event={event} module=repo status=skipped table={} id={id} error={err}",
                        E::TABLE
                    );
                })
                .ok()
        })
        .collect()
}

fn display_id(id: Option<RecordId>) -> String {
    id.map_or_else(|| "-".to_string(), |id| id.to_string())
}
