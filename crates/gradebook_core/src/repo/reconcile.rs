//! Batch result reconciliation.
//!
//! Mutation responses are batch-shaped even for one record. These helpers
//! split a batch into successes and failures and render the failures as the
//! messages shown to the user.

use crate::client::protocol::{BatchResult, DeleteResult};
use crate::model::Record;

/// Partition of a create/update batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    pub succeeded: Vec<BatchResult>,
    pub failed: Vec<BatchResult>,
}

impl BatchOutcome {
    pub fn from_results(results: Vec<BatchResult>) -> Self {
        let (succeeded, failed) = results.into_iter().partition(|result| result.success);
        Self { succeeded, failed }
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Every `"{fieldLabel}: {message}"` of a failed element, followed by its
    /// record-level message, element by element.
    pub fn failure_messages(&self) -> Vec<String> {
        self.failed
            .iter()
            .flat_map(|result| {
                let field_messages = result
                    .errors
                    .iter()
                    .flatten()
                    .map(|error| format!("{}: {}", error.field_label, error.message));
                field_messages.chain(result.message.clone())
            })
            .collect()
    }

    /// Data of the first successful element.
    pub fn into_first_success(self) -> Option<Record> {
        self.succeeded.into_iter().next().and_then(|result| result.data)
    }
}

/// Failed elements of a delete batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub failed: Vec<DeleteResult>,
}

impl DeleteOutcome {
    pub fn from_results(results: Vec<DeleteResult>) -> Self {
        Self {
            failed: results.into_iter().filter(|result| !result.success).collect(),
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    pub fn failure_messages(&self) -> Vec<String> {
        self.failed
            .iter()
            .filter_map(|result| result.message.clone())
            .collect()
    }
}
