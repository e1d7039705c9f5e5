//! Repository error taxonomy.

use crate::client::ClientError;
use crate::model::RecordId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Write operation a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub enum RepoError {
    /// The backend answered `success: false`.
    Backend {
        table: &'static str,
        operation: Operation,
        message: String,
    },
    NotFound {
        table: &'static str,
        id: RecordId,
        message: &'static str,
    },
    /// Some elements of a batch failed and the operation does not tolerate it.
    PartialBatch {
        table: &'static str,
        operation: Operation,
        failed: usize,
        message: &'static str,
    },
    /// The backend call did not complete.
    Client(ClientError),
    /// A record payload does not match the entity shape.
    InvalidData(String),
}

impl RepoError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Backend { message, .. } => f.write_str(message),
            Self::NotFound { message, .. } => f.write_str(message),
            Self::PartialBatch { message, .. } => f.write_str(message),
            Self::Client(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid record data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Client(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ClientError> for RepoError {
    fn from(value: ClientError) -> Self {
        Self::Client(value)
    }
}
