//! Repository layer over the record client.
//!
//! # Responsibility
//! - Translate typed calls into the generic record protocol, one generic
//!   `Repository` per entity descriptor.
//! - Apply the failure policy: `get_all` never fails, every other operation
//!   surfaces failures as `RepoError` after logging and notifying.
//!
//! # Invariants
//! - No local caching: every call round-trips to the backend.
//! - Partial batch failures are tolerated by create/update, fatal for delete.

pub mod attendance_repo;
pub mod error;
pub mod reconcile;
pub mod record_repo;

pub use error::{Operation, RepoError, RepoResult};
pub use reconcile::{BatchOutcome, DeleteOutcome};
pub use record_repo::{
    AttendanceRepository, ClassRepository, GradeRepository, Repository, StudentRepository,
};
