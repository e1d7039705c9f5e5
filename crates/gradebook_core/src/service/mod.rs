//! Use-case services composed from repositories.

pub mod gradebook_service;
