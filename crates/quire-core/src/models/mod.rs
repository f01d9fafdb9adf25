//! Data models.

pub mod catalog;
pub mod config;
pub mod document;

/// Owner identifier supplied by the identity collaborator.
pub type UserId = String;

/// Opaque record identifier assigned by the store.
pub type RecordId = String;
