// src/infrastructure/mod.rs
//
// Infrastructure Layer
//
// Contains implementation details that support the domain
// but are not part of the domain itself.
//
// RULES:
// - Infrastructure serves the domain
// - Infrastructure never dictates domain behavior
// - Infrastructure is replaceable

pub mod backup;
pub mod record_store;

pub use backup::{backup_name, create_backup, list_backups, BACKUP_DIR};
pub use record_store::{Collection, Mutation, RecordStore};
