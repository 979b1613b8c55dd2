// src/error/mod.rs
//
// Application error taxonomy.
//
// Validation, NotFound, ConstraintViolation and StoreCorruption reach the
// caller unchanged; nothing below the presentation layer recovers from them.

mod types;

pub use types::{AppError, AppResult};
