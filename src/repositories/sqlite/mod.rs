// src/repositories/sqlite/mod.rs
//
// Relational backend: same contracts, rows instead of documents.
// Attached-move and owned-creature sets live in join tables ordered by `posicion`.

pub mod sqlite_creature_repository;
pub mod sqlite_move_repository;
pub mod sqlite_trainer_repository;

pub use sqlite_creature_repository::SqliteCreatureRepository;
pub use sqlite_move_repository::SqliteMoveRepository;
pub use sqlite_trainer_repository::SqliteTrainerRepository;

/// Wrap a parse failure on a stored column so it travels through `query_map`
pub(crate) fn conversion_failure<E>(column: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(err))
}

/// Next insertion rank for a table with an `orden` column
pub(crate) fn next_orden_sql(table: &str) -> String {
    format!("(SELECT COALESCE(MAX(orden), -1) + 1 FROM {})", table)
}
