// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers
// - NO cross-entity rules (capacity, region, category)
// - NO cross-repository calls
// - Both backends honour the same contract

pub mod json_repository;
pub mod sqlite;
pub mod traits;

pub use traits::{CreatureRepository, MoveRepository, Repository, TrainerRepository};

pub use json_repository::{
    JsonCreatureRepository, JsonMoveRepository, JsonRepository, JsonTrainerRepository,
};

pub use sqlite::{SqliteCreatureRepository, SqliteMoveRepository, SqliteTrainerRepository};
