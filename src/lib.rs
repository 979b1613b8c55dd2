// src/lib.rs
// Pokedex - Local-first record manager for creatures, trainers and moves
//
// Architecture:
// - Domain: validated value objects, no I/O
// - Record Store: durable JSON documents with backups
// - Repositories: one contract, JSON and SQLite backends
// - Services: every rule that spans two entities
// - Explicit: no implicit behavior, no magic

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod repositories;
pub mod services;

// ============================================================================
// COMPOSITION
// ============================================================================

pub mod app;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{
    validate_creature,
    validate_move,
    validate_trainer,
    Category,
    // Creature
    Creature,
    DomainError,
    DomainResult,
    Entity,
    // Move
    Move,
    MoveId,
    PokedexNumber,
    Region,
    // Trainer
    Trainer,
    TrainerId,
    MAX_OWNED_CREATURES,
};

// ============================================================================
// PUBLIC API - Errors & Config
// ============================================================================

pub use config::{AppConfig, Backend};
pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Storage
// ============================================================================

pub use db::{create_connection_pool, initialize_database, ConnectionPool};
pub use infrastructure::{Collection, Mutation, RecordStore};

// ============================================================================
// PUBLIC API - Repositories
// ============================================================================

pub use repositories::{
    CreatureRepository,
    JsonCreatureRepository,
    JsonMoveRepository,
    JsonRepository,
    JsonTrainerRepository,
    MoveRepository,
    Repository,
    SqliteCreatureRepository,
    SqliteMoveRepository,
    SqliteTrainerRepository,
    TrainerRepository,
};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{CreatureService, OwnershipService, ReportService, Summary, TrainerRanking};

pub use app::{bootstrap, AppState};
