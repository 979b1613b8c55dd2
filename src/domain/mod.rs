// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// This file MUST declare all domain modules and re-export their public API.
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod category;
pub mod creature;
pub mod identity;
pub mod moves;
pub mod region;
pub mod trainer;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Shared enumerations
pub use category::Category;
pub use region::Region;

// Identities
pub use identity::{MoveId, PokedexNumber, TrainerId};

// Creature Domain
pub use creature::{validate_creature, Creature};

// Move Domain
pub use moves::{validate_move, Move};

// Trainer Domain
pub use trainer::{validate_trainer, Trainer, MAX_OWNED_CREATURES};

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use std::fmt::{Debug, Display};
use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Domain-level errors
/// These represent values that can never become a valid entity
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Invalid {field} '{value}': expected {expected}")]
    InvalidFormat {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;

/// An identity-keyed record that can live in a persisted collection.
///
/// Two entities are the same record when their ids are equal; the remaining
/// attributes are mutable state.
pub trait Entity: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Id: Clone + Debug + Display + Eq + Hash + Send + Sync;

    /// Name of the backing collection (file stem / table family)
    const COLLECTION: &'static str;

    /// Human name used in messages
    const KIND: &'static str;

    fn id(&self) -> &Self::Id;

    /// Full invariant check, run by repositories before every write
    fn validate(&self) -> DomainResult<()>;
}

/// Blank names are rejected everywhere
pub(crate) fn require_name(nombre: &str) -> DomainResult<()> {
    if nombre.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "nombre cannot be empty".to_string(),
        ));
    }
    Ok(())
}
