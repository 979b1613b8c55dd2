pub mod entity;
pub mod invariants;

pub use entity::{Trainer, MAX_OWNED_CREATURES};
pub use invariants::validate_trainer;
