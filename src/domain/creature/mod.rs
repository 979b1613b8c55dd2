pub mod entity;
pub mod invariants;

pub use entity::Creature;
pub use invariants::validate_creature;
