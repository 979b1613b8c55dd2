pub mod entity;
pub mod invariants;

pub use entity::Move;
pub use invariants::validate_move;
