use super::entity::{Trainer, MAX_OWNED_CREATURES};
use crate::domain::{require_name, DomainError, DomainResult};

/// Validates all Trainer invariants
///
/// Region membership of owned creatures is checked when they are assigned
/// (OwnershipService); a trainer whose region later changes keeps its team.
pub fn validate_trainer(trainer: &Trainer) -> DomainResult<()> {
    require_name(trainer.nombre())?;

    if trainer.owned_count() > MAX_OWNED_CREATURES {
        return Err(DomainError::InvariantViolation(format!(
            "Trainer {} owns {} creatures (max {})",
            trainer.id(),
            trainer.owned_count(),
            MAX_OWNED_CREATURES
        )));
    }
    Ok(())
}
