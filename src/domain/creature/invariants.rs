use super::entity::Creature;
use crate::domain::{require_name, DomainError, DomainResult};

/// Validates all Creature invariants
pub fn validate_creature(creature: &Creature) -> DomainResult<()> {
    require_name(creature.nombre())?;
    validate_unique_moves(creature)?;
    Ok(())
}

/// A move is attached at most once
fn validate_unique_moves(creature: &Creature) -> DomainResult<()> {
    let ids = creature.movimiento_ids();
    for (i, id) in ids.iter().enumerate() {
        if ids[..i].contains(id) {
            return Err(DomainError::InvariantViolation(format!(
                "Move {} attached twice to {}",
                id,
                creature.pokedex_number()
            )));
        }
    }
    Ok(())
}

/// Invariants that must hold true for Creature domain:
///
/// 1. Identity (pokedex number) is three digits and immutable
/// 2. Name cannot be blank
/// 3. Attached move ids are unique
/// 4. Equality is identity equality
/// 5. Category compatibility with moves is enforced by CreatureService,
///    not by the entity
