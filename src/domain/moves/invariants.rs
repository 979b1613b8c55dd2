use super::entity::{require_power, Move};
use crate::domain::{require_name, DomainResult};

/// Validates all Move invariants
pub fn validate_move(movimiento: &Move) -> DomainResult<()> {
    require_name(movimiento.nombre())?;
    require_power(movimiento.potencia())?;
    Ok(())
}
