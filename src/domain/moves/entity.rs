use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::domain::{require_name, Category, DomainError, DomainResult, Entity, MoveId};

/// A move that creatures of the same category can learn
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "MoveRecord")]
pub struct Move {
    /// Immutable identifier
    id: MoveId,

    nombre: String,

    tipo: Category,

    /// Base power, never negative
    potencia: i32,
}

#[derive(Deserialize)]
struct MoveRecord {
    id: MoveId,
    nombre: String,
    tipo: Category,
    potencia: i32,
}

impl TryFrom<MoveRecord> for Move {
    type Error = DomainError;

    fn try_from(record: MoveRecord) -> Result<Self, Self::Error> {
        Move::new(record.id, record.nombre, record.tipo, record.potencia)
    }
}

impl Move {
    pub fn new(
        id: MoveId,
        nombre: impl Into<String>,
        tipo: Category,
        potencia: i32,
    ) -> DomainResult<Self> {
        let nombre = nombre.into();
        require_name(&nombre)?;
        require_power(potencia)?;

        Ok(Self {
            id,
            nombre,
            tipo,
            potencia,
        })
    }

    pub fn id(&self) -> &MoveId {
        &self.id
    }

    pub fn nombre(&self) -> &str {
        &self.nombre
    }

    pub fn tipo(&self) -> Category {
        self.tipo
    }

    pub fn potencia(&self) -> i32 {
        self.potencia
    }

    pub fn set_nombre(&mut self, nombre: impl Into<String>) -> DomainResult<()> {
        let nombre = nombre.into();
        require_name(&nombre)?;
        self.nombre = nombre;
        Ok(())
    }

    pub fn set_tipo(&mut self, tipo: Category) {
        self.tipo = tipo;
    }

    pub fn set_potencia(&mut self, potencia: i32) -> DomainResult<()> {
        require_power(potencia)?;
        self.potencia = potencia;
        Ok(())
    }
}

pub(super) fn require_power(potencia: i32) -> DomainResult<()> {
    if potencia < 0 {
        return Err(DomainError::InvariantViolation(format!(
            "potencia must be >= 0, got {}",
            potencia
        )));
    }
    Ok(())
}

impl Entity for Move {
    type Id = MoveId;

    const COLLECTION: &'static str = "moves";
    const KIND: &'static str = "Movimiento";

    fn id(&self) -> &MoveId {
        &self.id
    }

    fn validate(&self) -> DomainResult<()> {
        super::validate_move(self)
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
