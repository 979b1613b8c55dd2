use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::domain::{
    require_name, DomainError, DomainResult, Entity, PokedexNumber, Region, TrainerId,
};

/// A trainer never carries more creatures than this
pub const MAX_OWNED_CREATURES: usize = 6;

/// A trainer from a home region, owning up to six creatures
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "TrainerRecord")]
pub struct Trainer {
    /// Immutable identifier (DNI)
    id: TrainerId,

    nombre: String,

    region: Region,

    /// Owned creatures, unique, in capture order
    pokedex_numbers: Vec<PokedexNumber>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrainerRecord {
    id: TrainerId,
    nombre: String,
    region: Region,
    #[serde(default)]
    pokedex_numbers: Vec<PokedexNumber>,
}

impl TryFrom<TrainerRecord> for Trainer {
    type Error = DomainError;

    fn try_from(record: TrainerRecord) -> Result<Self, Self::Error> {
        Trainer::with_creatures(
            record.id,
            record.nombre,
            record.region,
            record.pokedex_numbers,
        )
    }
}

impl Trainer {
    pub fn new(id: TrainerId, nombre: impl Into<String>, region: Region) -> DomainResult<Self> {
        Self::with_creatures(id, nombre, region, Vec::new())
    }

    /// Repeated numbers collapse to their first occurrence
    pub fn with_creatures(
        id: TrainerId,
        nombre: impl Into<String>,
        region: Region,
        pokedex_numbers: Vec<PokedexNumber>,
    ) -> DomainResult<Self> {
        let nombre = nombre.into();
        require_name(&nombre)?;

        let mut unique: Vec<PokedexNumber> = Vec::with_capacity(pokedex_numbers.len());
        for number in pokedex_numbers {
            if !unique.contains(&number) {
                unique.push(number);
            }
        }
        if unique.len() > MAX_OWNED_CREATURES {
            return Err(DomainError::InvariantViolation(format!(
                "Trainer {} cannot own {} creatures (max {})",
                id,
                unique.len(),
                MAX_OWNED_CREATURES
            )));
        }

        Ok(Self {
            id,
            nombre,
            region,
            pokedex_numbers: unique,
        })
    }

    pub fn id(&self) -> &TrainerId {
        &self.id
    }

    pub fn nombre(&self) -> &str {
        &self.nombre
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn pokedex_numbers(&self) -> &[PokedexNumber] {
        &self.pokedex_numbers
    }

    pub fn owned_count(&self) -> usize {
        self.pokedex_numbers.len()
    }

    pub fn is_full(&self) -> bool {
        self.owned_count() >= MAX_OWNED_CREATURES
    }

    pub fn owns(&self, number: &PokedexNumber) -> bool {
        self.pokedex_numbers.contains(number)
    }

    pub fn set_nombre(&mut self, nombre: impl Into<String>) -> DomainResult<()> {
        let nombre = nombre.into();
        require_name(&nombre)?;
        self.nombre = nombre;
        Ok(())
    }

    pub fn set_region(&mut self, region: Region) {
        self.region = region;
    }

    /// Returns Ok(false) when the creature was already owned.
    /// A full team rejects new members.
    pub fn add_creature(&mut self, number: PokedexNumber) -> DomainResult<bool> {
        if self.owns(&number) {
            return Ok(false);
        }
        if self.is_full() {
            return Err(DomainError::InvariantViolation(format!(
                "Trainer {} already owns {} creatures",
                self.id, MAX_OWNED_CREATURES
            )));
        }
        self.pokedex_numbers.push(number);
        Ok(true)
    }

    /// Returns false when the creature was not owned
    pub fn remove_creature(&mut self, number: &PokedexNumber) -> bool {
        let before = self.pokedex_numbers.len();
        self.pokedex_numbers.retain(|n| n != number);
        self.pokedex_numbers.len() != before
    }
}

impl Entity for Trainer {
    type Id = TrainerId;

    const COLLECTION: &'static str = "trainers";
    const KIND: &'static str = "Entrenador";

    fn id(&self) -> &TrainerId {
        &self.id
    }

    fn validate(&self) -> DomainResult<()> {
        super::validate_trainer(self)
    }
}

impl PartialEq for Trainer {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Trainer {}

impl Hash for Trainer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
