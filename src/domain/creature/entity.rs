use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::domain::{
    require_name, Category, DomainError, DomainResult, Entity, MoveId, PokedexNumber,
};

/// A creature of the pokedex.
/// Identity is the pokedex number; everything else can change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "CreatureRecord")]
pub struct Creature {
    /// Immutable identifier
    pokedex_number: PokedexNumber,

    nombre: String,

    tipo: Category,

    /// Attached moves, unique, in attachment order
    movimiento_ids: Vec<MoveId>,
}

/// Raw stored shape, validated through `Creature::with_moves`
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatureRecord {
    pokedex_number: PokedexNumber,
    nombre: String,
    tipo: Category,
    #[serde(default)]
    movimiento_ids: Vec<MoveId>,
}

impl TryFrom<CreatureRecord> for Creature {
    type Error = DomainError;

    fn try_from(record: CreatureRecord) -> Result<Self, Self::Error> {
        Creature::with_moves(
            record.pokedex_number,
            record.nombre,
            record.tipo,
            record.movimiento_ids,
        )
    }
}

impl Creature {
    /// Create a creature with no moves attached
    pub fn new(
        pokedex_number: PokedexNumber,
        nombre: impl Into<String>,
        tipo: Category,
    ) -> DomainResult<Self> {
        Self::with_moves(pokedex_number, nombre, tipo, Vec::new())
    }

    /// Create a creature with an initial move list.
    /// Repeated move ids collapse to their first occurrence.
    pub fn with_moves(
        pokedex_number: PokedexNumber,
        nombre: impl Into<String>,
        tipo: Category,
        movimiento_ids: Vec<MoveId>,
    ) -> DomainResult<Self> {
        let nombre = nombre.into();
        require_name(&nombre)?;

        let mut unique: Vec<MoveId> = Vec::with_capacity(movimiento_ids.len());
        for id in movimiento_ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }

        Ok(Self {
            pokedex_number,
            nombre,
            tipo,
            movimiento_ids: unique,
        })
    }

    pub fn pokedex_number(&self) -> &PokedexNumber {
        &self.pokedex_number
    }

    pub fn nombre(&self) -> &str {
        &self.nombre
    }

    pub fn tipo(&self) -> Category {
        self.tipo
    }

    pub fn movimiento_ids(&self) -> &[MoveId] {
        &self.movimiento_ids
    }

    /// Rename; a blank name leaves the creature untouched
    pub fn set_nombre(&mut self, nombre: impl Into<String>) -> DomainResult<()> {
        let nombre = nombre.into();
        require_name(&nombre)?;
        self.nombre = nombre;
        Ok(())
    }

    pub fn set_tipo(&mut self, tipo: Category) {
        self.tipo = tipo;
    }

    pub fn has_move(&self, move_id: &MoveId) -> bool {
        self.movimiento_ids.contains(move_id)
    }

    /// Returns false when the move was already attached
    pub fn add_move(&mut self, move_id: MoveId) -> bool {
        if self.has_move(&move_id) {
            return false;
        }
        self.movimiento_ids.push(move_id);
        true
    }

    /// Returns false when the move was not attached
    pub fn remove_move(&mut self, move_id: &MoveId) -> bool {
        let before = self.movimiento_ids.len();
        self.movimiento_ids.retain(|id| id != move_id);
        self.movimiento_ids.len() != before
    }
}

impl Entity for Creature {
    type Id = PokedexNumber;

    const COLLECTION: &'static str = "creatures";
    const KIND: &'static str = "Pokemon";

    fn id(&self) -> &PokedexNumber {
        &self.pokedex_number
    }

    fn validate(&self) -> DomainResult<()> {
        super::validate_creature(self)
    }
}

impl PartialEq for Creature {
    fn eq(&self, other: &Self) -> bool {
        self.pokedex_number == other.pokedex_number
    }
}

impl Eq for Creature {}

impl Hash for Creature {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pokedex_number.hash(state);
    }
}
