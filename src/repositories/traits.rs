// src/repositories/traits.rs
//
// Repository contracts shared by every backend
//
// The filter helpers have default bodies over `find_all`; a backend that can
// answer them natively (SQL) overrides them. Results keep collection order.

use std::collections::BTreeMap;

use crate::domain::{Category, Creature, Entity, Move, MoveId, PokedexNumber, Region, Trainer};
use crate::error::{AppError, AppResult};

/// Identity-keyed persistence for one entity kind
pub trait Repository<E: Entity>: Send + Sync {
    fn find_by_id(&self, id: &E::Id) -> AppResult<Option<E>>;

    /// Whole collection, in stored order
    fn find_all(&self) -> AppResult<Vec<E>>;

    /// Upsert: replaces the record with the same id in place, or appends.
    fn save(&self, entity: &E) -> AppResult<E>;

    /// Returns false (and writes nothing) when the id is absent
    fn delete_by_id(&self, id: &E::Id) -> AppResult<bool>;

    /// Replaces the collection with an empty one
    fn delete_all(&self) -> AppResult<()>;

    fn count(&self) -> AppResult<usize> {
        Ok(self.find_all()?.len())
    }

    fn exists_by_id(&self, id: &E::Id) -> AppResult<bool> {
        Ok(self.find_by_id(id)?.is_some())
    }

    /// Like `find_by_id`, but absence is a `NotFound` error
    fn get_by_id(&self, id: &E::Id) -> AppResult<E> {
        self.find_by_id(id)?
            .ok_or_else(|| AppError::not_found(E::KIND, id))
    }

    /// Read-modify-write of one record.
    ///
    /// `apply` edits the stored record and returns whether it changed; only a
    /// change is written. An error from `apply` aborts without writing.
    /// Absence is a `NotFound` error.
    ///
    /// The default body is a plain read then save. Backends shared between
    /// threads override it so the whole cycle is one critical section.
    fn update(
        &self,
        id: &E::Id,
        apply: &mut dyn FnMut(&mut E) -> AppResult<bool>,
    ) -> AppResult<bool> {
        let mut entity = self.get_by_id(id)?;
        if !apply(&mut entity)? {
            return Ok(false);
        }
        self.save(&entity)?;
        Ok(true)
    }
}

pub trait CreatureRepository: Repository<Creature> {
    fn find_by_tipo(&self, tipo: Category) -> AppResult<Vec<Creature>> {
        Ok(self
            .find_all()?
            .into_iter()
            .filter(|c| c.tipo() == tipo)
            .collect())
    }

    fn find_by_nombre_prefix(&self, prefix: &str) -> AppResult<Vec<Creature>> {
        let prefix = prefix.to_lowercase();
        Ok(self
            .find_all()?
            .into_iter()
            .filter(|c| c.nombre().to_lowercase().starts_with(&prefix))
            .collect())
    }

    /// Creatures whose attached set references `move_id`
    fn find_by_move_id(&self, move_id: &MoveId) -> AppResult<Vec<Creature>> {
        Ok(self
            .find_all()?
            .into_iter()
            .filter(|c| c.has_move(move_id))
            .collect())
    }

    fn count_by_tipo(&self) -> AppResult<BTreeMap<Category, usize>> {
        let mut counts = BTreeMap::new();
        for creature in self.find_all()? {
            *counts.entry(creature.tipo()).or_insert(0) += 1;
        }
        Ok(counts)
    }
}

pub trait MoveRepository: Repository<Move> {
    fn find_by_tipo(&self, tipo: Category) -> AppResult<Vec<Move>> {
        Ok(self
            .find_all()?
            .into_iter()
            .filter(|m| m.tipo() == tipo)
            .collect())
    }

    fn find_by_nombre_prefix(&self, prefix: &str) -> AppResult<Vec<Move>> {
        let prefix = prefix.to_lowercase();
        Ok(self
            .find_all()?
            .into_iter()
            .filter(|m| m.nombre().to_lowercase().starts_with(&prefix))
            .collect())
    }

    fn count_by_tipo(&self) -> AppResult<BTreeMap<Category, usize>> {
        let mut counts = BTreeMap::new();
        for mv in self.find_all()? {
            *counts.entry(mv.tipo()).or_insert(0) += 1;
        }
        Ok(counts)
    }
}

pub trait TrainerRepository: Repository<Trainer> {
    fn find_by_region(&self, region: Region) -> AppResult<Vec<Trainer>> {
        Ok(self
            .find_all()?
            .into_iter()
            .filter(|t| t.region() == region)
            .collect())
    }

    fn find_by_nombre_prefix(&self, prefix: &str) -> AppResult<Vec<Trainer>> {
        let prefix = prefix.to_lowercase();
        Ok(self
            .find_all()?
            .into_iter()
            .filter(|t| t.nombre().to_lowercase().starts_with(&prefix))
            .collect())
    }

    /// Trainers that own `number`
    fn find_by_creature(&self, number: &PokedexNumber) -> AppResult<Vec<Trainer>> {
        Ok(self
            .find_all()?
            .into_iter()
            .filter(|t| t.owns(number))
            .collect())
    }

    fn count_by_region(&self) -> AppResult<BTreeMap<Region, usize>> {
        let mut counts = BTreeMap::new();
        for trainer in self.find_all()? {
            *counts.entry(trainer.region()).or_insert(0) += 1;
        }
        Ok(counts)
    }
}
