// src/services/ownership_service.rs
//
// Trainer <-> Creature ownership rules
//
// RULES:
// - Rule checks run inside the trainer's read-modify-write
// - A rejected request leaves persisted state untouched

use std::sync::Arc;

use crate::domain::{Creature, Entity, PokedexNumber, Trainer, TrainerId, MAX_OWNED_CREATURES};
use crate::error::{AppError, AppResult};
use crate::repositories::{CreatureRepository, Repository, TrainerRepository};

pub struct OwnershipService {
    trainer_repo: Arc<dyn TrainerRepository>,
    creature_repo: Arc<dyn CreatureRepository>,
}

impl OwnershipService {
    pub fn new(
        trainer_repo: Arc<dyn TrainerRepository>,
        creature_repo: Arc<dyn CreatureRepository>,
    ) -> Self {
        Self {
            trainer_repo,
            creature_repo,
        }
    }

    /// Give `number` to a trainer.
    ///
    /// Checks, in order: both records exist, the team is not full, and the
    /// creature belongs to the trainer's home region. Returns false when the
    /// trainer already owned it (nothing is written).
    pub fn assign(&self, trainer_id: &TrainerId, number: &PokedexNumber) -> AppResult<bool> {
        let creature = self.creature_repo.get_by_id(number)?;

        let added = self.trainer_repo.update(trainer_id, &mut |trainer| {
            if trainer.is_full() {
                log::warn!(
                    "Rejected assign {} -> {}: team is full",
                    number,
                    trainer_id
                );
                return Err(AppError::ConstraintViolation(format!(
                    "Trainer {} already owns {} creatures",
                    trainer_id, MAX_OWNED_CREATURES
                )));
            }

            let region = trainer.region();
            if !region.contains(creature.pokedex_number().number()) {
                log::warn!(
                    "Rejected assign {} -> {}: outside {}",
                    number,
                    trainer_id,
                    region
                );
                return Err(AppError::ConstraintViolation(format!(
                    "Pokemon {} is not from {} (range {:03}-{:03})",
                    number,
                    region,
                    region.range().start(),
                    region.range().end()
                )));
            }

            Ok(trainer.add_creature(number.clone())?)
        })?;

        if !added {
            return Ok(false);
        }

        // A concurrent delete_creature may have swept trainers before this write
        if !self.creature_repo.exists_by_id(number)? {
            self.trainer_repo
                .update(trainer_id, &mut |trainer| Ok(trainer.remove_creature(number)))?;
            return Err(AppError::not_found(Creature::KIND, number));
        }

        log::debug!("Assigned {} to {}", number, trainer_id);
        Ok(true)
    }

    /// Take `number` away from a trainer; false when it was not owned
    pub fn release(&self, trainer_id: &TrainerId, number: &PokedexNumber) -> AppResult<bool> {
        let removed = self
            .trainer_repo
            .update(trainer_id, &mut |trainer| Ok(trainer.remove_creature(number)))?;

        if removed {
            log::debug!("Released {} from {}", number, trainer_id);
        }
        Ok(removed)
    }

    /// Resolved team of a trainer, in capture order.
    /// Numbers that no longer resolve are skipped.
    pub fn owned_creatures(&self, trainer_id: &TrainerId) -> AppResult<Vec<Creature>> {
        let trainer = self.trainer_repo.get_by_id(trainer_id)?;

        let mut creatures = Vec::with_capacity(trainer.owned_count());
        for number in trainer.pokedex_numbers() {
            match self.creature_repo.find_by_id(number)? {
                Some(creature) => creatures.push(creature),
                None => log::debug!("Trainer {} references missing Pokemon {}", trainer_id, number),
            }
        }
        Ok(creatures)
    }

    pub fn owners_of(&self, number: &PokedexNumber) -> AppResult<Vec<Trainer>> {
        self.trainer_repo.find_by_creature(number)
    }
}
