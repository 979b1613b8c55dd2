// src/services/creature_service.rs
//
// Creature <-> Move links and cascading deletes
//
// RULES:
// - Category gate on attach
// - Deleting a creature or a move never leaves a reference behind

use std::sync::Arc;

use crate::domain::{Creature, Entity, Move, MoveId, PokedexNumber};
use crate::error::{AppError, AppResult};
use crate::repositories::{CreatureRepository, MoveRepository, Repository, TrainerRepository};

pub struct CreatureService {
    creature_repo: Arc<dyn CreatureRepository>,
    move_repo: Arc<dyn MoveRepository>,
    trainer_repo: Arc<dyn TrainerRepository>,
}

impl CreatureService {
    pub fn new(
        creature_repo: Arc<dyn CreatureRepository>,
        move_repo: Arc<dyn MoveRepository>,
        trainer_repo: Arc<dyn TrainerRepository>,
    ) -> Self {
        Self {
            creature_repo,
            move_repo,
            trainer_repo,
        }
    }

    /// Teach a move to a creature of the same category.
    /// Returns false when it was already attached.
    pub fn attach(&self, number: &PokedexNumber, move_id: &MoveId) -> AppResult<bool> {
        if !self.creature_repo.exists_by_id(number)? {
            return Err(AppError::not_found(Creature::KIND, number));
        }
        let mv = self.move_repo.get_by_id(move_id)?;

        let attached = self.creature_repo.update(number, &mut |creature| {
            if creature.tipo() != mv.tipo() {
                log::warn!(
                    "Rejected attach {} -> {}: {} vs {}",
                    move_id,
                    number,
                    mv.tipo(),
                    creature.tipo()
                );
                return Err(AppError::ConstraintViolation(format!(
                    "Movimiento {} is {} but Pokemon {} is {}",
                    move_id,
                    mv.tipo(),
                    number,
                    creature.tipo()
                )));
            }

            Ok(creature.add_move(move_id.clone()))
        })?;

        if !attached {
            return Ok(false);
        }

        // A concurrent delete_move may have swept creatures before this write
        if !self.move_repo.exists_by_id(move_id)? {
            self.creature_repo
                .update(number, &mut |creature| Ok(creature.remove_move(move_id)))?;
            return Err(AppError::not_found(Move::KIND, move_id));
        }

        log::debug!("Attached {} to {}", move_id, number);
        Ok(true)
    }

    /// Remove a move from a creature; the move itself need not exist.
    /// The creature is written back even when nothing was removed.
    pub fn detach(&self, number: &PokedexNumber, move_id: &MoveId) -> AppResult<bool> {
        let mut removed = false;
        self.creature_repo.update(number, &mut |creature| {
            removed = creature.remove_move(move_id);
            Ok(true)
        })?;

        Ok(removed)
    }

    /// Delete a creature and strip it from every trainer.
    /// Returns how many trainers were changed.
    pub fn delete_creature(&self, number: &PokedexNumber) -> AppResult<usize> {
        if !self.creature_repo.exists_by_id(number)? {
            return Err(AppError::not_found(Creature::KIND, number));
        }

        // Delete first: an assign that lands after the sweep sees the creature
        // gone and undoes itself
        self.creature_repo.delete_by_id(number)?;

        let mut changed = 0;
        for trainer in self.trainer_repo.find_by_creature(number)? {
            let removed = self
                .trainer_repo
                .update(trainer.id(), &mut |t| Ok(t.remove_creature(number)));
            match removed {
                Ok(true) => changed += 1,
                Ok(false) | Err(AppError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }

        log::info!(
            "Deleted Pokemon {}; removed from {} trainer(s)",
            number,
            changed
        );
        Ok(changed)
    }

    /// Strip a move from every creature, then delete it.
    /// Returns how many creatures were changed.
    pub fn delete_move(&self, move_id: &MoveId) -> AppResult<usize> {
        if !self.move_repo.exists_by_id(move_id)? {
            return Err(AppError::not_found(Move::KIND, move_id));
        }

        let mut changed = self.strip_move(move_id)?;
        self.move_repo.delete_by_id(move_id)?;
        // Attaches that landed between the sweep and the delete
        changed += self.strip_move(move_id)?;

        log::info!(
            "Deleted Movimiento {}; detached from {} Pokemon",
            move_id,
            changed
        );
        Ok(changed)
    }

    fn strip_move(&self, move_id: &MoveId) -> AppResult<usize> {
        let mut changed = 0;
        for creature in self.creature_repo.find_by_move_id(move_id)? {
            let removed = self
                .creature_repo
                .update(creature.id(), &mut |c| Ok(c.remove_move(move_id)));
            match removed {
                Ok(true) => changed += 1,
                Ok(false) | Err(AppError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(changed)
    }
}
