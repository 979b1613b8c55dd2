// src/services/report_service.rs
//
// Read-only summaries over the three collections

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::domain::{Category, TrainerId};
use crate::error::AppResult;
use crate::repositories::{CreatureRepository, MoveRepository, Repository, TrainerRepository};

/// How many trainers the ranking keeps
pub const TOP_TRAINERS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrainerRanking {
    pub id: TrainerId,
    pub nombre: String,
    pub owned: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_creatures: usize,
    pub total_moves: usize,
    pub total_trainers: usize,
    pub creatures_by_category: BTreeMap<Category, usize>,
    pub top_trainers: Vec<TrainerRanking>,
}

pub struct ReportService {
    creature_repo: Arc<dyn CreatureRepository>,
    move_repo: Arc<dyn MoveRepository>,
    trainer_repo: Arc<dyn TrainerRepository>,
}

impl ReportService {
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

    pub fn summary(&self) -> AppResult<Summary> {
        let trainers = self.trainer_repo.find_all()?;
        let total_trainers = trainers.len();

        Ok(Summary {
            total_creatures: self.creature_repo.count()?,
            total_moves: self.move_repo.count()?,
            total_trainers,
            creatures_by_category: self.creature_repo.count_by_tipo()?,
            top_trainers: rank_trainers(
                trainers
                    .into_iter()
                    .map(|t| TrainerRanking {
                        id: t.id().clone(),
                        nombre: t.nombre().to_string(),
                        owned: t.owned_count(),
                    })
                    .collect(),
            ),
        })
    }
}

/// Most creatures first; the sort is stable so ties keep stored order
fn rank_trainers(mut rankings: Vec<TrainerRanking>) -> Vec<TrainerRanking> {
    rankings.sort_by(|a, b| b.owned.cmp(&a.owned));
    rankings.truncate(TOP_TRAINERS);
    rankings
}
