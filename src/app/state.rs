// src/app/state.rs

use std::sync::Arc;

use crate::config::Backend;
use crate::repositories::{CreatureRepository, MoveRepository, TrainerRepository};
use crate::services::{CreatureService, OwnershipService, ReportService};

/// Everything a front end needs: plain lookups go straight to the
/// repositories, anything touching two entities goes through a service.
/// All fields are Arc-wrapped for sharing across threads.
pub struct AppState {
    pub backend: Backend,

    pub creature_repo: Arc<dyn CreatureRepository>,
    pub move_repo: Arc<dyn MoveRepository>,
    pub trainer_repo: Arc<dyn TrainerRepository>,

    pub ownership_service: Arc<OwnershipService>,
    pub creature_service: Arc<CreatureService>,
    pub report_service: Arc<ReportService>,
}
