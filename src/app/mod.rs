// src/app/mod.rs
//
// Composition root: pick a backend, build repositories, wire services.

pub mod state;

pub use state::AppState;

use std::sync::Arc;

use crate::config::{AppConfig, Backend};
use crate::db::{
    create_connection_pool, get_connection, initialize_database, verify_database_integrity,
};
use crate::error::AppResult;
use crate::infrastructure::RecordStore;
use crate::repositories::{
    CreatureRepository, JsonCreatureRepository, JsonMoveRepository, JsonTrainerRepository,
    MoveRepository, SqliteCreatureRepository, SqliteMoveRepository, SqliteTrainerRepository,
    TrainerRepository,
};
use crate::services::{CreatureService, OwnershipService, ReportService};

type Repositories = (
    Arc<dyn CreatureRepository>,
    Arc<dyn MoveRepository>,
    Arc<dyn TrainerRepository>,
);

pub fn bootstrap(config: &AppConfig) -> AppResult<AppState> {
    // 1. REPOSITORIES
    let (creature_repo, move_repo, trainer_repo) = match config.backend {
        Backend::Json => json_repositories(config)?,
        Backend::Sqlite => sqlite_repositories(config)?,
    };

    // 2. SERVICES
    let ownership_service = Arc::new(OwnershipService::new(
        trainer_repo.clone(),
        creature_repo.clone(),
    ));
    let creature_service = Arc::new(CreatureService::new(
        creature_repo.clone(),
        move_repo.clone(),
        trainer_repo.clone(),
    ));
    let report_service = Arc::new(ReportService::new(
        creature_repo.clone(),
        move_repo.clone(),
        trainer_repo.clone(),
    ));

    log::info!("Bootstrapped {} backend", config.backend);

    Ok(AppState {
        backend: config.backend,
        creature_repo,
        move_repo,
        trainer_repo,
        ownership_service,
        creature_service,
        report_service,
    })
}

fn json_repositories(config: &AppConfig) -> AppResult<Repositories> {
    let store = RecordStore::open(config.data_dir())?;

    Ok((
        Arc::new(JsonCreatureRepository::new(&store)?),
        Arc::new(JsonMoveRepository::new(&store)?),
        Arc::new(JsonTrainerRepository::new(&store)?),
    ))
}

fn sqlite_repositories(config: &AppConfig) -> AppResult<Repositories> {
    let pool = Arc::new(create_connection_pool(&config.database_path())?);

    // Initialize schema (idempotent)
    {
        let conn = get_connection(&pool)?;
        initialize_database(&conn)?;
        verify_database_integrity(&conn)?;
    }

    Ok((
        Arc::new(SqliteCreatureRepository::new(pool.clone())),
        Arc::new(SqliteMoveRepository::new(pool.clone())),
        Arc::new(SqliteTrainerRepository::new(pool)),
    ))
}
