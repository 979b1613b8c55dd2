// src/services/mod.rs
//
// Services Module - Cross-entity rules above the repositories
//
// Services depend only on repository contracts, never on a backend.

pub mod creature_service;
pub mod ownership_service;
pub mod report_service;


pub use creature_service::CreatureService;
pub use ownership_service::OwnershipService;
pub use report_service::{ReportService, Summary, TrainerRanking, TOP_TRAINERS};
