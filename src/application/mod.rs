// Application layer - Correlation engine and load orchestration
pub mod dataset_repository;
pub mod errors;
pub mod fleet_service;
pub mod normalizer;
pub mod state_resolver;
pub mod telemetry_index;
