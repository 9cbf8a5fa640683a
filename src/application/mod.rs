// Application layer - Use cases and view orchestration
pub mod analytics_repository;
pub mod analytics_service;
pub mod error;
pub mod map_service;
pub mod risk_service;
pub mod sample_service;
pub mod view_scheduler;
pub mod view_state;

#[cfg(test)]
pub mod fake_repository;
