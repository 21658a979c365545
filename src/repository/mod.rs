pub mod adversary_repository;
pub mod database;
pub mod encounter_repository;
pub mod error;
pub mod schema;
