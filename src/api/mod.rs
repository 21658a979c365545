pub mod adversary_apis;
pub mod config;
pub mod encounter_apis;
