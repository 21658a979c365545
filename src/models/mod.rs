pub mod adversary;
pub mod encounter;
