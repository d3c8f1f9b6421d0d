// Declare database submodules
pub mod models;
pub mod postgres; // Contains schema.rs
pub mod repositories;
