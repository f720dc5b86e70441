//! PostgreSQL repository implementations

pub mod level;
pub mod microdata;
pub mod survey;
