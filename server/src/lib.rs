//! Microdata gateway server
//!
//! Read-only HTTP API over survey microdata stored in PostgreSQL. Clients
//! list surveys and levels, then page through unit-level records with an
//! optional JSON filter that is compiled into a parameterized WHERE clause.

pub mod api;
pub mod app;
pub mod core;
pub mod data;
pub mod domain;
pub mod utils;
