//! Microdata retrieval
//!
//! Request flow: parse the filter, resolve the level's field allow-list,
//! compile predicates, build the query pair, then run both queries
//! concurrently.

mod error;
mod executor;
mod service;

pub use error::MicrodataError;
pub use executor::fetch_page;
pub use service::MicrodataService;
