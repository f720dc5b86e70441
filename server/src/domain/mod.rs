//! Domain logic
//!
//! - `microdata` - Filtered, paginated microdata retrieval

pub mod microdata;

pub use microdata::{MicrodataError, MicrodataService};
