//! Shared data types for the store layer

mod microdata;
mod survey;

pub use microdata::{MicrodataPage, MicrodataRow};
pub use survey::{LevelRow, SurveyRow, VariableDef};
