//! Store Module
//!
//! Project schema and the JSON-file persistence behind every mutation.

pub mod json;
pub mod project;

pub use json::JsonStore;
pub use project::{
    parse_funding, validate_funding, DocCategory, Expense, Project, ProjectUpdate, Store,
    TIMESTAMP_FORMAT,
};
