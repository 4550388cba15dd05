//! Projetos - Research-Project Registry
//!
//! A single-user registry for research-funding projects: records live in
//! one JSON backing file, supporting documents in a flat directory, and
//! projects can be exported/imported as ZIP bundles or rendered into PDF
//! reports.
//!
//! # Architecture
//!
//! - `store`: the project schema and the JSON-file persistence every
//!   mutation goes through (load → locate by id → mutate → save)
//! - `documents`: the shared documents directory, with collision-suffix
//!   disambiguation for stored basenames
//! - `bundle`: ZIP export/import of one project plus its documents
//! - `report`: PDF rendering of project records
//! - `cli`: the clap frontend that drives the above

pub mod bundle;
pub mod cli;
pub mod documents;
pub mod error;
pub mod report;
pub mod store;

pub use error::{ProjetosError, Result};
pub use store::{DocCategory, Expense, JsonStore, Project, Store};
