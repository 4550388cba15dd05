//! Error types for the project registry.

use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, ProjetosError>;

/// Errors that can occur while operating on the registry.
#[derive(Error, Debug)]
pub enum ProjetosError {
    // File Errors
    #[error("Failed to read file: {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory creation failed: {path}: {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Validation Errors
    #[error("Invalid funding amount: {value}")]
    InvalidFunding { value: String },

    // Bundle Format Errors
    #[error("Bundle is missing project.json: {path}")]
    BundleMissingManifest { path: PathBuf },

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    // Lookup Errors
    #[error("Document not found: {path}")]
    DocumentNotFound { path: PathBuf },

    #[error("Project not found: {id}")]
    ProjectNotFound { id: Uuid },

    #[error("No project named: {nome}")]
    ProjectNameNotFound { nome: String },

    #[error("Ambiguous project name: {nome} matches {count} projects")]
    AmbiguousProjectName { nome: String, count: usize },

    // Serialization Errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Generic Errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProjetosError {
    /// Returns a user-friendly recovery suggestion.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            ProjetosError::InvalidFunding { .. } => {
                Some("Enter the amount as a non-negative decimal, e.g. 1500.00.")
            }
            ProjetosError::DocumentNotFound { .. } => {
                Some("The file may have been moved or deleted. Check the documents directory.")
            }
            ProjetosError::BundleMissingManifest { .. } => {
                Some("The archive is not a project bundle. Export one with 'projetos-cli export'.")
            }
            ProjetosError::ProjectNameNotFound { .. } => {
                Some("Run 'projetos-cli list' to see registered projects.")
            }
            ProjetosError::AmbiguousProjectName { .. } => {
                Some("Several projects share this name. Select one by id instead.")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovery_suggestions() {
        let err = ProjetosError::InvalidFunding {
            value: "abc".to_string(),
        };
        assert!(err.recovery_suggestion().is_some());

        let err = ProjetosError::AmbiguousProjectName {
            nome: "X".to_string(),
            count: 2,
        };
        assert!(err.recovery_suggestion().is_some());
    }
}
