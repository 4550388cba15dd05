//! Project Record Schema
//!
//! Defines the shape of the persisted JSON document. Field names are kept
//! in Portuguese for on-disk compatibility with registries written by
//! earlier versions of the tool.

use std::str::FromStr;

use chrono::Local;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ProjetosError, Result};

/// Format of `data_cadastro`, frozen at project creation.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Root of the persisted document: `{"projetos": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Store {
    #[serde(default)]
    pub projetos: Vec<Project>,
}

impl Store {
    /// Find a project by id.
    pub fn project(&self, id: Uuid) -> Option<&Project> {
        self.projetos.iter().find(|p| p.id == id)
    }

    /// Find a project by id, for mutation.
    pub fn project_mut(&mut self, id: Uuid) -> Result<&mut Project> {
        self.projetos
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(ProjetosError::ProjectNotFound { id })
    }
}

/// A research-funding project record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier. The display name is *not* a key: earlier
    /// versions matched projects by name, which silently mutated every
    /// project sharing one. Legacy documents without an id get a fresh
    /// one on load.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    /// Project name (display metadata, not enforced unique).
    pub nome: String,

    /// Responsible party.
    pub responsavel: String,

    /// Funding amount in R$, non-negative.
    pub valor_financiamento: f64,

    /// Expense records, in insertion order.
    #[serde(default)]
    pub despesas: Vec<Expense>,

    /// Registration timestamp, `"%Y-%m-%d %H:%M:%S"`, set once at creation.
    pub data_cadastro: String,

    /// Budget document filenames.
    #[serde(default)]
    pub orcamentos: Vec<String>,

    /// Invoice (NF-e) document filenames.
    #[serde(default)]
    pub nfe: Vec<String>,

    /// Payment receipt filenames.
    #[serde(default)]
    pub comprovantes: Vec<String>,

    /// Miscellaneous attachment filenames.
    #[serde(default)]
    pub arquivos_adicionais: Vec<String>,
}

impl Project {
    /// Create a new project with empty lists and a frozen creation
    /// timestamp. Rejects negative or non-finite funding amounts.
    pub fn new(nome: &str, responsavel: &str, valor_financiamento: f64) -> Result<Self> {
        validate_funding(valor_financiamento)?;
        Ok(Project {
            id: Uuid::new_v4(),
            nome: nome.to_string(),
            responsavel: responsavel.to_string(),
            valor_financiamento,
            despesas: Vec::new(),
            data_cadastro: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            orcamentos: Vec::new(),
            nfe: Vec::new(),
            comprovantes: Vec::new(),
            arquivos_adicionais: Vec::new(),
        })
    }

    /// Filenames recorded under the given category.
    pub fn documents(&self, category: DocCategory) -> &Vec<String> {
        match category {
            DocCategory::Orcamentos => &self.orcamentos,
            DocCategory::Nfe => &self.nfe,
            DocCategory::Comprovantes => &self.comprovantes,
            DocCategory::ArquivosAdicionais => &self.arquivos_adicionais,
        }
    }

    /// Mutable access to a category's filename list.
    pub fn documents_mut(&mut self, category: DocCategory) -> &mut Vec<String> {
        match category {
            DocCategory::Orcamentos => &mut self.orcamentos,
            DocCategory::Nfe => &mut self.nfe,
            DocCategory::Comprovantes => &mut self.comprovantes,
            DocCategory::ArquivosAdicionais => &mut self.arquivos_adicionais,
        }
    }
}

/// A cost entry tied to a free-text invoice reference (not a file).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub nome: String,
    pub descricao: String,
    pub valor: f64,
    /// Invoice reference, free text.
    pub nfe: String,
}

/// The four document categories a project carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Orcamentos,
    Nfe,
    Comprovantes,
    ArquivosAdicionais,
}

impl DocCategory {
    /// All categories, in the order they are exported and reported.
    pub const ALL: [DocCategory; 4] = [
        DocCategory::Orcamentos,
        DocCategory::Nfe,
        DocCategory::Comprovantes,
        DocCategory::ArquivosAdicionais,
    ];

    /// The JSON field name backing this category.
    pub fn field_name(&self) -> &'static str {
        match self {
            DocCategory::Orcamentos => "orcamentos",
            DocCategory::Nfe => "nfe",
            DocCategory::Comprovantes => "comprovantes",
            DocCategory::ArquivosAdicionais => "arquivos_adicionais",
        }
    }
}

impl FromStr for DocCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "orcamentos" => Ok(DocCategory::Orcamentos),
            "nfe" => Ok(DocCategory::Nfe),
            "comprovantes" => Ok(DocCategory::Comprovantes),
            "arquivos_adicionais" | "arquivos-adicionais" => Ok(DocCategory::ArquivosAdicionais),
            other => Err(format!(
                "unknown category '{}' (expected orcamentos, nfe, comprovantes or arquivos_adicionais)",
                other
            )),
        }
    }
}

impl std::fmt::Display for DocCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.field_name())
    }
}

/// Optional field updates applied by `JsonStore::edit_project`.
#[derive(Debug, Clone, Default)]
pub struct ProjectUpdate {
    pub nome: Option<String>,
    pub responsavel: Option<String>,
    pub valor_financiamento: Option<f64>,
}

/// Reject funding amounts that are negative or not finite.
pub fn validate_funding(value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ProjetosError::InvalidFunding {
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Parse a funding amount from user input, rejecting anything that is not
/// a non-negative decimal.
pub fn parse_funding(input: &str) -> Result<f64> {
    let value: f64 = input
        .trim()
        .parse()
        .map_err(|_| ProjetosError::InvalidFunding {
            value: input.to_string(),
        })?;
    validate_funding(value)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    #[test]
    fn test_new_project_starts_empty() {
        let project = Project::new("X", "Y", 1000.0).unwrap();
        assert_eq!(project.nome, "X");
        assert_eq!(project.responsavel, "Y");
        assert_eq!(project.valor_financiamento, 1000.0);
        assert!(project.despesas.is_empty());
        for category in DocCategory::ALL {
            assert!(project.documents(category).is_empty());
        }
        assert!(!project.data_cadastro.is_empty());
    }

    #[test]
    fn test_timestamp_format() {
        let project = Project::new("X", "Y", 0.0).unwrap();
        NaiveDateTime::parse_from_str(&project.data_cadastro, TIMESTAMP_FORMAT)
            .expect("data_cadastro must match the fixed format");
    }

    #[test]
    fn test_negative_funding_rejected() {
        assert!(matches!(
            Project::new("X", "Y", -1.0),
            Err(ProjetosError::InvalidFunding { .. })
        ));
    }

    #[test]
    fn test_parse_funding() {
        assert_eq!(parse_funding("1000.0").unwrap(), 1000.0);
        assert_eq!(parse_funding(" 12.5 ").unwrap(), 12.5);
        assert!(parse_funding("abc").is_err());
        assert!(parse_funding("").is_err());
        assert!(parse_funding("-5").is_err());
        assert!(parse_funding("NaN").is_err());
    }

    #[test]
    fn test_legacy_document_without_id_gets_one() {
        let json = r#"{
            "nome": "Legado",
            "responsavel": "R",
            "valor_financiamento": 10.0,
            "despesas": [],
            "data_cadastro": "2024-01-01 00:00:00",
            "orcamentos": [],
            "nfe": [],
            "comprovantes": [],
            "arquivos_adicionais": []
        }"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert!(!project.id.is_nil());
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!(
            "arquivos-adicionais".parse::<DocCategory>().unwrap(),
            DocCategory::ArquivosAdicionais
        );
        assert!("invoices".parse::<DocCategory>().is_err());
    }
}
