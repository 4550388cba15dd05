//! JSON-Backed Project Store
//!
//! The whole collection lives in a single JSON document that is read and
//! rewritten wholesale on every mutation: load → locate by id → mutate →
//! save. Data volumes are small enough that this is acceptable, and there
//! is no guard against another process touching the file.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use uuid::Uuid;

use crate::error::{ProjetosError, Result};
use crate::store::project::{validate_funding, Expense, Project, ProjectUpdate, Store};

/// Handle on the backing JSON file.
#[derive(Debug, Clone)]
pub struct JsonStore {
    data_file: PathBuf,
}

impl JsonStore {
    pub fn new<P: AsRef<Path>>(data_file: P) -> Self {
        Self {
            data_file: data_file.as_ref().to_path_buf(),
        }
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    /// Load the full store. A missing backing file is created holding the
    /// empty store; a blank file also yields the empty store.
    pub fn load(&self) -> Result<Store> {
        if !self.data_file.exists() {
            let store = Store::default();
            self.save(&store)?;
            return Ok(store);
        }

        let content = fs::read_to_string(&self.data_file).map_err(|e| ProjetosError::FileRead {
            path: self.data_file.clone(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Store::default());
        }

        let store: Store = serde_json::from_str(&content)?;
        Ok(store)
    }

    /// Overwrite the backing file with the full store as formatted JSON.
    ///
    /// Not atomic: there is no write-to-temp-then-rename, so a crash
    /// mid-write can corrupt the file. Accepted for single-user use.
    pub fn save(&self, store: &Store) -> Result<()> {
        let content = serde_json::to_string_pretty(store)?;
        fs::write(&self.data_file, content).map_err(|e| ProjetosError::FileWrite {
            path: self.data_file.clone(),
            source: e,
        })?;
        debug!(
            "Saved {} projects to {}",
            store.projetos.len(),
            self.data_file.display()
        );
        Ok(())
    }

    /// Register a new project. Funding is validated before the store is
    /// touched.
    pub fn add_project(&self, nome: &str, responsavel: &str, valor: f64) -> Result<Project> {
        let project = Project::new(nome, responsavel, valor)?;
        let mut store = self.load()?;
        store.projetos.push(project.clone());
        self.save(&store)?;
        Ok(project)
    }

    pub fn list_projects(&self) -> Result<Vec<Project>> {
        Ok(self.load()?.projetos)
    }

    pub fn get_project(&self, id: Uuid) -> Result<Project> {
        self.load()?
            .project(id)
            .cloned()
            .ok_or(ProjetosError::ProjectNotFound { id })
    }

    /// All projects whose display name matches exactly. Names are not
    /// unique, so this can return more than one.
    pub fn find_by_name(&self, nome: &str) -> Result<Vec<Project>> {
        Ok(self
            .load()?
            .projetos
            .into_iter()
            .filter(|p| p.nome == nome)
            .collect())
    }

    /// Apply scalar field updates to one project.
    pub fn edit_project(&self, id: Uuid, update: ProjectUpdate) -> Result<Project> {
        if let Some(valor) = update.valor_financiamento {
            validate_funding(valor)?;
        }
        let mut store = self.load()?;
        let project = store.project_mut(id)?;
        if let Some(nome) = update.nome {
            project.nome = nome;
        }
        if let Some(responsavel) = update.responsavel {
            project.responsavel = responsavel;
        }
        if let Some(valor) = update.valor_financiamento {
            project.valor_financiamento = valor;
        }
        let edited = project.clone();
        self.save(&store)?;
        Ok(edited)
    }

    /// Remove a project from the registry. Files it referenced stay in the
    /// documents directory; nothing cascades.
    pub fn delete_project(&self, id: Uuid) -> Result<()> {
        let mut store = self.load()?;
        let before = store.projetos.len();
        store.projetos.retain(|p| p.id != id);
        if store.projetos.len() == before {
            return Err(ProjetosError::ProjectNotFound { id });
        }
        self.save(&store)
    }

    /// Append an expense to a project's `despesas`.
    pub fn add_expense(&self, id: Uuid, expense: Expense) -> Result<()> {
        let mut store = self.load()?;
        store.project_mut(id)?.despesas.push(expense);
        self.save(&store)
    }

    /// Append an already-built project (used by bundle import).
    pub fn append_project(&self, project: Project) -> Result<()> {
        let mut store = self.load()?;
        store.projetos.push(project);
        self.save(&store)
    }
}
