//! CLI Command Implementations
//!
//! One handler per subcommand, each following the store's
//! load → mutate → save pattern and printing a short confirmation.

use std::path::Path;

use log::info;
use uuid::Uuid;

use crate::bundle;
use crate::documents::DocumentManager;
use crate::error::{ProjetosError, Result};
use crate::report;
use crate::store::{parse_funding, DocCategory, Expense, JsonStore, Project, ProjectUpdate};

/// Resolve a project from a CLI selector: a UUID, or an exact display
/// name when it is unambiguous.
pub fn resolve_project(store: &JsonStore, selector: &str) -> Result<Project> {
    if let Ok(id) = Uuid::parse_str(selector) {
        return store.get_project(id);
    }
    let mut matches = store.find_by_name(selector)?;
    match matches.len() {
        0 => Err(ProjetosError::ProjectNameNotFound {
            nome: selector.to_string(),
        }),
        1 => Ok(matches.remove(0)),
        count => Err(ProjetosError::AmbiguousProjectName {
            nome: selector.to_string(),
            count,
        }),
    }
}

/// Register a new project.
pub fn create(store: &JsonStore, nome: &str, responsavel: &str, valor: &str) -> Result<()> {
    info!("Registering project: {}", nome);

    let valor = parse_funding(valor)?;
    let project = store.add_project(nome, responsavel, valor)?;

    println!("Projeto cadastrado: {} ({})", project.nome, project.id);
    Ok(())
}

/// List registered projects.
pub fn list(store: &JsonStore) -> Result<()> {
    let projects = store.list_projects()?;

    if projects.is_empty() {
        println!("No projects registered.");
        return Ok(());
    }

    println!("{:-<72}", "");
    for project in &projects {
        println!(
            "{}  {} | {} | R$ {:.2}",
            project.id, project.nome, project.responsavel, project.valor_financiamento
        );
    }
    println!("{:-<72}", "");
    println!("{} project(s)", projects.len());

    Ok(())
}

/// Print one project as JSON.
pub fn show(store: &JsonStore, selector: &str) -> Result<()> {
    let project = resolve_project(store, selector)?;
    println!("{}", serde_json::to_string_pretty(&project)?);
    Ok(())
}

/// Edit a project's scalar fields.
pub fn edit(
    store: &JsonStore,
    selector: &str,
    nome: Option<String>,
    responsavel: Option<String>,
    valor: Option<&str>,
) -> Result<()> {
    let project = resolve_project(store, selector)?;
    info!("Editing project: {}", project.id);

    let update = ProjectUpdate {
        nome,
        responsavel,
        valor_financiamento: valor.map(parse_funding).transpose()?,
    };
    let edited = store.edit_project(project.id, update)?;

    println!("Projeto editado: {} ({})", edited.nome, edited.id);
    Ok(())
}

/// Delete a project. Its documents stay on disk.
pub fn delete(store: &JsonStore, selector: &str) -> Result<()> {
    let project = resolve_project(store, selector)?;
    info!("Deleting project: {}", project.id);

    store.delete_project(project.id)?;

    println!("Projeto excluído: {}", project.nome);
    Ok(())
}

/// Add an expense to a project.
pub fn add_expense(
    store: &JsonStore,
    selector: &str,
    nome: &str,
    descricao: &str,
    valor: &str,
    nfe: &str,
) -> Result<()> {
    let project = resolve_project(store, selector)?;
    let valor = parse_funding(valor)?;

    store.add_expense(
        project.id,
        Expense {
            nome: nome.to_string(),
            descricao: descricao.to_string(),
            valor,
            nfe: nfe.to_string(),
        },
    )?;

    println!("Despesa adicionada a {}", project.nome);
    Ok(())
}

/// Copy a document into the registry and attach it to a project.
pub fn add_doc(
    store: &JsonStore,
    docs: &DocumentManager,
    selector: &str,
    category: DocCategory,
    source: &Path,
) -> Result<()> {
    let project = resolve_project(store, selector)?;

    let stored = docs.add_document(store, project.id, category, source)?;

    println!("Documento armazenado como {} em {}", stored, category);
    Ok(())
}

/// Remove a stored document from a project.
pub fn remove_doc(
    store: &JsonStore,
    docs: &DocumentManager,
    selector: &str,
    category: DocCategory,
    name: &str,
) -> Result<()> {
    let project = resolve_project(store, selector)?;

    docs.remove_document(store, project.id, category, name)?;

    println!("Documento {} excluído", name);
    Ok(())
}

/// Open a stored document with the platform default application.
pub fn open_doc(docs: &DocumentManager, name: &str) -> Result<()> {
    docs.open_document(name)?;
    println!("Abrindo {}", name);
    Ok(())
}

/// Export a project as a ZIP bundle.
pub fn export(
    store: &JsonStore,
    docs: &DocumentManager,
    selector: &str,
    zip_path: &Path,
) -> Result<()> {
    let project = resolve_project(store, selector)?;

    bundle::export_bundle(&project, docs, zip_path)?;

    println!("Projeto exportado: {}", zip_path.display());
    Ok(())
}

/// Import a project bundle and append it to the registry.
pub fn import(store: &JsonStore, docs: &DocumentManager, zip_path: &Path) -> Result<()> {
    let project = bundle::import_bundle(docs, zip_path)?;
    let nome = project.nome.clone();
    let id = project.id;

    store.append_project(project)?;

    println!("Projeto importado: {} ({})", nome, id);
    Ok(())
}

/// Generate a PDF report for one project.
pub fn report(store: &JsonStore, selector: &str, output: &Path) -> Result<()> {
    let project = resolve_project(store, selector)?;

    report::generate_report(std::slice::from_ref(&project), output)?;

    println!("Relatório gerado: {}", output.display());
    Ok(())
}

/// Generate a PDF report covering every registered project.
pub fn report_all(store: &JsonStore, output: &Path) -> Result<()> {
    let projects = store.list_projects()?;

    report::generate_report(&projects, output)?;

    println!(
        "Relatório gerado para {} projeto(s): {}",
        projects.len(),
        output.display()
    );
    Ok(())
}

/// Print documents directory usage.
pub fn usage(docs: &DocumentManager) -> Result<()> {
    let usage = docs.usage()?;

    println!("Documents directory: {}", docs.docs_dir().display());
    println!("Files: {}", usage.file_count);
    println!("Size: {:.1} MB", usage.total_size_mb);

    Ok(())
}
