//! CLI Module
//!
//! Command-line frontend for the project registry.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Projetos - registry for research-funding projects
#[derive(Parser, Debug)]
#[command(name = "projetos")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the JSON backing file
    #[arg(long, global = true, default_value = "projetos.json")]
    pub data_file: PathBuf,

    /// Path to the documents directory
    #[arg(long, global = true, default_value = "documentos")]
    pub docs_dir: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register a new project
    #[command(name = "create")]
    Create {
        /// Project name
        nome: String,

        /// Responsible party
        responsavel: String,

        /// Funding amount in R$, non-negative decimal
        valor: String,
    },

    /// List registered projects
    #[command(name = "list")]
    List,

    /// Print one project as JSON
    #[command(name = "show")]
    Show {
        /// Project id or name
        project: String,
    },

    /// Edit a project's scalar fields
    #[command(name = "edit")]
    Edit {
        /// Project id or name
        project: String,

        /// New project name
        #[arg(long)]
        nome: Option<String>,

        /// New responsible party
        #[arg(long)]
        responsavel: Option<String>,

        /// New funding amount
        #[arg(long)]
        valor: Option<String>,
    },

    /// Delete a project from the registry
    #[command(name = "delete")]
    Delete {
        /// Project id or name
        project: String,
    },

    /// Add an expense to a project
    #[command(name = "add-expense")]
    AddExpense {
        /// Project id or name
        project: String,

        /// Expense name
        nome: String,

        /// Expense description
        descricao: String,

        /// Expense value in R$
        valor: String,

        /// Invoice reference (free text)
        #[arg(long, default_value = "")]
        nfe: String,
    },

    /// Attach a document file to a project
    #[command(name = "add-doc")]
    AddDoc {
        /// Project id or name
        project: String,

        /// Category: orcamentos, nfe, comprovantes or arquivos_adicionais
        category: crate::store::DocCategory,

        /// File to copy into the documents directory
        source: PathBuf,
    },

    /// Remove a stored document from a project
    #[command(name = "remove-doc")]
    RemoveDoc {
        /// Project id or name
        project: String,

        /// Category: orcamentos, nfe, comprovantes or arquivos_adicionais
        category: crate::store::DocCategory,

        /// Stored basename to remove
        name: String,
    },

    /// Open a stored document with the default application
    #[command(name = "open-doc")]
    OpenDoc {
        /// Stored basename to open
        name: String,
    },

    /// Export a project and its documents as a ZIP bundle
    #[command(name = "export")]
    Export {
        /// Project id or name
        project: String,

        /// Destination ZIP file
        zip_path: PathBuf,
    },

    /// Import a project bundle into the registry
    #[command(name = "import")]
    Import {
        /// Bundle ZIP file to import
        zip_path: PathBuf,
    },

    /// Generate a PDF report for one project
    #[command(name = "report")]
    Report {
        /// Project id or name
        project: String,

        /// Destination PDF file
        output: PathBuf,
    },

    /// Generate a PDF report covering every project
    #[command(name = "report-all")]
    ReportAll {
        /// Destination PDF file
        output: PathBuf,
    },

    /// Show documents directory usage
    #[command(name = "usage")]
    Usage,
}
