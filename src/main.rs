//! Projetos CLI - Research-Project Registry
//!
//! Command-line interface for registering projects, attaching documents,
//! and exporting bundles and reports.

use clap::Parser;
use env_logger::Env;
use log::info;

use projetos::cli::{commands, Cli, Commands};
use projetos::documents::DocumentManager;
use projetos::store::JsonStore;
use projetos::Result;

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let store = JsonStore::new(&cli.data_file);
    let docs = DocumentManager::new(&cli.docs_dir);

    match cli.command {
        Some(cmd) => {
            info!("Data file: {}", cli.data_file.display());
            handle_command(&store, &docs, cmd)
        }
        None => {
            println!("Projetos v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(store: &JsonStore, docs: &DocumentManager, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Create {
            nome,
            responsavel,
            valor,
        } => commands::create(store, &nome, &responsavel, &valor),
        Commands::List => commands::list(store),
        Commands::Show { project } => commands::show(store, &project),
        Commands::Edit {
            project,
            nome,
            responsavel,
            valor,
        } => commands::edit(store, &project, nome, responsavel, valor.as_deref()),
        Commands::Delete { project } => commands::delete(store, &project),
        Commands::AddExpense {
            project,
            nome,
            descricao,
            valor,
            nfe,
        } => commands::add_expense(store, &project, &nome, &descricao, &valor, &nfe),
        Commands::AddDoc {
            project,
            category,
            source,
        } => commands::add_doc(store, docs, &project, category, &source),
        Commands::RemoveDoc {
            project,
            category,
            name,
        } => commands::remove_doc(store, docs, &project, category, &name),
        Commands::OpenDoc { name } => commands::open_doc(docs, &name),
        Commands::Export { project, zip_path } => commands::export(store, docs, &project, &zip_path),
        Commands::Import { zip_path } => commands::import(store, docs, &zip_path),
        Commands::Report { project, output } => commands::report(store, &project, &output),
        Commands::ReportAll { output } => commands::report_all(store, &output),
        Commands::Usage => commands::usage(docs),
    }
}
