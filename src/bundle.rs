//! Project Bundle Codec
//!
//! Exports one project as a self-contained ZIP archive (its JSON record
//! plus every referenced document) and reverses the process on import.
//! Archives are flat: one `project.json` entry and one entry per document
//! basename.

use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use log::{info, warn};
use uuid::Uuid;
use zip::result::ZipError;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::documents::DocumentManager;
use crate::error::{ProjetosError, Result};
use crate::store::{DocCategory, Project};

/// Name of the JSON entry inside every bundle.
pub const MANIFEST_ENTRY: &str = "project.json";

/// Write a ZIP bundle containing the project's JSON record and every
/// referenced document sourced from the documents directory. Documents
/// missing on disk are skipped rather than failing the whole export.
pub fn export_bundle(project: &Project, docs: &DocumentManager, zip_path: &Path) -> Result<()> {
    let file = File::create(zip_path).map_err(|e| ProjetosError::FileWrite {
        path: zip_path.to_path_buf(),
        source: e,
    })?;
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file(MANIFEST_ENTRY, options)?;
    zip.write_all(serde_json::to_string_pretty(project)?.as_bytes())?;

    for category in DocCategory::ALL {
        for name in project.documents(category) {
            let source = docs.resolve(name);
            if !source.exists() {
                warn!("Skipping missing document: {}", source.display());
                continue;
            }
            let mut doc = File::open(&source).map_err(|e| ProjetosError::FileRead {
                path: source.clone(),
                source: e,
            })?;
            zip.start_file(name.as_str(), options)?;
            std::io::copy(&mut doc, &mut zip)?;
        }
    }

    zip.finish()?;
    info!("Exported bundle: {}", zip_path.display());
    Ok(())
}

/// Read a bundle, extract its documents into the documents directory and
/// return the contained project. The caller appends it to the store.
///
/// Extracted files go through the same suffix disambiguation as
/// `DocumentManager::add_document`, and the returned project's filename
/// lists are rewritten to the names actually stored, so importing never
/// overwrites an existing document. The imported project gets a fresh id.
pub fn import_bundle(docs: &DocumentManager, zip_path: &Path) -> Result<Project> {
    let file = File::open(zip_path).map_err(|e| ProjetosError::FileRead {
        path: zip_path.to_path_buf(),
        source: e,
    })?;
    let mut archive = ZipArchive::new(file)?;

    // Parse the manifest first so a malformed bundle fails before any
    // document lands on disk.
    let mut project: Project = {
        let mut entry = match archive.by_name(MANIFEST_ENTRY) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => {
                return Err(ProjetosError::BundleMissingManifest {
                    path: zip_path.to_path_buf(),
                })
            }
            Err(e) => return Err(e.into()),
        };
        let mut content = String::new();
        entry
            .read_to_string(&mut content)
            .map_err(|e| ProjetosError::FileRead {
                path: zip_path.to_path_buf(),
                source: e,
            })?;
        serde_json::from_str(&content)?
    };
    project.id = Uuid::new_v4();

    let mut stored_names: HashMap<String, String> = HashMap::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_dir() || entry.name() == MANIFEST_ENTRY {
            continue;
        }
        // Bundles are written flat; strip any path a foreign tool added.
        let basename = match Path::new(entry.name()).file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => continue,
        };
        let stored = docs.store_reader(&basename, &mut entry)?;
        stored_names.insert(basename, stored);
    }

    // No verification that the manifest's references match the archive
    // entries; unmatched names are left as-is and dangle until accessed.
    for category in DocCategory::ALL {
        for name in project.documents_mut(category).iter_mut() {
            if let Some(stored) = stored_names.get(name.as_str()) {
                *name = stored.clone();
            }
        }
    }

    info!("Imported bundle: {}", zip_path.display());
    Ok(project)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Expense, JsonStore};
    use std::fs;

    struct Sandbox {
        _dir: tempfile::TempDir,
        store: JsonStore,
        docs: DocumentManager,
        zip_path: std::path::PathBuf,
    }

    fn sandbox() -> Sandbox {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("projetos.json"));
        let docs = DocumentManager::new(dir.path().join("documentos"));
        let zip_path = dir.path().join("projeto.zip");
        Sandbox {
            _dir: dir,
            store,
            docs,
            zip_path,
        }
    }

    fn seeded_project(sb: &Sandbox) -> Project {
        let project = sb.store.add_project("X", "Y", 1000.0).unwrap();
        sb.store
            .add_expense(
                project.id,
                Expense {
                    nome: "E".to_string(),
                    descricao: "D".to_string(),
                    valor: 50.0,
                    nfe: "123".to_string(),
                },
            )
            .unwrap();
        let inbox = sb._dir.path().join("inbox");
        fs::create_dir_all(&inbox).unwrap();
        for (name, category) in [
            ("orcamento.pdf", DocCategory::Orcamentos),
            ("nota.pdf", DocCategory::Nfe),
        ] {
            let source = inbox.join(name);
            fs::write(&source, name.as_bytes()).unwrap();
            sb.docs
                .add_document(&sb.store, project.id, category, &source)
                .unwrap();
        }
        sb.store.get_project(project.id).unwrap()
    }

    #[test]
    fn test_export_import_round_trip() {
        let sb = sandbox();
        let project = seeded_project(&sb);

        export_bundle(&project, &sb.docs, &sb.zip_path).unwrap();

        // Import into a fresh documents directory so no names collide.
        let other = tempfile::tempdir().unwrap();
        let other_docs = DocumentManager::new(other.path().join("documentos"));
        let imported = import_bundle(&other_docs, &sb.zip_path).unwrap();

        assert_ne!(imported.id, project.id);
        assert_eq!(imported.nome, project.nome);
        assert_eq!(imported.responsavel, project.responsavel);
        assert_eq!(imported.valor_financiamento, project.valor_financiamento);
        assert_eq!(imported.data_cadastro, project.data_cadastro);
        assert_eq!(imported.despesas, project.despesas);
        for category in DocCategory::ALL {
            assert_eq!(imported.documents(category), project.documents(category));
            for name in imported.documents(category) {
                assert!(other_docs.resolve(name).exists());
            }
        }
    }

    #[test]
    fn test_import_disambiguates_collisions_and_rewrites_lists() {
        let sb = sandbox();
        let project = seeded_project(&sb);

        export_bundle(&project, &sb.docs, &sb.zip_path).unwrap();

        // Import back into the same documents directory: every document
        // name collides with its own original.
        let imported = import_bundle(&sb.docs, &sb.zip_path).unwrap();

        assert_eq!(imported.orcamentos, vec!["orcamento_1.pdf"]);
        assert_eq!(imported.nfe, vec!["nota_1.pdf"]);
        assert!(sb.docs.resolve("orcamento_1.pdf").exists());
        // Originals untouched.
        assert_eq!(
            fs::read(sb.docs.resolve("orcamento.pdf")).unwrap(),
            b"orcamento.pdf"
        );
    }

    #[test]
    fn test_export_skips_missing_documents() {
        let sb = sandbox();
        let project = seeded_project(&sb);
        fs::remove_file(sb.docs.resolve("nota.pdf")).unwrap();

        export_bundle(&project, &sb.docs, &sb.zip_path).unwrap();

        let other = tempfile::tempdir().unwrap();
        let other_docs = DocumentManager::new(other.path().join("documentos"));
        let imported = import_bundle(&other_docs, &sb.zip_path).unwrap();

        // The reference survives in the manifest but the file was skipped,
        // so it dangles on the importing side.
        assert_eq!(imported.nfe, vec!["nota.pdf"]);
        assert!(!other_docs.resolve("nota.pdf").exists());
        assert!(other_docs.resolve("orcamento.pdf").exists());
    }

    #[test]
    fn test_import_without_manifest_fails() {
        let sb = sandbox();
        let file = File::create(&sb.zip_path).unwrap();
        let mut zip = ZipWriter::new(file);
        zip.start_file("solto.pdf", FileOptions::default()).unwrap();
        zip.write_all(b"x").unwrap();
        zip.finish().unwrap();

        let result = import_bundle(&sb.docs, &sb.zip_path);
        assert!(matches!(
            result,
            Err(ProjetosError::BundleMissingManifest { .. })
        ));
    }

    #[test]
    fn test_import_with_malformed_manifest_fails() {
        let sb = sandbox();
        let file = File::create(&sb.zip_path).unwrap();
        let mut zip = ZipWriter::new(file);
        zip.start_file(MANIFEST_ENTRY, FileOptions::default())
            .unwrap();
        zip.write_all(b"{ not json").unwrap();
        zip.finish().unwrap();

        let result = import_bundle(&sb.docs, &sb.zip_path);
        assert!(matches!(result, Err(ProjetosError::Json(_))));
    }
}
