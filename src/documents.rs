//! Document File Management
//!
//! Copies supporting documents into a flat directory addressed by
//! basename, disambiguating collisions with a `_<n>` suffix, and keeps
//! the owning project's category list in step with the files on disk.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use log::info;
use uuid::Uuid;
use walkdir::WalkDir;

use crate::error::{ProjetosError, Result};
use crate::store::{DocCategory, JsonStore};

/// Storage usage statistics for the documents directory.
#[derive(Debug, Clone)]
pub struct StorageUsage {
    /// Number of stored files.
    pub file_count: usize,
    /// Total size in bytes.
    pub total_size_bytes: u64,
    /// Total size in megabytes.
    pub total_size_mb: f64,
}

/// Manages the flat documents directory shared by all projects.
#[derive(Debug, Clone)]
pub struct DocumentManager {
    docs_dir: PathBuf,
}

impl DocumentManager {
    pub fn new<P: AsRef<Path>>(docs_dir: P) -> Self {
        Self {
            docs_dir: docs_dir.as_ref().to_path_buf(),
        }
    }

    pub fn docs_dir(&self) -> &Path {
        &self.docs_dir
    }

    /// Join a stored basename with the documents directory. Does not
    /// verify existence; callers check before use.
    pub fn resolve(&self, stored_name: &str) -> PathBuf {
        self.docs_dir.join(stored_name)
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.docs_dir.exists() {
            fs::create_dir_all(&self.docs_dir).map_err(|e| ProjetosError::DirectoryCreate {
                path: self.docs_dir.clone(),
                source: e,
            })?;
        }
        Ok(())
    }

    /// Pick a basename that does not collide with an existing file:
    /// the original name if free, otherwise `stem_<n>.ext` with the
    /// smallest positive `n` producing a non-existing path.
    pub fn disambiguate(&self, basename: &str) -> String {
        if !self.resolve(basename).exists() {
            return basename.to_string();
        }
        let name = Path::new(basename);
        let stem = name
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| basename.to_string());
        let ext = name.extension().map(|e| e.to_string_lossy().into_owned());

        let mut n = 1;
        loop {
            let candidate = match &ext {
                Some(ext) => format!("{}_{}.{}", stem, n, ext),
                None => format!("{}_{}", stem, n),
            };
            if !self.resolve(&candidate).exists() {
                return candidate;
            }
            n += 1;
        }
    }

    /// Copy a file into the documents directory under a collision-free
    /// name, returning the stored basename.
    pub fn store_file(&self, source: &Path) -> Result<String> {
        if !source.exists() {
            return Err(ProjetosError::DocumentNotFound {
                path: source.to_path_buf(),
            });
        }
        let basename = source
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .ok_or_else(|| ProjetosError::DocumentNotFound {
                path: source.to_path_buf(),
            })?;

        self.ensure_dir()?;
        let stored = self.disambiguate(&basename);
        let dest = self.resolve(&stored);
        fs::copy(source, &dest).map_err(|e| ProjetosError::FileWrite {
            path: dest,
            source: e,
        })?;
        Ok(stored)
    }

    /// Write reader contents into the documents directory under a
    /// collision-free name, returning the stored basename. Used by bundle
    /// import, where the source is an archive entry rather than a file.
    pub fn store_reader<R: Read>(&self, basename: &str, reader: &mut R) -> Result<String> {
        self.ensure_dir()?;
        let stored = self.disambiguate(basename);
        let dest = self.resolve(&stored);
        let mut file = fs::File::create(&dest).map_err(|e| ProjetosError::FileWrite {
            path: dest.clone(),
            source: e,
        })?;
        std::io::copy(reader, &mut file).map_err(|e| ProjetosError::FileWrite {
            path: dest,
            source: e,
        })?;
        Ok(stored)
    }

    /// Copy a source file into the documents directory and record it in
    /// the project's category list. Returns the stored basename.
    pub fn add_document(
        &self,
        store: &JsonStore,
        id: Uuid,
        category: DocCategory,
        source: &Path,
    ) -> Result<String> {
        // Locate the project before copying anything so a bad id does not
        // leave a stray file behind.
        let mut data = store.load()?;
        data.project_mut(id)?;

        let stored = self.store_file(source)?;
        data.project_mut(id)?
            .documents_mut(category)
            .push(stored.clone());
        store.save(&data)?;

        info!("Stored {} under {}", stored, category);
        Ok(stored)
    }

    /// Delete a stored document and drop it from the project's category
    /// list. A file already gone from disk is skipped, but the list entry
    /// is removed regardless.
    pub fn remove_document(
        &self,
        store: &JsonStore,
        id: Uuid,
        category: DocCategory,
        stored_name: &str,
    ) -> Result<()> {
        let mut data = store.load()?;
        let project = data.project_mut(id)?;

        let path = self.resolve(stored_name);
        if path.exists() {
            fs::remove_file(&path).map_err(|e| ProjetosError::FileWrite { path, source: e })?;
        }

        project.documents_mut(category).retain(|f| f != stored_name);
        store.save(&data)?;

        info!("Removed {} from {}", stored_name, category);
        Ok(())
    }

    /// Open a stored document with the platform's default application.
    pub fn open_document(&self, stored_name: &str) -> Result<()> {
        let path = self.resolve(stored_name);
        if !path.exists() {
            return Err(ProjetosError::DocumentNotFound { path });
        }
        open::that(&path)?;
        Ok(())
    }

    /// Calculate current storage usage for the documents directory.
    pub fn usage(&self) -> Result<StorageUsage> {
        let mut file_count = 0;
        let mut total_size_bytes: u64 = 0;

        if self.docs_dir.exists() {
            for entry in WalkDir::new(&self.docs_dir) {
                let entry = entry.map_err(|e| ProjetosError::Io(e.into()))?;
                if entry.file_type().is_file() {
                    file_count += 1;
                    total_size_bytes += entry.metadata().map(|m| m.len()).unwrap_or(0);
                }
            }
        }

        Ok(StorageUsage {
            file_count,
            total_size_bytes,
            total_size_mb: total_size_bytes as f64 / (1024.0 * 1024.0),
        })
    }
}
