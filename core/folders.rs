use log;
use std::fs;
use std::path::{Path, PathBuf};

/// Supplies the folders a user may pick as scan roots.
pub trait FolderSource {
    fn workspace_roots(&self) -> &[PathBuf];
    fn candidate_folders(&self) -> Vec<PathBuf>;
}

#[derive(Debug, Clone)]
pub struct WorkspaceFolders {
    roots: Vec<PathBuf>,
}

impl WorkspaceFolders {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    pub fn first_root(&self) -> Option<&Path> {
        self.roots.first().map(PathBuf::as_path)
    }
}

impl FolderSource for WorkspaceFolders {
    fn workspace_roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Every root, then each root's visible top-level directories by name.
    fn candidate_folders(&self) -> Vec<PathBuf> {
        let mut candidates = self.roots.clone();
        for root in &self.roots {
            let entries = match fs::read_dir(root) {
                Ok(entries) => entries,
                Err(e) => {
                    log::warn!("Cannot list folders in {}: {}", root.display(), e);
                    continue;
                }
            };
            let mut children: Vec<PathBuf> = entries
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_ok_and(|ft| ft.is_dir()))
                .filter(|entry| !entry.file_name().to_string_lossy().starts_with('.'))
                .map(|entry| entry.path())
                .collect();
            children.sort();
            for child in children {
                if !candidates.contains(&child) {
                    candidates.push(child);
                }
            }
        }
        candidates
    }
}
