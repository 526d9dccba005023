use crate::error::{AppError, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use log;
use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Finds files named `*.<extension>` under every root, recursively.
///
/// A match is dropped when its path relative to the root it was found under
/// matches any of `exclude_patterns`, when it cannot be stat'ed, or when it is
/// larger than `max_size_bytes`. With no roots, the current directory is
/// scanned. Paths come back in traversal order, each path at most once per call.
pub fn scan(
    extension: &str,
    exclude_patterns: &[String],
    max_size_bytes: u64,
    roots: &[PathBuf],
) -> Result<Vec<PathBuf>> {
    scan_in_workspace(extension, exclude_patterns, max_size_bytes, roots, &[])
}

/// Like [`scan`], but a root nested inside one of `workspace_roots` also has
/// its matches tested relative to that workspace root, so `src/gen/**` still
/// applies when `src` itself is the scanned folder.
pub fn scan_in_workspace(
    extension: &str,
    exclude_patterns: &[String],
    max_size_bytes: u64,
    roots: &[PathBuf],
    workspace_roots: &[PathBuf],
) -> Result<Vec<PathBuf>> {
    let exclude_set = build_exclude_set(exclude_patterns)?;
    let suffix = format!(".{}", extension);

    let implicit_root;
    let roots = if roots.is_empty() {
        implicit_root = [env::current_dir()?];
        log::debug!(
            "No roots given, scanning current directory: {}",
            implicit_root[0].display()
        );
        &implicit_root[..]
    } else {
        roots
    };

    let mut seen = HashSet::<PathBuf>::new();
    let mut matches = Vec::new();

    for root in roots {
        let owner = owning_workspace_root(root, workspace_roots);
        log::debug!("Scanning {} for '*{}'", root.display(), suffix);
        let walker = WalkDir::new(root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter();

        for entry_result in walker {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(e) => {
                    if e.loop_ancestor().is_some() {
                        log::debug!("Skipping symlink loop: {}", e);
                    } else {
                        log::warn!("Error walking directory: {}", e);
                    }
                    continue;
                }
            };
            if entry.file_type().is_dir() {
                continue;
            }

            let path = entry.path();
            let name_matches = path
                .file_name()
                .is_some_and(|name| name.to_string_lossy().ends_with(&suffix));
            if !name_matches {
                continue;
            }

            if is_excluded(path, root, owner, &exclude_set) {
                log::trace!("Excluded by pattern: {}", path.display());
                continue;
            }

            if !within_size_limit(path, max_size_bytes) {
                continue;
            }

            if seen.insert(path.to_path_buf()) {
                log::trace!("Matched: {}", path.display());
                matches.push(path.to_path_buf());
            }
        }
    }

    log::debug!("Extension '{}': {} file(s) matched.", extension, matches.len());
    Ok(matches)
}

/// Only paths below the scan root (or its owning workspace root) are tested;
/// directories above the root never take part in matching.
fn is_excluded(path: &Path, root: &Path, owner: Option<&Path>, exclude_set: &GlobSet) -> bool {
    if exclude_set.is_empty() {
        return false;
    }
    let matches_under =
        |base: &Path| path.strip_prefix(base).is_ok_and(|relative| exclude_set.is_match(relative));
    matches_under(root) || owner.is_some_and(matches_under)
}

/// The deepest workspace root strictly containing `root`.
fn owning_workspace_root<'a>(root: &Path, workspace_roots: &'a [PathBuf]) -> Option<&'a Path> {
    workspace_roots
        .iter()
        .filter(|ws| root != ws.as_path() && root.starts_with(ws))
        .max_by_key(|ws| ws.components().count())
        .map(PathBuf::as_path)
}

fn within_size_limit(path: &Path, max_size_bytes: u64) -> bool {
    match fs::metadata(path) {
        Ok(metadata) if !metadata.is_file() => false,
        Ok(metadata) if metadata.len() > max_size_bytes => {
            log::debug!(
                "Skipping {} ({} bytes exceeds limit of {})",
                path.display(),
                metadata.len(),
                max_size_bytes
            );
            false
        }
        Ok(_) => true,
        Err(e) => {
            let skipped = AppError::ScanReadSkipped {
                path: path.to_path_buf(),
                reason: e.to_string(),
            };
            log::debug!("{}", skipped);
            false
        }
    }
}

/// Blank patterns are ignored. `*` never crosses a `/`.
pub fn build_exclude_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns.iter().map(|p| p.trim()).filter(|p| !p.is_empty()) {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|e| {
                AppError::Glob(format!("Invalid exclude pattern \"{}\": {}", pattern, e))
            })?;
        log::trace!("Adding exclude pattern: {}", pattern);
        builder.add(glob);
    }
    Ok(builder.build()?)
}
