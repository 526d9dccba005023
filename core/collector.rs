use crate::config::CollectionConfig;
use crate::error::{AppError, Result};
use crate::scanner;
use crate::store::{ConfigStore, KeyValueStore};
use crate::writer::{self, SkippedFile};
use log;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum CollectorStatus {
    #[default]
    Idle,
    Running,
    Failed(String),
}

impl CollectorStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, CollectorStatus::Running)
    }
}

impl fmt::Display for CollectorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectorStatus::Idle => write!(f, "idle"),
            CollectorStatus::Running => write!(f, "collecting"),
            CollectorStatus::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Emitted whenever the visible state (status, file list) changes.
pub trait RefreshSignal {
    fn refresh(&self);
}

impl<F: Fn()> RefreshSignal for F {
    fn refresh(&self) {
        self()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectedFile {
    pub path: PathBuf,
    pub display_name: String,
}

impl CollectedFile {
    pub fn new(path: PathBuf) -> Self {
        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, display_name }
    }

    /// Read on demand; the file may have changed since it was collected.
    pub fn size(&self) -> Option<u64> {
        fs::metadata(&self.path).ok().map(|m| m.len())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputTarget {
    pub path: PathBuf,
    pub include_header: bool,
    pub exclude_from_scan: bool,
}

impl OutputTarget {
    pub fn new(path: impl Into<PathBuf>, include_header: bool) -> Self {
        Self {
            path: path.into(),
            include_header,
            exclude_from_scan: false,
        }
    }

    pub fn with_exclude_from_scan(mut self, exclude: bool) -> Self {
        self.exclude_from_scan = exclude;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionSummary {
    pub file_count: usize,
    pub extensions: Vec<String>,
    pub written: usize,
    pub skipped: Vec<SkippedFile>,
    pub output_path: PathBuf,
}

impl CollectionSummary {
    pub fn message(&self) -> String {
        let mut msg = format!(
            "Collected {} file(s) (extensions: {})",
            self.file_count,
            self.extensions.join(", ")
        );
        if !self.skipped.is_empty() {
            msg.push_str(&format!(", {} unreadable file(s) skipped", self.skipped.len()));
        }
        msg
    }
}

#[derive(Default)]
pub struct Collector {
    status: CollectorStatus,
    files: Vec<CollectedFile>,
    listeners: Vec<Box<dyn RefreshSignal>>,
    workspace_roots: Vec<PathBuf>,
}

impl Collector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclude patterns are also matched relative to the workspace root that
    /// owns a selected folder.
    pub fn with_workspace_roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.workspace_roots = roots;
        self
    }

    pub fn on_refresh(&mut self, signal: impl RefreshSignal + 'static) {
        self.listeners.push(Box::new(signal));
    }

    pub fn status(&self) -> &CollectorStatus {
        &self.status
    }

    pub fn files(&self) -> &[CollectedFile] {
        &self.files
    }

    pub fn clear_files(&mut self) {
        self.files.clear();
        self.emit_refresh();
    }

    /// Runs one collection with `config` and makes it the new last-used config.
    ///
    /// Precondition failures return before any filesystem access and leave
    /// the status untouched. Scanner and writer failures come back as
    /// [`AppError::CollectionFailed`] and nothing is persisted.
    pub fn collect<S: KeyValueStore>(
        &mut self,
        config: &CollectionConfig,
        output: &OutputTarget,
        store: &mut ConfigStore<S>,
    ) -> Result<CollectionSummary> {
        if config.folders().is_empty() {
            return Err(AppError::NoFolderSelected);
        }
        config.validate()?;

        self.set_status(CollectorStatus::Running);
        log::info!(
            "Collecting extensions [{}] from {} folder(s)",
            config.extensions.join(", "),
            config.folders().len()
        );

        match self.run(config, output) {
            Ok(summary) => {
                if let Err(e) = store.save(config) {
                    log::warn!("Collection succeeded but last-used config was not saved: {}", e);
                }
                log::info!("{}", summary.message());
                self.set_status(CollectorStatus::Idle);
                Ok(summary)
            }
            Err(e) => {
                let failure = e.into_collection_failure();
                log::error!("{}", failure);
                self.set_status(CollectorStatus::Failed(failure.to_string()));
                Err(failure)
            }
        }
    }

    /// Repeats the last-used config against the live folder selection.
    pub fn collect_with_last_used<S: KeyValueStore>(
        &mut self,
        output: &OutputTarget,
        store: &mut ConfigStore<S>,
    ) -> Result<CollectionSummary> {
        let mut config = store.load();
        config.selected_folders = Some(store.selected_folders().to_vec());
        self.collect(&config, output, store)
    }

    fn run(&mut self, config: &CollectionConfig, output: &OutputTarget) -> Result<CollectionSummary> {
        let max_size_bytes = config.max_file_size_bytes();
        let output_canonical = output.path.canonicalize().ok();

        let mut all_files = Vec::<PathBuf>::new();
        for extension in &config.extensions {
            let found = scanner::scan_in_workspace(
                extension,
                &config.exclude_patterns,
                max_size_bytes,
                config.folders(),
                &self.workspace_roots,
            )?;
            if output.exclude_from_scan {
                all_files.extend(
                    found
                        .into_iter()
                        .filter(|p| !is_output(p, &output.path, output_canonical.as_deref())),
                );
            } else {
                all_files.extend(found);
            }
        }

        self.files = all_files.iter().cloned().map(CollectedFile::new).collect();

        let report = writer::write(&all_files, &output.path, output.include_header)?;

        Ok(CollectionSummary {
            file_count: all_files.len(),
            extensions: config.extensions.clone(),
            written: report.written,
            skipped: report.skipped,
            output_path: output.path.clone(),
        })
    }

    fn set_status(&mut self, status: CollectorStatus) {
        log::debug!("Collector status: {} -> {}", self.status, status);
        self.status = status;
        self.emit_refresh();
    }

    fn emit_refresh(&self) {
        for listener in &self.listeners {
            listener.refresh();
        }
    }
}

fn is_output(path: &Path, output: &Path, output_canonical: Option<&Path>) -> bool {
    path == output || output_canonical.is_some_and(|c| c == path)
}
