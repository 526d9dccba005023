use crate::collector::{
    CollectedFile, CollectionSummary, Collector, CollectorStatus, OutputTarget, RefreshSignal,
};
use crate::config::{CollectionConfig, FilterUpdate, Settings};
use crate::error::{AppError, Result};
use crate::folders::FolderSource;
use crate::store::{ConfigStore, KeyValueStore};
use crate::writer;
use log;
use std::path::{Path, PathBuf};

/// User-facing messages. Delivery is best effort.
pub trait Notifier {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

/// Reports a finished run the way the menu and one-shot commands both do.
pub fn notify_collection(notifier: &dyn Notifier, outcome: &Result<CollectionSummary>) {
    match outcome {
        Ok(summary) => notifier.info(&summary.message()),
        Err(e) => notifier.error(&e.to_string()),
    }
}

/// One interactive session over a workspace: the live folder selection, the
/// output location and the collector state, backed by a persistent store.
pub struct Session<S: KeyValueStore, F: FolderSource> {
    store: ConfigStore<S>,
    collector: Collector,
    folders: F,
    output: OutputTarget,
}

impl<S: KeyValueStore, F: FolderSource> Session<S, F> {
    /// Starts with every workspace root selected and the output file in the
    /// first root.
    pub fn new(kv: S, settings: Settings, folders: F) -> Self {
        let roots = folders.workspace_roots().to_vec();
        let output_path = match roots.first() {
            Some(root) => root.join(&settings.output_file_name),
            None => PathBuf::from(&settings.output_file_name),
        };
        let output = OutputTarget::new(output_path, settings.include_file_header)
            .with_exclude_from_scan(settings.exclude_output_file);

        let mut store = ConfigStore::new(kv, settings);
        store.set_selected_folders(roots.clone());
        log::debug!("Session output target: {}", output.path.display());

        Self {
            store,
            collector: Collector::new().with_workspace_roots(roots),
            folders,
            output,
        }
    }

    pub fn on_refresh(&mut self, signal: impl RefreshSignal + 'static) {
        self.collector.on_refresh(signal);
    }

    pub fn settings(&self) -> &Settings {
        self.store.settings()
    }

    pub fn status(&self) -> &CollectorStatus {
        self.collector.status()
    }

    pub fn files(&self) -> &[CollectedFile] {
        self.collector.files()
    }

    pub fn workspace_roots(&self) -> &[PathBuf] {
        self.folders.workspace_roots()
    }

    pub fn candidate_folders(&self) -> Vec<PathBuf> {
        self.folders.candidate_folders()
    }

    pub fn selected_folders(&self) -> &[PathBuf] {
        self.store.selected_folders()
    }

    pub fn last_used(&self) -> CollectionConfig {
        self.store.load()
    }

    pub fn output_path(&self) -> &Path {
        &self.output.path
    }

    pub fn set_include_header(&mut self, include_header: bool) {
        self.output.include_header = include_header;
    }

    /// Replaces the live selection. Not persisted until a run succeeds.
    pub fn select_folders(&mut self, paths: Vec<PathBuf>) -> Result<usize> {
        if self.folders.workspace_roots().is_empty() {
            return Err(AppError::Config(
                "No workspace folders available to select from".to_string(),
            ));
        }
        let count = paths.len();
        self.store.set_selected_folders(paths);
        Ok(count)
    }

    /// Applies and persists a filter edit on top of the last-used config.
    pub fn set_filters(&mut self, update: &FilterUpdate) -> Result<CollectionConfig> {
        let mut config = self.store.load();
        update.apply_to(&mut config)?;
        self.store.save(&config)?;
        log::info!("Filters updated: {:?}", config);
        Ok(config)
    }

    /// Collects `extensions` with the last-used excludes and size limit.
    pub fn collect_files(&mut self, extensions: Vec<String>) -> Result<CollectionSummary> {
        let last = self.store.load();
        let config = CollectionConfig {
            extensions,
            exclude_patterns: last.exclude_patterns,
            max_file_size_mb: last.max_file_size_mb,
            selected_folders: Some(self.store.selected_folders().to_vec()),
        };
        self.collector.collect(&config, &self.output, &mut self.store)
    }

    pub fn collect_last_used(&mut self) -> Result<CollectionSummary> {
        self.collector
            .collect_with_last_used(&self.output, &mut self.store)
    }

    /// Forgets the collected list and deletes the output file if present.
    pub fn clear_output(&mut self) -> Result<bool> {
        self.collector.clear_files();
        writer::clear(&self.output.path)
    }

    pub fn open_output(&self) -> Result<&Path> {
        writer::ensure_output_exists(&self.output.path)?;
        Ok(&self.output.path)
    }

    /// Relative names land in the first workspace root.
    pub fn change_output_path(&mut self, file_name: &str) -> Result<&Path> {
        let Some(root) = self.folders.workspace_roots().first() else {
            return Err(AppError::Config(
                "Open a workspace folder before changing the output path".to_string(),
            ));
        };
        let file_name = file_name.trim();
        if file_name.is_empty() {
            return Err(AppError::Config("Output file name cannot be empty".to_string()));
        }
        let candidate = PathBuf::from(file_name);
        self.output.path = if candidate.is_absolute() {
            candidate
        } else {
            root.join(candidate)
        };
        log::info!("Output path changed to {}", self.output.path.display());
        Ok(&self.output.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::folders::WorkspaceFolders;
    use crate::store::MemoryStore;
    use std::cell::RefCell;
    use std::fs;
    use std::rc::Rc;
    use tempfile::TempDir;

    fn session_at(root: &Path) -> Session<MemoryStore, WorkspaceFolders> {
        Session::new(
            MemoryStore::new(),
            Settings::default(),
            WorkspaceFolders::new(vec![root.to_path_buf()]),
        )
    }

    #[derive(Default)]
    struct RecordingNotifier {
        messages: RefCell<Vec<String>>,
    }

    impl Notifier for RecordingNotifier {
        fn info(&self, message: &str) {
            self.messages.borrow_mut().push(format!("info: {}", message));
        }
        fn error(&self, message: &str) {
            self.messages.borrow_mut().push(format!("error: {}", message));
        }
    }

    #[test]
    fn starts_with_all_roots_selected() {
        let dir = TempDir::new().unwrap();
        let session = session_at(dir.path());
        assert_eq!(session.selected_folders(), &[dir.path().to_path_buf()]);
        assert_eq!(session.output_path(), dir.path().join("collected_files.txt"));
    }

    #[test]
    fn collect_files_uses_last_used_filters() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("vendor")).unwrap();
        fs::write(dir.path().join("a.rs"), "a").unwrap();
        fs::write(dir.path().join("vendor").join("b.rs"), "b").unwrap();
        let mut session = session_at(dir.path());
        session
            .set_filters(&FilterUpdate {
                exclude_patterns: Some(vec!["vendor/**".into()]),
                ..FilterUpdate::default()
            })
            .unwrap();

        let summary = session.collect_files(vec!["rs".into()]).unwrap();
        assert_eq!(summary.file_count, 1);
        assert_eq!(session.last_used().extensions, vec!["rs"]);
        assert_eq!(session.last_used().exclude_patterns, vec!["vendor/**"]);
    }

    #[test]
    fn deselecting_everything_blocks_collection() {
        let dir = TempDir::new().unwrap();
        let mut session = session_at(dir.path());
        session.select_folders(Vec::new()).unwrap();
        let outcome = session.collect_last_used();
        assert!(matches!(outcome, Err(AppError::NoFolderSelected)));

        let notifier = RecordingNotifier::default();
        notify_collection(&notifier, &outcome);
        assert_eq!(notifier.messages.borrow().len(), 1);
        assert!(notifier.messages.borrow()[0].starts_with("error: No folder selected"));
    }

    #[test]
    fn clear_and_open_output() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        let mut session = session_at(dir.path());
        assert!(matches!(session.open_output(), Err(AppError::OutputMissing(_))));

        session.collect_files(vec!["txt".into()]).unwrap();
        assert_eq!(session.files().len(), 1);
        assert!(session.open_output().is_ok());

        assert!(session.clear_output().unwrap());
        assert!(session.files().is_empty());
        assert!(!session.clear_output().unwrap());
    }

    #[test]
    fn exclude_output_file_setting_keeps_previous_output_out() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::write(dir.path().join("collected_files.txt"), "old").unwrap();
        let settings = Settings {
            exclude_output_file: true,
            ..Settings::default()
        };
        let mut session = Session::new(
            MemoryStore::new(),
            settings,
            WorkspaceFolders::new(vec![dir.path().to_path_buf()]),
        );

        let summary = session.collect_files(vec!["txt".into()]).unwrap();
        assert_eq!(summary.file_count, 1);
        assert_eq!(session.files()[0].display_name, "a.txt");
    }

    #[test]
    fn change_output_path_joins_first_root() {
        let dir = TempDir::new().unwrap();
        let mut session = session_at(dir.path());
        let path = session.change_output_path(" bundle.txt ").unwrap().to_path_buf();
        assert_eq!(path, dir.path().join("bundle.txt"));
        assert!(session.change_output_path("  ").is_err());
    }

    #[test]
    fn change_output_path_needs_a_workspace() {
        let mut session = Session::new(
            MemoryStore::new(),
            Settings::default(),
            WorkspaceFolders::new(Vec::new()),
        );
        assert!(session.change_output_path("out.txt").is_err());
        assert!(session.select_folders(vec![PathBuf::from("/x")]).is_err());
    }

    #[test]
    fn refresh_fires_on_clear() {
        let dir = TempDir::new().unwrap();
        let mut session = session_at(dir.path());
        let events = Rc::new(RefCell::new(0));
        let sink = events.clone();
        session.on_refresh(move || *sink.borrow_mut() += 1);
        session.clear_output().unwrap();
        assert_eq!(*events.borrow(), 1);
    }
}
