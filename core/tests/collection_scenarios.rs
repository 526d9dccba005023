use fcollect_core::{
    AppError, CollectionConfig, Collector, ConfigStore, JsonFileStore, MemoryStore, OutputTarget,
    Session, Settings, WorkspaceFolders,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

fn write_bytes(root: &Path, relative: &str, len: usize) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "a".repeat(len)).unwrap();
}

fn project() -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let root = dir.path().join("proj");
    fs::create_dir_all(&root).unwrap();
    (dir, root)
}

#[test]
fn skip_folder_and_oversized_files_are_left_out() {
    let (_dir, root) = project();
    write_bytes(&root, "a.txt", 10);
    write_bytes(&root, "skip/b.txt", 10);
    write_bytes(&root, "big.txt", 2 * 1024 * 1024);

    let config = CollectionConfig::new(vec!["txt".into()], vec![root.clone()])
        .with_exclude_patterns(vec!["**/skip/**".into()])
        .with_max_file_size_mb(1.0);
    let output = OutputTarget::new(root.join("collected_files.txt"), true);
    let mut store = ConfigStore::new(MemoryStore::new(), Settings::default());
    let mut collector = Collector::new();

    let summary = collector.collect(&config, &output, &mut store).unwrap();

    assert_eq!(summary.file_count, 1);
    let names: Vec<_> = collector
        .files()
        .iter()
        .map(|f| f.display_name.as_str())
        .collect();
    assert_eq!(names, vec!["a.txt"]);

    let content = fs::read_to_string(&output.path).unwrap();
    assert_eq!(content.matches("=== ").count(), 1);
    assert_eq!(content, format!("=== a.txt ===\n\n{}\n\n", "a".repeat(10)));
}

#[test]
fn empty_selection_leaves_output_and_state_alone() {
    let (dir, root) = project();
    write_bytes(&root, "a.txt", 3);
    let output_path = root.join("collected_files.txt");
    fs::write(&output_path, "previous run").unwrap();
    let state_path = dir.path().join("state.json");

    let mut store = ConfigStore::new(JsonFileStore::new(&state_path), Settings::default());
    let config = CollectionConfig::new(vec!["txt".into()], Vec::new());
    let err = Collector::new()
        .collect(&config, &OutputTarget::new(&output_path, true), &mut store)
        .unwrap_err();

    assert!(matches!(err, AppError::NoFolderSelected));
    assert_eq!(fs::read_to_string(&output_path).unwrap(), "previous run");
    assert!(!state_path.exists());
}

#[test]
fn file_count_matches_every_extension_hit() {
    let (_dir, root) = project();
    write_bytes(&root, "lib.rs", 4);
    write_bytes(&root, "src/main.rs", 4);
    write_bytes(&root, "Cargo.toml", 4);
    write_bytes(&root, "notes.md", 4);

    let config = CollectionConfig::new(vec!["toml".into(), "rs".into()], vec![root.clone()]);
    let output = OutputTarget::new(root.join("out.txt"), false);
    let mut store = ConfigStore::new(MemoryStore::new(), Settings::default());
    let mut collector = Collector::new();

    let summary = collector.collect(&config, &output, &mut store).unwrap();

    assert_eq!(summary.file_count, 3);
    assert_eq!(summary.written, 3);
    let order: Vec<_> = collector
        .files()
        .iter()
        .map(|f| f.display_name.clone())
        .collect();
    assert_eq!(order, vec!["Cargo.toml", "lib.rs", "main.rs"]);
}

#[test]
fn last_used_run_reproduces_file_set_after_restart() {
    let (dir, root) = project();
    write_bytes(&root, "index.ts", 5);
    write_bytes(&root, "src/app.ts", 5);
    write_bytes(&root, "src/app.js", 5);
    let state_path = dir.path().join("state").join("state.json");

    let first_files: Vec<PathBuf> = {
        let mut session = Session::new(
            JsonFileStore::new(&state_path),
            Settings::default(),
            WorkspaceFolders::new(vec![root.clone()]),
        );
        session.collect_files(vec!["ts".into()]).unwrap();
        session.files().iter().map(|f| f.path.clone()).collect()
    };
    let first_output = fs::read(root.join("collected_files.txt")).unwrap();

    let mut session = Session::new(
        JsonFileStore::new(&state_path),
        Settings::default(),
        WorkspaceFolders::new(vec![root.clone()]),
    );
    assert_eq!(session.last_used().extensions, vec!["ts"]);
    let summary = session.collect_last_used().unwrap();

    let second_files: Vec<PathBuf> = session.files().iter().map(|f| f.path.clone()).collect();
    assert_eq!(summary.file_count, 2);
    assert_eq!(first_files, second_files);
    assert_eq!(first_output, fs::read(root.join("collected_files.txt")).unwrap());
}

#[test]
fn clearing_missing_output_is_quiet() {
    let (_dir, root) = project();
    let mut session = Session::new(
        MemoryStore::new(),
        Settings::default(),
        WorkspaceFolders::new(vec![root.clone()]),
    );
    assert!(!session.clear_output().unwrap());
    assert!(!root.join("collected_files.txt").exists());
}
