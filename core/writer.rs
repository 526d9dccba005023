use crate::error::{AppError, Result};
use log;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A file left out of the output because it could not be read as text.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteReport {
    pub written: usize,
    pub skipped: Vec<SkippedFile>,
}

/// Concatenates `paths` into `output_path`, overwriting it.
///
/// Unreadable files are left out and reported in [`WriteReport::skipped`];
/// only a failure to write the output itself is an error.
pub fn write(paths: &[PathBuf], output_path: &Path, include_header: bool) -> Result<WriteReport> {
    let mut report = WriteReport::default();
    let mut buffer = String::new();

    for path in paths {
        let content = match read_text(path) {
            Ok(content) => content,
            Err(reason) => {
                let skipped = AppError::ScanReadSkipped {
                    path: path.clone(),
                    reason: reason.clone(),
                };
                log::warn!("{}", skipped);
                report.skipped.push(SkippedFile {
                    path: path.clone(),
                    reason,
                });
                continue;
            }
        };
        if include_header {
            buffer.push_str(&header_line(path));
            buffer.push_str("\n\n");
        }
        buffer.push_str(&content);
        buffer.push_str("\n\n");
        report.written += 1;
    }

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| AppError::WriteFailed {
            path: output_path.to_path_buf(),
            source: e,
        })?;
    }
    fs::write(output_path, buffer.as_bytes()).map_err(|e| AppError::WriteFailed {
        path: output_path.to_path_buf(),
        source: e,
    })?;

    log::info!(
        "Wrote {} file(s) to {} ({} skipped)",
        report.written,
        output_path.display(),
        report.skipped.len()
    );
    Ok(report)
}

/// Deletes the output. Returns `false` when there was nothing to delete.
pub fn clear(output_path: &Path) -> Result<bool> {
    match fs::remove_file(output_path) {
        Ok(()) => {
            log::info!("Removed output file {}", output_path.display());
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::debug!("No output file to remove at {}", output_path.display());
            Ok(false)
        }
        Err(e) => Err(AppError::Io(e)),
    }
}

/// Fails with [`AppError::OutputMissing`] unless the output exists as a file.
pub fn ensure_output_exists(output_path: &Path) -> Result<()> {
    if output_path.is_file() {
        Ok(())
    } else {
        Err(AppError::OutputMissing(output_path.to_path_buf()))
    }
}

pub fn read_output(output_path: &Path) -> Result<String> {
    ensure_output_exists(output_path)?;
    fs::read_to_string(output_path).map_err(|e| AppError::FileRead {
        path: output_path.to_path_buf(),
        source: e,
    })
}

fn header_line(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    format!("=== {} ===", name)
}

fn read_text(path: &Path) -> std::result::Result<String, String> {
    let bytes = fs::read(path).map_err(|e| e.to_string())?;
    String::from_utf8(bytes).map_err(|e| format!("not valid UTF-8 ({})", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn header_blocks_in_input_order() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("sub").join("b.txt");
        fs::create_dir_all(b.parent().unwrap()).unwrap();
        fs::write(&a, "alpha").unwrap();
        fs::write(&b, "beta").unwrap();
        let out = dir.path().join("out.txt");

        let report = write(&[b.clone(), a.clone()], &out, true).unwrap();
        assert_eq!(report.written, 2);
        assert!(report.skipped.is_empty());
        assert_eq!(
            fs::read_to_string(&out).unwrap(),
            "=== b.txt ===\n\nbeta\n\n=== a.txt ===\n\nalpha\n\n"
        );
    }

    #[test]
    fn without_header_only_content() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.txt");
        fs::write(&a, "alpha").unwrap();
        let out = dir.path().join("out.txt");

        write(&[a], &out, false).unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap(), "alpha\n\n");
    }

    #[test]
    fn unreadable_files_are_reported_not_fatal() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.txt");
        let binary = dir.path().join("blob.txt");
        let missing = dir.path().join("gone.txt");
        fs::write(&good, "ok").unwrap();
        fs::write(&binary, [0xff, 0xfe, 0x00]).unwrap();
        let out = dir.path().join("out.txt");

        let report = write(&[missing.clone(), good, binary.clone()], &out, true).unwrap();
        assert_eq!(report.written, 1);
        let skipped: Vec<_> = report.skipped.iter().map(|s| s.path.clone()).collect();
        assert_eq!(skipped, vec![missing, binary]);
        assert_eq!(fs::read_to_string(&out).unwrap(), "=== good.txt ===\n\nok\n\n");
    }

    #[test]
    fn repeated_writes_are_byte_identical() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.rs");
        fs::write(&a, "fn main() {}\n").unwrap();
        let out = dir.path().join("out.txt");

        write(&[a.clone()], &out, true).unwrap();
        let first = fs::read(&out).unwrap();
        write(&[a], &out, true).unwrap();
        assert_eq!(first, fs::read(&out).unwrap());
    }

    #[test]
    fn overwrites_previous_output() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out.txt");
        fs::write(&out, "stale content that is long").unwrap();

        write(&[], &out, true).unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap(), "");
    }

    #[test]
    fn unwritable_output_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "").unwrap();
        let out = blocker.join("out.txt");

        assert!(matches!(
            write(&[], &out, true),
            Err(AppError::WriteFailed { .. })
        ));
    }

    #[test]
    fn clear_is_a_no_op_without_file() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out.txt");
        assert!(!clear(&out).unwrap());
        assert!(!out.exists());

        fs::write(&out, "x").unwrap();
        assert!(clear(&out).unwrap());
        assert!(!out.exists());
    }

    #[test]
    fn reading_missing_output_fails() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out.txt");
        assert!(matches!(read_output(&out), Err(AppError::OutputMissing(_))));
        fs::write(&out, "done").unwrap();
        assert_eq!(read_output(&out).unwrap(), "done");
    }
}
