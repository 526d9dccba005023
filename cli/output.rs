use anyhow::{Context, Result};
use byte_unit::{Byte, UnitType};
use colored::*;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};
use fcollect_core::{CollectedFile, CollectionConfig, Notifier, SkippedFile};
use std::io::{self, Write};
use std::path::Path;

/// Prints notifications to the terminal; info is suppressed in quiet mode.
pub struct ConsoleNotifier {
    pub quiet: bool,
}

impl Notifier for ConsoleNotifier {
    fn info(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", "✅".green(), message);
        }
    }

    fn error(&self, message: &str) {
        eprintln!("{} {}", "Error:".red().bold(), message);
    }
}

pub fn print_collected_files(files: &[CollectedFile], first_root: Option<&Path>) {
    if files.is_empty() {
        println!("{}", "(No files collected)".yellow());
        return;
    }
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Name").fg(Color::Green),
        Cell::new("Path").fg(Color::Green),
        Cell::new("Size").fg(Color::Green),
    ]);
    for file in files {
        let shown_path = first_root
            .and_then(|root| pathdiff::diff_paths(&file.path, root))
            .unwrap_or_else(|| file.path.clone());
        let size = match file.size() {
            Some(bytes) => Byte::from_u64(bytes)
                .get_appropriate_unit(UnitType::Binary)
                .to_string(),
            None => "?".to_string(),
        };
        table.add_row(vec![
            Cell::new(&file.display_name).fg(Color::Cyan),
            Cell::new(shown_path.display()),
            Cell::new(size)
                .set_alignment(comfy_table::CellAlignment::Right)
                .fg(Color::DarkGrey),
        ]);
    }
    println!("{table}");
}

pub fn print_skipped_files(skipped: &[SkippedFile], quiet: bool) {
    if skipped.is_empty() || quiet {
        return;
    }
    eprintln!(
        "{}",
        "⚠️ Warning: Some files could not be read and were left out:".yellow()
    );
    for file in skipped {
        eprintln!(" - {} ({})", file.path.display(), file.reason);
    }
}

pub fn print_filters(config: &CollectionConfig) {
    println!("{}", " Last-used Filters ".green().bold().underline());
    println!(
        "{:<20} {}",
        "Extensions:".green(),
        join_or_none(&config.extensions).cyan()
    );
    println!(
        "{:<20} {}",
        "Exclude patterns:".green(),
        join_or_none(&config.exclude_patterns).cyan()
    );
    println!(
        "{:<20} {}",
        "Max file size:".green(),
        format!("{} MB", config.max_file_size_mb).cyan()
    );
}

pub fn print_folders(candidates: &[std::path::PathBuf], selected: &[std::path::PathBuf]) {
    if candidates.is_empty() {
        println!("{}", "(No workspace folders available)".yellow());
        return;
    }
    for folder in candidates {
        let marker = if selected.contains(folder) {
            "[x]".green()
        } else {
            "[ ]".dimmed()
        };
        println!("{} {}", marker, folder.display().to_string().cyan());
    }
}

pub fn write_to_stdout(content: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(content.as_bytes())
        .context("Failed to write to stdout")?;
    if !content.ends_with('\n') {
        handle
            .write_all(b"\n")
            .context("Failed to write newline to stdout")?;
    }
    handle.flush().context("Failed to flush stdout")?;
    Ok(())
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}
