mod cli_args;
mod commands;
mod output;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use colored::*;
use log;
use std::path::{Path, PathBuf};
use std::process;

use cli_args::{Cli, Commands, OutputOpts, SelectionOpts, WorkspaceOpts};
use fcollect_core::{AppError, JsonFileStore, Session, Settings, WorkspaceFolders};

pub type CliSession = Session<JsonFileStore, WorkspaceFolders>;

const STATE_DIR_NAME: &str = "fcollect";
const STATE_FILE_NAME: &str = "state.json";

fn main() {
    let cli_args = Cli::parse();

    setup_logging(cli_args.quiet, cli_args.verbose);

    let quiet = cli_args.quiet;

    log::debug!("CLI args parsed: {:?}", cli_args);

    let exit_code = match run_app(cli_args, quiet) {
        Ok(_) => {
            log::info!("Application finished successfully.");
            0
        }
        Err(e) => {
            let exit_code = match e.downcast_ref::<AppError>() {
                Some(AppError::CollectionFailed(inner)) => exit_code_for(inner),
                Some(core_err) => exit_code_for(core_err),
                None => 1,
            };
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            exit_code
        }
    };
    log::debug!("Exiting with code {}", exit_code);
    process::exit(exit_code);
}

fn exit_code_for(err: &AppError) -> i32 {
    match err {
        AppError::NoFolderSelected => 1,
        AppError::Config(_) => 1,
        AppError::TomlParse(_) => 1,
        AppError::TomlSerialize(_) => 1,
        AppError::InvalidFilterValue(_) => 5,
        AppError::Glob(_) => 5,
        AppError::OutputMissing(_) => 3,
        AppError::WriteFailed { .. } => 2,
        AppError::Io(_) => 2,
        AppError::FileRead { .. } => 2,
        AppError::StateStore(_) => 2,
        AppError::WalkDir(_) => 2,
        _ => 1,
    }
}

fn setup_logging(quiet: bool, verbose: u8) {
    let log_level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();
    log::trace!("Logger initialized with level: {:?}", log_level);
}

fn run_app(cli: Cli, quiet: bool) -> Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };
    match command {
        Commands::Collect(args) => {
            log::debug!("Executing 'collect' command...");
            commands::collect::handle_collect_command(args, quiet)?;
        }
        Commands::Last(args) => {
            log::debug!("Executing 'last' command...");
            commands::last::handle_last_command(args, quiet)?;
        }
        Commands::Folders(args) => {
            log::debug!("Executing 'folders' command...");
            commands::folders::handle_folders_command(args)?;
        }
        Commands::Filters(args) => {
            log::debug!("Executing 'filters' command...");
            commands::filters::handle_filters_command(args, quiet)?;
        }
        Commands::Clear(args) => {
            log::debug!("Executing 'clear' command...");
            commands::clear::handle_clear_command(args, quiet)?;
        }
        Commands::Open(args) => {
            log::debug!("Executing 'open' command...");
            commands::open::handle_open_command(args)?;
        }
        Commands::Config(args) => {
            log::debug!("Executing 'config' command...");
            commands::config::handle_config_command(args, quiet)?;
        }
        Commands::Menu(args) => {
            log::debug!("Executing 'menu' command...");
            commands::menu::handle_menu_command(args)?;
        }
    }
    Ok(())
}

/// Settings file resolution is relative to the first workspace root.
pub fn load_settings(first_root: &Path, opts: &WorkspaceOpts) -> Result<Settings> {
    let config_path = Settings::resolve_config_path(
        first_root,
        opts.config_file.as_deref(),
        opts.disable_config_file,
    )
    .context("Failed to resolve settings path")?;

    match &config_path {
        Some(path) => Settings::load_from_path(path)
            .with_context(|| format!("Failed to load settings from {}", path.display())),
        None => Ok(Settings::default()),
    }
}

pub fn resolve_state_path(first_root: &Path, opts: &WorkspaceOpts) -> PathBuf {
    if let Some(path) = &opts.state_file {
        return path.clone();
    }
    match dirs::data_local_dir() {
        Some(dir) => dir.join(STATE_DIR_NAME).join(STATE_FILE_NAME),
        None => {
            log::debug!("No user data directory, keeping state inside the workspace.");
            first_root
                .join(fcollect_core::config::DEFAULT_CONFIG_DIR)
                .join(STATE_FILE_NAME)
        }
    }
}

pub fn open_session(opts: &WorkspaceOpts) -> Result<CliSession> {
    let roots = Settings::determine_workspace_roots(&opts.roots)
        .context("Failed to determine workspace roots")?;
    let first_root = roots
        .first()
        .cloned()
        .context("No workspace root available")?;
    log::info!("Workspace roots: {:?}", roots);

    let settings = load_settings(&first_root, opts)?;
    let state_path = resolve_state_path(&first_root, opts);
    log::debug!("Using state file: {}", state_path.display());

    Ok(Session::new(
        JsonFileStore::new(state_path),
        settings,
        WorkspaceFolders::new(roots),
    ))
}

pub fn apply_selection(session: &mut CliSession, selection: &SelectionOpts) -> Result<()> {
    if selection.folders.is_empty() {
        return Ok(());
    }
    let mut folders = Vec::with_capacity(selection.folders.len());
    for folder in &selection.folders {
        let canonical = folder
            .canonicalize()
            .with_context(|| format!("Selected folder not found: {}", folder.display()))?;
        folders.push(canonical);
    }
    session.select_folders(folders)?;
    Ok(())
}

pub fn apply_output(session: &mut CliSession, output: &OutputOpts) -> Result<()> {
    if let Some(name) = &output.output {
        session.change_output_path(name)?;
    }
    if output.no_header {
        session.set_include_header(false);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_kind() {
        assert_eq!(exit_code_for(&AppError::NoFolderSelected), 1);
        assert_eq!(exit_code_for(&AppError::InvalidFilterValue("0".into())), 5);
        assert_eq!(exit_code_for(&AppError::OutputMissing(PathBuf::from("out.txt"))), 3);
        let write_failed = AppError::WriteFailed {
            path: PathBuf::from("out.txt"),
            source: std::io::Error::other("denied"),
        };
        assert_eq!(exit_code_for(&write_failed), 2);
    }
}
