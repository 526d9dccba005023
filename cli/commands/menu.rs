use crate::cli_args::MenuArgs;
use crate::output::{self, ConsoleNotifier};
use crate::{CliSession, open_session};
use anyhow::{Context, Result};
use colored::*;
use dialoguer::{Input, MultiSelect, Select};
use fcollect_core::{
    FilterUpdate, Notifier, notify_collection, parse_extensions, parse_list, parse_max_size_mb,
    writer,
};
use log;
use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy)]
enum MenuAction {
    Collect,
    CollectLastUsed,
    SelectFolders,
    SetFilters,
    OpenOutput,
    ClearOutput,
    ChangeOutputPath,
    Quit,
}

const MENU_ITEMS: &[(MenuAction, &str)] = &[
    (MenuAction::Collect, "Collect files (by extension)"),
    (MenuAction::CollectLastUsed, "Collect with last-used settings"),
    (MenuAction::SelectFolders, "Select folders"),
    (MenuAction::SetFilters, "Set file filters"),
    (MenuAction::OpenOutput, "Open output file"),
    (MenuAction::ClearOutput, "Clear output"),
    (MenuAction::ChangeOutputPath, "Change output path"),
    (MenuAction::Quit, "Quit"),
];

pub fn handle_menu_command(args: MenuArgs) -> Result<()> {
    let mut session = open_session(&args.workspace)?;
    let notifier = ConsoleNotifier { quiet: false };

    let needs_render = Rc::new(Cell::new(false));
    let flag = needs_render.clone();
    session.on_refresh(move || flag.set(true));

    let labels: Vec<&str> = MENU_ITEMS.iter().map(|(_, label)| *label).collect();
    loop {
        if needs_render.replace(false) && !session.status().is_running() {
            output::print_collected_files(
                session.files(),
                session.workspace_roots().first().map(|p| p.as_path()),
            );
        }
        print_status_line(&session);

        let choice = Select::new()
            .with_prompt("Choose a file collection action")
            .items(&labels)
            .default(0)
            .interact_opt()
            .context("Menu selection failed")?;
        let Some(index) = choice else {
            break;
        };
        let action = MENU_ITEMS[index].0;
        log::debug!("Menu action selected: {:?}", action);

        let outcome = match action {
            MenuAction::Collect => collect_files(&mut session, &notifier),
            MenuAction::CollectLastUsed => {
                notify_collection(&notifier, &session.collect_last_used());
                Ok(())
            }
            MenuAction::SelectFolders => select_folders(&mut session, &notifier),
            MenuAction::SetFilters => set_filters(&mut session, &notifier),
            MenuAction::OpenOutput => open_output(&session),
            MenuAction::ClearOutput => clear_output(&mut session, &notifier),
            MenuAction::ChangeOutputPath => change_output_path(&mut session, &notifier),
            MenuAction::Quit => break,
        };
        if let Err(e) = outcome {
            notifier.error(&format!("{:#}", e));
        }
    }
    Ok(())
}

fn print_status_line(session: &CliSession) {
    let last_used = session.last_used();
    let last_extensions = if last_used.extensions.is_empty() {
        "(none)".to_string()
    } else {
        last_used.extensions.join(", ")
    };
    println!(
        "\n{} {} | {} {} | {} {} | {} {}",
        "Status:".green(),
        session.status().to_string().cyan(),
        "Folders:".green(),
        session.selected_folders().len().to_string().cyan(),
        "Last used:".green(),
        last_extensions.cyan(),
        "Output:".green(),
        session.output_path().display().to_string().blue()
    );
}

fn collect_files(session: &mut CliSession, notifier: &ConsoleNotifier) -> Result<()> {
    let defaults = session.settings().default_extensions.join(",");
    let input: String = Input::new()
        .with_prompt("Extensions to collect (comma separated, e.g. js,ts,txt)")
        .with_initial_text(defaults)
        .allow_empty(true)
        .interact_text()
        .context("Failed to read extensions")?;
    let extensions = parse_extensions(&input);
    if extensions.is_empty() {
        notifier.info("No extensions entered, nothing collected.");
        return Ok(());
    }
    notify_collection(notifier, &session.collect_files(extensions));
    Ok(())
}

fn select_folders(session: &mut CliSession, notifier: &ConsoleNotifier) -> Result<()> {
    let candidates = session.candidate_folders();
    if candidates.is_empty() {
        notifier.error("No workspace folders available");
        return Ok(());
    }
    let labels: Vec<String> = candidates
        .iter()
        .map(|p| {
            let name = p
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            format!("{}  {}", name, p.display().to_string().dimmed())
        })
        .collect();
    let picked: Vec<bool> = candidates
        .iter()
        .map(|p| session.selected_folders().contains(p))
        .collect();

    let chosen = MultiSelect::new()
        .with_prompt("Select folders to collect from (space to toggle)")
        .items(&labels)
        .defaults(&picked)
        .interact_opt()
        .context("Folder selection failed")?;
    if let Some(indices) = chosen {
        let folders = indices.into_iter().map(|i| candidates[i].clone()).collect();
        let count = session.select_folders(folders)?;
        notifier.info(&format!("Selected {} folder(s)", count));
    }
    Ok(())
}

fn set_filters(session: &mut CliSession, notifier: &ConsoleNotifier) -> Result<()> {
    let current = session.last_used();
    let extensions: String = Input::new()
        .with_prompt("Extensions to collect (comma separated, e.g. js,ts,txt)")
        .with_initial_text(current.extensions.join(","))
        .allow_empty(true)
        .interact_text()
        .context("Failed to read extensions")?;
    let excludes: String = Input::new()
        .with_prompt("Exclude patterns (comma separated, e.g. **/node_modules/**,**/.git/**)")
        .with_initial_text(current.exclude_patterns.join(","))
        .allow_empty(true)
        .interact_text()
        .context("Failed to read exclude patterns")?;
    let max_size: String = Input::new()
        .with_prompt("Maximum file size (MB)")
        .with_initial_text(current.max_file_size_mb.to_string())
        .validate_with(|input: &String| -> Result<(), String> {
            parse_max_size_mb(input)
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()
        .context("Failed to read maximum file size")?;

    let update = FilterUpdate {
        extensions: Some(parse_extensions(&extensions)),
        exclude_patterns: Some(parse_list(&excludes)),
        max_file_size_mb: Some(parse_max_size_mb(&max_size)?),
    };
    session.set_filters(&update)?;
    notifier.info("Filters saved.");
    Ok(())
}

fn open_output(session: &CliSession) -> Result<()> {
    let path = session.open_output()?;
    let content = writer::read_output(path)?;
    println!("{}", format!("--- {} ---", path.display()).green().bold());
    output::write_to_stdout(&content)
}

fn clear_output(session: &mut CliSession, notifier: &ConsoleNotifier) -> Result<()> {
    if session.clear_output()? {
        notifier.info("Output file removed.");
    } else {
        notifier.info("Nothing to clear.");
    }
    Ok(())
}

fn change_output_path(session: &mut CliSession, notifier: &ConsoleNotifier) -> Result<()> {
    let current = session
        .output_path()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name: String = Input::new()
        .with_prompt("New output file name (e.g. output.txt)")
        .with_initial_text(current)
        .interact_text()
        .context("Failed to read output file name")?;
    let path = session.change_output_path(&name)?;
    notifier.info(&format!("Output path changed to: {}", path.display()));
    Ok(())
}
