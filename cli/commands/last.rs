use crate::cli_args::LastArgs;
use crate::output::{self, ConsoleNotifier};
use crate::{apply_output, apply_selection, open_session};
use anyhow::{Context, Result};
use fcollect_core::Notifier;

pub fn handle_last_command(args: LastArgs, quiet: bool) -> Result<()> {
    let mut session = open_session(&args.workspace)?;
    apply_selection(&mut session, &args.selection)?;
    apply_output(&mut session, &args.output)?;

    let summary = session
        .collect_last_used()
        .context("Failed to collect with last-used settings")?;

    if !quiet {
        output::print_collected_files(
            session.files(),
            session.workspace_roots().first().map(|p| p.as_path()),
        );
    }
    output::print_skipped_files(&summary.skipped, quiet);
    ConsoleNotifier { quiet }.info(&format!(
        "{} → {}",
        summary.message(),
        summary.output_path.display()
    ));
    Ok(())
}
