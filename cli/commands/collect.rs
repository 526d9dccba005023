use crate::cli_args::CollectArgs;
use crate::output::{self, ConsoleNotifier};
use crate::{apply_output, apply_selection, open_session};
use anyhow::{Context, Result};
use fcollect_core::{Notifier, parse_extensions};
use log;

pub fn handle_collect_command(args: CollectArgs, quiet: bool) -> Result<()> {
    let mut session = open_session(&args.workspace)?;
    apply_selection(&mut session, &args.selection)?;
    apply_output(&mut session, &args.output)?;

    let extensions = if args.extensions.is_empty() {
        log::debug!("No extensions given, using settings defaults.");
        session.settings().default_extensions.clone()
    } else {
        parse_extensions(&args.extensions.join(","))
    };
    log::info!("Extensions to collect: {:?}", extensions);

    let summary = session
        .collect_files(extensions)
        .context("Failed to collect files")?;

    let notifier = ConsoleNotifier { quiet };
    if !quiet {
        output::print_collected_files(
            session.files(),
            session.workspace_roots().first().map(|p| p.as_path()),
        );
    }
    output::print_skipped_files(&summary.skipped, quiet);
    notifier.info(&format!(
        "{} → {}",
        summary.message(),
        summary.output_path.display()
    ));
    Ok(())
}
