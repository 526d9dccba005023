use crate::cli_args::ClearArgs;
use crate::open_session;
use crate::output::ConsoleNotifier;
use anyhow::{Context, Result};
use fcollect_core::Notifier;

pub fn handle_clear_command(args: ClearArgs, quiet: bool) -> Result<()> {
    let mut session = open_session(&args.workspace)?;
    if let Some(name) = &args.output {
        session.change_output_path(name)?;
    }
    let notifier = ConsoleNotifier { quiet };
    let removed = session.clear_output().context("Failed to clear output")?;
    if removed {
        notifier.info(&format!("Removed {}", session.output_path().display()));
    } else {
        notifier.info("Nothing to clear.");
    }
    Ok(())
}
