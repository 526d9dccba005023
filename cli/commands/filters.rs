use crate::cli_args::FiltersArgs;
use crate::open_session;
use crate::output::{ConsoleNotifier, print_filters};
use anyhow::{Context, Result};
use fcollect_core::{FilterUpdate, Notifier, parse_extensions, parse_list, parse_max_size_mb};

pub fn handle_filters_command(args: FiltersArgs, quiet: bool) -> Result<()> {
    let mut session = open_session(&args.workspace)?;

    let update = FilterUpdate {
        extensions: args.extensions.as_deref().map(parse_extensions),
        exclude_patterns: args.exclude.as_deref().map(parse_list),
        max_file_size_mb: args
            .max_size_mb
            .as_deref()
            .map(parse_max_size_mb)
            .transpose()?,
    };

    if update.is_empty() {
        print_filters(&session.last_used());
        return Ok(());
    }

    let config = session
        .set_filters(&update)
        .context("Failed to save filters")?;
    ConsoleNotifier { quiet }.info("Filters saved.");
    if !quiet {
        print_filters(&config);
    }
    Ok(())
}
