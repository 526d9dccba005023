use crate::cli_args::FoldersArgs;
use crate::open_session;
use crate::output::print_folders;
use anyhow::Result;

pub fn handle_folders_command(args: FoldersArgs) -> Result<()> {
    let session = open_session(&args.workspace)?;
    print_folders(&session.candidate_folders(), session.selected_folders());
    Ok(())
}
