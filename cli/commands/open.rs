use crate::cli_args::OpenArgs;
use crate::open_session;
use crate::output::write_to_stdout;
use anyhow::Result;
use fcollect_core::writer;

pub fn handle_open_command(args: OpenArgs) -> Result<()> {
    let mut session = open_session(&args.workspace)?;
    if let Some(name) = &args.output {
        session.change_output_path(name)?;
    }
    let path = session.open_output()?;
    if args.path_only {
        println!("{}", path.display());
        return Ok(());
    }
    let content = writer::read_output(path)?;
    write_to_stdout(&content)
}
