use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct WorkspaceOpts {
    #[arg(
        long = "root",
        value_name = "PATH",
        action = clap::ArgAction::Append,
        help = "Workspace root folder, repeatable (default: current dir).",
        help_heading = "Workspace"
    )]
    pub roots: Vec<PathBuf>,

    #[arg(
        long,
        help = "Path/filename of the TOML settings file (default: .fcollect/fcollect.toml).",
        value_name = "CONFIG_FILE",
        conflicts_with = "disable_config_file",
        help_heading = "Workspace"
    )]
    pub config_file: Option<String>,

    #[arg(
        long,
        help = "Disable loading any TOML settings file.",
        conflicts_with = "config_file",
        help_heading = "Workspace"
    )]
    pub disable_config_file: bool,

    #[arg(
        long,
        help = "Where last-used settings are kept (default: user data dir).",
        value_name = "PATH",
        help_heading = "Workspace"
    )]
    pub state_file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SelectionOpts {
    #[arg(
        long = "folder",
        value_name = "PATH",
        action = clap::ArgAction::Append,
        help = "Folder to scan, repeatable (default: every workspace root).",
        help_heading = "Selection"
    )]
    pub folders: Vec<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct OutputOpts {
    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Output file name, relative to the first root (default from settings).",
        help_heading = "Output"
    )]
    pub output: Option<String>,

    #[arg(
        long,
        help = "Do not write '=== name ===' headers before each file.",
        help_heading = "Output"
    )]
    pub no_header: bool,
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Collect files by extension into a single text file.",
    long_about = "fcollect scans the selected folders for files with the chosen extensions, \nskips excluded and oversized files, and concatenates them into one output file. \nThe filters of the last successful run are remembered for quick repeats.",
    help_template = "{about-section}\nUsage: {usage}\n\n{all-args}{after-help}",
    after_help = "EXAMPLES:\n  fcollect collect -e rs,toml\n  fcollect filters --exclude '**/target/**' --max-size-mb 1\n  fcollect last --folder src\n  fcollect menu",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Increase message verbosity (-v, -vv).")]
    pub verbose: u8,

    #[arg(
        short,
        long,
        global = true,
        help = "Silence informational messages and warnings."
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    #[command(visible_alias = "c", about = "Collect files with the given extensions.")]
    Collect(CollectArgs),

    #[command(visible_alias = "l", about = "Collect again with the last-used settings.")]
    Last(LastArgs),

    #[command(about = "List the folders available for selection.")]
    Folders(FoldersArgs),

    #[command(
        visible_alias = "f",
        about = "Show or update extensions, exclude patterns and size limit."
    )]
    Filters(FiltersArgs),

    #[command(about = "Delete the output file.")]
    Clear(ClearArgs),

    #[command(about = "Print the output file.")]
    Open(OpenArgs),

    #[command(about = "Show or save the settings file.")]
    Config(ConfigArgs),

    #[command(visible_alias = "m", about = "Interactive menu session.")]
    Menu(MenuArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CollectArgs {
    #[clap(flatten)]
    pub workspace: WorkspaceOpts,
    #[clap(flatten)]
    pub selection: SelectionOpts,
    #[clap(flatten)]
    pub output: OutputOpts,

    #[arg(
        short = 'e',
        long = "ext",
        value_name = "EXT",
        value_delimiter = ',',
        action = clap::ArgAction::Append,
        help = "Extensions to collect, e.g. 'js,ts' (default from settings)."
    )]
    pub extensions: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct LastArgs {
    #[clap(flatten)]
    pub workspace: WorkspaceOpts,
    #[clap(flatten)]
    pub selection: SelectionOpts,
    #[clap(flatten)]
    pub output: OutputOpts,
}

#[derive(Args, Debug, Clone)]
pub struct FoldersArgs {
    #[clap(flatten)]
    pub workspace: WorkspaceOpts,
}

#[derive(Args, Debug, Clone)]
pub struct FiltersArgs {
    #[clap(flatten)]
    pub workspace: WorkspaceOpts,

    #[arg(
        long,
        value_name = "LIST",
        help = "Comma separated extensions, e.g. 'js,ts,txt'."
    )]
    pub extensions: Option<String>,

    #[arg(
        long,
        value_name = "LIST",
        help = "Comma separated exclude globs, e.g. '**/node_modules/**,**/.git/**'."
    )]
    pub exclude: Option<String>,

    #[arg(long, value_name = "MB", help = "Maximum file size in MB.")]
    pub max_size_mb: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ClearArgs {
    #[clap(flatten)]
    pub workspace: WorkspaceOpts,
    #[arg(short = 'o', long, value_name = "FILE", help = "Output file name.")]
    pub output: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct OpenArgs {
    #[clap(flatten)]
    pub workspace: WorkspaceOpts,
    #[arg(short = 'o', long, value_name = "FILE", help = "Output file name.")]
    pub output: Option<String>,
    #[arg(long, help = "Print only the output file path.")]
    pub path_only: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[clap(flatten)]
    pub workspace: WorkspaceOpts,
    #[arg(
        long,
        help = "Save default settings to .fcollect/fcollect.toml (prompts overwrite)."
    )]
    pub save: bool,
}

#[derive(Args, Debug, Clone)]
pub struct MenuArgs {
    #[clap(flatten)]
    pub workspace: WorkspaceOpts,
}
