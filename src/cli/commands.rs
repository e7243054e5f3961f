use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dp", about = concat!("dayplan v", env!("CARGO_PKG_VERSION"), " - what's on today"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Directory holding task lists and config.toml
    #[arg(short = 'd', long = "data-dir", global = true, env = "DAYPLAN_DIR")]
    pub data_dir: Option<PathBuf>,

    /// More diagnostics on stderr (repeatable)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the data directory and a commented config.toml
    Init(InitArgs),
    /// Add a task
    Add(AddArgs),
    /// Show today's tasks (the default)
    Today,
    /// Show tasks from earlier days, most recent first
    Past,
    /// Show upcoming tasks, soonest first
    Future,
    /// Show one day's tasks
    Show(ShowArgs),
    /// Mark a task done, or not done again
    Done(TaskArgs),
    /// Delete a task
    Rm(TaskArgs),
    /// Remove all done tasks from a day
    Clear(ClearArgs),
    /// Search task descriptions by regex
    Search(SearchArgs),
    /// List every day that has tasks
    Dates,
}

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing config.toml
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct AddArgs {
    /// Time of day, HH:MM (24-hour)
    pub time: String,
    /// Task description
    #[arg(required = true, num_args = 1..)]
    pub description: Vec<String>,
    /// Day to add to, YYYY-MM-DD (default: today)
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Day to show, YYYY-MM-DD
    pub date: String,
}

#[derive(Args)]
pub struct TaskArgs {
    /// Task id or unique id prefix (as shown in listings)
    #[arg(required_unless_present = "index", conflicts_with = "index")]
    pub id: Option<String>,
    /// Address the task by its position in the day's list (1 = first)
    #[arg(long, requires = "date")]
    pub index: Option<usize>,
    /// Day the task is on, YYYY-MM-DD (narrows id lookup; required with --index)
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Args)]
pub struct ClearArgs {
    /// Day to clear, YYYY-MM-DD (default: today)
    pub date: Option<String>,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Regex pattern to search for
    pub pattern: String,
    /// Match case-insensitively
    #[arg(short = 'i', long)]
    pub ignore_case: bool,
}
