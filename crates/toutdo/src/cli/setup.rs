use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "toutdo",
    bin_name = "toutdo",
    version,
    disable_help_subcommand = true,
    about = "A pinned, drag-ordered note list",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding notes.json (overrides config and TOUTDO_DATA_DIR)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data_dir: Option<PathBuf>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List notes, pinned first
    #[command(alias = "ls")]
    List {
        /// Print the list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a note at the end of the list
    Add {
        /// Note text (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        content: Vec<String>,
    },

    /// Replace a note's text, keeping its place
    Edit {
        id: u64,
        #[arg(required = true, num_args = 1..)]
        content: Vec<String>,
    },

    /// Delete a note
    #[command(alias = "rm")]
    Delete { id: u64 },

    /// Pin a note, or unpin it if already pinned
    Pin { id: u64 },

    /// Set the order of all notes (pinned notes stay on top)
    Reorder {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<u64>,
    },

    /// Interactive session that prints live updates
    Shell,

    /// Print the location of the notes file
    Path,
}

/// One line typed into `toutdo shell`.
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_help_subcommand = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: Commands,
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}
