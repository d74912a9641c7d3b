//! # CLI Behavior
//!
//! This is **one possible UI client** for Tout-Do, not the application itself.
//! The CLI is the only place that knows about terminal I/O, exit codes, and output formatting.
//!
//! ## Naked Execution (`toutdo`)
//!
//! Running `toutdo` with no arguments defaults to `toutdo list`.
//!
//! ## Ids
//!
//! Commands take the note id shown in the list (`toutdo pin 3`). Ids are
//! stable: deleting or reordering never renumbers other notes.
//!
//! ## Shell
//!
//! `toutdo shell` keeps one store open and reads commands from stdin, one per
//! line (`add milk`, `pin 1`, `reorder 3 1 2`, `quit`). It subscribes to the
//! store's `notes_updated` channel and prints every push, the same way a
//! desktop window would re-render.
//!
//! ## Module Structure
//!
//! - `commands`: Context setup, per-command handlers, shell loop
//! - `render`: Output formatting (list lines, pushes, messages)
//! - `setup`: Argument parsing via clap

mod commands;
mod render;
pub mod setup;

pub use commands::run;
