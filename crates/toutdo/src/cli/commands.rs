//! Context setup, per-command handlers, and the interactive shell.
//!
//! Handlers write to a `&mut dyn Write` instead of stdout directly, so tests
//! can run them against an in-memory store and inspect the output.

use super::render::{render_json, render_note_list, render_push, render_success};
use super::setup::{parse_cli, Cli, Commands, ShellLine};
use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::thread;
use toutdoapp::config::ToutdoConfig;
use toutdoapp::store::StorageBackend;
use toutdoapp::{ErrorKind, NoteId, NotesApi, ToutdoError};

pub fn run() -> Result<()> {
    let cli = parse_cli();
    let config = load_config(&cli)?;
    init_logging(&config, cli.verbose);

    let api = match NotesApi::open(&config) {
        Ok(api) => api,
        Err(e @ ToutdoError::CorruptStore { .. }) => {
            // Never fall back to an empty list here: the first save would
            // overwrite whatever is left in the file.
            return Err(e).context("Refusing to start; the notes file was left untouched");
        }
        Err(e) => return Err(e).context("Could not open the notes store"),
    };

    let command = cli.command.unwrap_or(Commands::List { json: false });
    let mut stdout = io::stdout();
    match command {
        Commands::Shell => run_shell(&api, io::stdin().lock(), &mut stdout),
        other => dispatch(&api, other, &mut stdout),
    }
}

fn load_config(cli: &Cli) -> Result<ToutdoConfig> {
    let config = ToutdoConfig::load().context("Could not load configuration")?;
    Ok(match &cli.data_dir {
        Some(dir) => config.with_data_dir(dir),
        None => config,
    })
}

fn init_logging(config: &ToutdoConfig, verbose: bool) {
    let filter = if verbose {
        "debug"
    } else {
        config.log_level.as_str()
    };
    let _ = env_logger::Builder::new()
        .parse_filters(filter)
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .try_init();
}

/// Runs one command against `api`.
pub fn dispatch<B: StorageBackend>(
    api: &NotesApi<B>,
    command: Commands,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        Commands::List { json } => handle_list(api, json, out),
        Commands::Add { content } => {
            let note = api.add_note(&content.join(" "))?;
            writeln!(out, "{}", render_success(&format!("Added {}: {}", note.id, note.content)))?;
            Ok(())
        }
        Commands::Edit { id, content } => {
            let note = api.edit_note(NoteId::new(id), &content.join(" "))?;
            writeln!(out, "{}", render_success(&format!("Updated {}: {}", note.id, note.content)))?;
            Ok(())
        }
        Commands::Delete { id } => {
            api.delete_note(NoteId::new(id))?;
            writeln!(out, "{}", render_success(&format!("Deleted {}", id)))?;
            Ok(())
        }
        Commands::Pin { id } => {
            let note = api.toggle_pin(NoteId::new(id))?;
            let verb = if note.pinned { "Pinned" } else { "Unpinned" };
            writeln!(out, "{}", render_success(&format!("{} {}: {}", verb, note.id, note.content)))?;
            Ok(())
        }
        Commands::Reorder { ids } => {
            let ids: Vec<NoteId> = ids.into_iter().map(NoteId::new).collect();
            api.reorder_notes(&ids)?;
            writeln!(out, "{}", render_success(&format!("Reordered {} notes", ids.len())))?;
            Ok(())
        }
        Commands::Path => {
            writeln!(out, "{}", api.notes_location().display())?;
            Ok(())
        }
        Commands::Shell => bail!("Already in a shell"),
    }
}

fn handle_list<B: StorageBackend>(api: &NotesApi<B>, json: bool, out: &mut dyn Write) -> Result<()> {
    let notes = api.list_notes();
    if json {
        writeln!(out, "{}", render_json(&notes)?)?;
    } else {
        write!(out, "{}", render_note_list(&notes, Utc::now()))?;
    }
    Ok(())
}

/// Reads commands line by line until EOF or `quit`. A background thread
/// prints each `notes_updated` push; it stops once the subscription is
/// dropped from the store.
pub fn run_shell<B: StorageBackend>(
    api: &NotesApi<B>,
    input: impl BufRead,
    out: &mut dyn Write,
) -> Result<()> {
    let subscription = api.subscribe();
    let subscription_id = subscription.id();
    let printer = thread::spawn(move || {
        for snapshot in subscription {
            println!("{}", render_push(&snapshot));
        }
    });

    writeln!(out, "toutdo shell: type a command (`list`, `add milk`, `pin 1`, ...) or `quit`")?;
    let result = shell_loop(api, input, out);

    api.unsubscribe(subscription_id);
    if printer.join().is_err() {
        log::warn!("update printer thread panicked");
    }
    result
}

fn shell_loop<B: StorageBackend>(
    api: &NotesApi<B>,
    input: impl BufRead,
    out: &mut dyn Write,
) -> Result<()> {
    for line in input.lines() {
        let line = line?;
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => continue,
            ["quit"] | ["exit"] => break,
            _ => {}
        }

        let command = match ShellLine::try_parse_from(words.iter().copied()) {
            Ok(parsed) => parsed.command,
            Err(e) => {
                write!(out, "{}", e)?;
                continue;
            }
        };

        let was_reorder = matches!(command, Commands::Reorder { .. });
        if let Err(e) = dispatch(api, command, out) {
            writeln!(out, "Error: {}", e)?;
            if was_reorder && is_validation_error(&e) {
                // Whatever order the user had in mind is stale; show the real one.
                handle_list(api, false, out)?;
            }
        }
    }
    Ok(())
}

fn is_validation_error(err: &anyhow::Error) -> bool {
    err.downcast_ref::<toutdoapp::CommandError>()
        .is_some_and(|e| e.kind == ErrorKind::Validation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use toutdoapp::model::NoteCollection;
    use toutdoapp::store::MemBackend;
    use toutdoapp::Note;

    fn api() -> NotesApi<MemBackend> {
        NotesApi::with_backend(MemBackend::new()).unwrap()
    }

    fn run_cmd(api: &NotesApi<MemBackend>, command: Commands) -> (Result<()>, String) {
        let mut out = Vec::new();
        let result = dispatch(api, command, &mut out);
        (result, console::strip_ansi_codes(&String::from_utf8(out).unwrap()).to_string())
    }

    #[test]
    fn add_joins_words() {
        let api = api();
        let (result, out) = run_cmd(
            &api,
            Commands::Add {
                content: vec!["buy".into(), "milk".into()],
            },
        );
        result.unwrap();
        assert!(out.contains("Added 1: buy milk"));
        assert_eq!(api.list_notes()[0].content, "buy milk");
    }

    #[test]
    fn pin_reports_direction() {
        let api = api();
        api.add_note("milk").unwrap();
        let (_, out) = run_cmd(&api, Commands::Pin { id: 1 });
        assert!(out.contains("Pinned 1: milk"));
        let (_, out) = run_cmd(&api, Commands::Pin { id: 1 });
        assert!(out.contains("Unpinned 1: milk"));
    }

    #[test]
    fn errors_propagate_as_command_errors() {
        let api = api();
        let (result, _) = run_cmd(&api, Commands::Delete { id: 9 });
        let err = result.unwrap_err();
        let cmd_err = err.downcast_ref::<toutdoapp::CommandError>().unwrap();
        assert_eq!(cmd_err.kind, ErrorKind::NotFound);
    }

    #[test]
    fn list_json() {
        let api = api();
        api.add_note("milk").unwrap();
        let (result, out) = run_cmd(&api, Commands::List { json: true });
        result.unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["content"], "milk");
    }

    #[test]
    fn reorder_then_list() {
        let api = api();
        api.add_note("a").unwrap();
        api.add_note("b").unwrap();
        let (result, _) = run_cmd(&api, Commands::Reorder { ids: vec![2, 1] });
        result.unwrap();
        let contents: Vec<String> = api.list_notes().into_iter().map(|n| n.content).collect();
        assert_eq!(contents, vec!["b", "a"]);
    }

    #[test]
    fn shell_runs_commands_and_survives_errors() {
        let api = api();
        let input = "add milk\n\nadd eggs\nbogus\nreorder 2 7\npin 1\nquit\nadd never\n";
        let mut out = Vec::new();
        run_shell(&api, input.as_bytes(), &mut out).unwrap();
        let out = console::strip_ansi_codes(&String::from_utf8(out).unwrap()).to_string();

        assert!(out.contains("Added 1: milk"));
        assert!(out.contains("Added 2: eggs"));
        assert!(out.contains("Error:"), "{out}");
        assert!(out.contains("Pinned 1: milk"));

        let contents: Vec<String> = api.list_notes().into_iter().map(|n| n.content).collect();
        assert_eq!(contents, vec!["milk", "eggs"]);
        assert_eq!(api.store().subscriber_count(), 0);
    }

    #[test]
    fn shell_relists_only_after_rejected_reorder() {
        // One note stored and no ids left, so `add` fails validation too.
        let collection = NoteCollection::new(
            NoteId::new(u64::MAX),
            vec![Note::new(NoteId::new(1), "milk".into())],
        );
        let api = NotesApi::with_backend(MemBackend::with_collection(collection)).unwrap();

        let mut out = Vec::new();
        shell_loop(&api, "add eggs\n".as_bytes(), &mut out).unwrap();
        let out = console::strip_ansi_codes(&String::from_utf8(out).unwrap()).to_string();
        assert!(out.contains("Error:"), "{out}");
        assert!(!out.contains("1. milk"), "{out}");

        let mut out = Vec::new();
        shell_loop(&api, "reorder 1 9\n".as_bytes(), &mut out).unwrap();
        let out = console::strip_ansi_codes(&String::from_utf8(out).unwrap()).to_string();
        assert!(out.contains("Error:"), "{out}");
        assert!(out.contains("1. milk"), "{out}");
    }

    #[test]
    fn shell_cannot_nest() {
        let api = api();
        let (result, _) = run_cmd(&api, Commands::Shell);
        assert!(result.is_err());
    }
}
