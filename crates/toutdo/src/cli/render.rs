//! # Rendering
//!
//! Turns notes and snapshots into terminal text. Layout math (width,
//! truncation, padding) is Unicode-aware; colors come from `console` and
//! switch off automatically when stdout is not a terminal.
//!
//! Every function returns a `String`, so tests can compare output without a
//! terminal.

use chrono::{DateTime, Utc};
use console::Style;
use toutdoapp::{Note, Snapshot};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const LINE_WIDTH: usize = 80;
pub const TIME_WIDTH: usize = 14;
pub const ID_WIDTH: usize = 4;
pub const PIN_MARKER: &str = "⚲";

fn pinned_style() -> Style {
    Style::new().yellow()
}

fn time_style() -> Style {
    Style::new().color256(246).italic()
}

pub fn render_note_list(notes: &[Note], now: DateTime<Utc>) -> String {
    if notes.is_empty() {
        return "No notes yet. Add one with `toutdo add <text>`.\n".to_string();
    }

    let mut out = String::new();
    let mut in_pinned = notes.first().is_some_and(|n| n.pinned);
    for note in notes {
        // Blank line between the pinned block and the rest.
        if in_pinned && !note.pinned {
            out.push('\n');
            in_pinned = false;
        }
        out.push_str(&render_note_line(note, now));
        out.push('\n');
    }
    out
}

pub fn render_note_line(note: &Note, now: DateTime<Utc>) -> String {
    let marker = if note.pinned { PIN_MARKER } else { " " };
    let left = format!("{} {:>width$}. ", marker, note.id.get(), width = ID_WIDTH);

    let time = format_time_ago(note.updated_at, now);
    let time_width = TIME_WIDTH.max(time.width() + 1);
    let available = LINE_WIDTH.saturating_sub(left.width() + time_width);

    let first_line = note.content.lines().next().unwrap_or_default();
    let has_more = note.content.lines().nth(1).is_some();
    let title = truncate_to_width(first_line, available, has_more);
    let padding = " ".repeat(available.saturating_sub(title.width()));
    let time = format!("{:>width$}", time, width = time_width);

    if note.pinned {
        let style = pinned_style();
        format!(
            "{}{}{}{}",
            style.apply_to(left),
            style.apply_to(title),
            padding,
            time_style().apply_to(time)
        )
    } else {
        format!("{}{}{}{}", left, title, padding, time_style().apply_to(time))
    }
}

/// Cuts `text` to at most `max` columns, ending in `…` when anything was
/// dropped (or `force_ellipsis` says there is more).
pub fn truncate_to_width(text: &str, max: usize, force_ellipsis: bool) -> String {
    if max == 0 {
        return String::new();
    }
    if text.width() <= max && !force_ellipsis {
        return text.to_string();
    }

    let budget = max - 1;
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

pub fn format_time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = (now - then).to_std().unwrap_or_default();
    let mut formatter = timeago::Formatter::new();
    formatter.num_items(1);
    formatter.convert(elapsed)
}

pub fn render_json(notes: &[Note]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(notes)
}

/// One line per `notes_updated` push received in the shell.
pub fn render_push(snapshot: &Snapshot) -> String {
    let pinned = snapshot.notes.iter().filter(|n| n.pinned).count();
    let style = Style::new().cyan();
    style
        .apply_to(format!(
            "↻ notes updated (revision {}): {} notes, {} pinned",
            snapshot.revision,
            snapshot.notes.len(),
            pinned
        ))
        .to_string()
}

pub fn render_success(message: &str) -> String {
    Style::new().green().apply_to(message).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use toutdoapp::NoteId;

    fn note(id: u64, content: &str, pinned: bool) -> Note {
        let mut n = Note::new(NoteId::new(id), content.to_string());
        n.pinned = pinned;
        n
    }

    fn plain(s: &str) -> String {
        console::strip_ansi_codes(s).to_string()
    }

    #[test]
    fn empty_list_has_hint() {
        assert!(render_note_list(&[], Utc::now()).contains("toutdo add"));
    }

    #[test]
    fn pinned_notes_are_marked_and_separated() {
        let now = Utc::now();
        let notes = vec![note(1, "milk", true), note(2, "eggs", false)];
        let out = plain(&render_note_list(&notes, now));
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with(PIN_MARKER));
        assert!(lines[0].contains("1. milk"));
        assert_eq!(lines[1], "");
        assert!(lines[2].contains("2. eggs"));
        assert!(!lines[2].contains(PIN_MARKER));
    }

    #[test]
    fn lines_fit_line_width() {
        let now = Utc::now();
        let long = "word ".repeat(40);
        let out = plain(&render_note_line(&note(7, &long, false), now));
        assert_eq!(out.width(), LINE_WIDTH);
        assert!(out.contains('…'));
    }

    #[test]
    fn multi_line_content_shows_first_line() {
        let out = plain(&render_note_line(
            &note(1, "groceries\nmilk\neggs", false),
            Utc::now(),
        ));
        assert!(out.contains("groceries…"));
        assert!(!out.contains("milk"));
    }

    #[test]
    fn truncate_handles_wide_chars() {
        assert_eq!(truncate_to_width("日本語テキスト", 5, false), "日本…");
        assert_eq!(truncate_to_width("short", 10, false), "short");
        assert_eq!(truncate_to_width("abc", 0, false), "");
    }

    #[test]
    fn time_ago_is_humanized() {
        let now = Utc::now();
        let out = format_time_ago(now - Duration::minutes(5), now);
        assert!(out.contains("5 minutes"), "{out}");
    }

    #[test]
    fn push_line_counts_pins() {
        let snapshot = Snapshot {
            revision: 4,
            notes: vec![note(1, "a", true), note(2, "b", false)],
        };
        let out = plain(&render_push(&snapshot));
        assert!(out.contains("revision 4"));
        assert!(out.contains("2 notes, 1 pinned"));
    }

    #[test]
    fn json_output_is_array_of_notes() {
        let json = render_json(&[note(3, "x", false)]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["id"], 3);
        assert_eq!(value[0]["content"], "x");
    }
}
