//! Turns a commit list into the structured document the renderer draws
//!
//! The document also has a plain-text form: markdown headings and prose with a
//! fixed-width grid table, which is what gets logged at debug level.

use crate::cache::DATA_TTL;
use crate::humanize::humanize;
use crate::types::CommitSummary;
use chrono::{DateTime, Utc};
use std::fmt::Write;
use std::time::Duration;

/// Longest commit message shown, in characters
pub const MESSAGE_LIMIT: usize = 140;
/// Stands in for line breaks inside a table cell
pub const BREAK_MARKER: &str = "<br>";
/// Appended to messages cut at [`MESSAGE_LIMIT`]
pub const TRUNCATION_MARKER: &str = "…";

const DATE_COLUMN_WIDTH: usize = 24;
const MESSAGE_COLUMN_WIDTH: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading(String),
    Paragraph(String),
    Table(Table),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub header: [String; 2],
    pub rows: Vec<[String; 2]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WidgetDocument {
    pub blocks: Vec<Block>,
}

impl WidgetDocument {
    /// Markdown-like text form with a grid table
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        for (i, block) in self.blocks.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            match block {
                Block::Heading(text) => {
                    let _ = writeln!(out, "## {}", text);
                }
                Block::Paragraph(text) => {
                    let _ = writeln!(out, "{}", text);
                }
                Block::Table(table) => write_grid_table(&mut out, table),
            }
        }
        out
    }

    pub fn table(&self) -> Option<&Table> {
        self.blocks.iter().find_map(|b| match b {
            Block::Table(t) => Some(t),
            _ => None,
        })
    }
}

fn write_grid_table(out: &mut String, table: &Table) {
    let border = format!(
        "+{}+{}+",
        "-".repeat(DATE_COLUMN_WIDTH + 2),
        "-".repeat(MESSAGE_COLUMN_WIDTH + 2)
    );
    let header_rule = border.replace('-', "=");

    let _ = writeln!(out, "{}", border);
    let _ = writeln!(
        out,
        "| {:<dw$} | {:<mw$} |",
        table.header[0],
        table.header[1],
        dw = DATE_COLUMN_WIDTH,
        mw = MESSAGE_COLUMN_WIDTH
    );
    let _ = writeln!(out, "{}", header_rule);
    for [date, message] in &table.rows {
        let _ = writeln!(
            out,
            "| {:<dw$} | {:<mw$} |",
            date,
            message,
            dw = DATE_COLUMN_WIDTH,
            mw = MESSAGE_COLUMN_WIDTH
        );
        let _ = writeln!(out, "{}", border);
    }
}

/// Build the widget document for a non-empty, newest-first commit list
///
/// Returns `None` when there is nothing to show.
pub fn compose(commits: &[CommitSummary], limit: u8, now: DateTime<Utc>) -> Option<WidgetDocument> {
    let newest = commits.first()?;
    let last_change = newest.committer_date;

    let rows = commits
        .iter()
        .map(|c| [table_date(c.author_date), table_message(&c.message)])
        .collect();

    let blocks = vec![
        Block::Heading("Last change".to_string()),
        Block::Paragraph(format!(
            "{} ({})",
            iso_seconds(last_change),
            humanize(now, last_change)
        )),
        Block::Heading("Recent commits".to_string()),
        Block::Paragraph(format!("Limiting to last {}:", commit_count_phrase(limit))),
        Block::Table(Table {
            header: ["Date".to_string(), "Message".to_string()],
            rows,
        }),
        Block::Paragraph(refresh_note(DATA_TTL)),
    ];

    Some(WidgetDocument { blocks })
}

/// `2024-01-01T10:00:00`
pub fn iso_seconds(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S").to_string()
}

fn table_date(at: DateTime<Utc>) -> String {
    iso_seconds(at).replace('T', " ")
}

/// "one commit" or "{n} commits"
pub fn commit_count_phrase(limit: u8) -> String {
    if limit == 1 {
        "one commit".to_string()
    } else {
        format!("{} commits", limit)
    }
}

/// Single-line, length-limited form of a commit message for a table cell
pub fn table_message(message: &str) -> String {
    let single_line = message
        .replace("\r\n", BREAK_MARKER)
        .replace('\r', BREAK_MARKER)
        .replace('\n', BREAK_MARKER);
    truncate(&single_line, MESSAGE_LIMIT)
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &text[..cut], TRUNCATION_MARKER),
        None => text.to_string(),
    }
}

/// Footnote describing how stale the data may be
pub fn refresh_note(ttl: Duration) -> String {
    let secs = ttl.as_secs();
    let period = match secs {
        3600 => "once per hour".to_string(),
        s if s % 3600 == 0 => format!("every {} hours", s / 3600),
        s if s % 60 == 0 => format!("every {} minutes", s / 60),
        s => format!("every {} seconds", s),
    };
    format!("This data is refreshed {}.", period)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_commits;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 10, 5, 0).unwrap()
    }

    #[test]
    fn test_empty_commits_compose_nothing() {
        assert!(compose(&[], 5, now()).is_none());
    }

    #[test]
    fn test_header_uses_newest_committer_date() {
        let doc = compose(&sample_commits(3), 5, now()).unwrap();
        assert_eq!(
            doc.blocks[1],
            Block::Paragraph("2024-01-01T10:00:00 (5 minutes ago)".to_string())
        );
    }

    #[test]
    fn test_table_has_one_row_per_commit() {
        let doc = compose(&sample_commits(3), 5, now()).unwrap();
        let table = doc.table().unwrap();
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0][0], "2024-01-01 09:55:00");
        assert_eq!(table.rows[0][1], "Commit number 1");
    }

    #[test]
    fn test_commit_count_phrase() {
        assert_eq!(commit_count_phrase(1), "one commit");
        assert_eq!(commit_count_phrase(2), "2 commits");

        let doc = compose(&sample_commits(1), 1, now()).unwrap();
        assert!(doc.to_markdown().contains("Limiting to last one commit:"));
    }

    #[test]
    fn test_line_breaks_become_markers() {
        assert_eq!(table_message("a\r\nb\rc\nd"), "a<br>b<br>c<br>d");
        assert_eq!(table_message("a\n\nb"), "a<br><br>b");
    }

    #[test]
    fn test_message_of_exactly_limit_is_untouched() {
        let message = "x".repeat(140);
        assert_eq!(table_message(&message), message);
    }

    #[test]
    fn test_message_over_limit_is_cut_with_marker() {
        let message = format!("{}y", "x".repeat(140));
        let shown = table_message(&message);
        assert_eq!(shown, format!("{}…", "x".repeat(140)));
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let message = "é".repeat(141);
        let shown = table_message(&message);
        assert_eq!(shown.chars().count(), 141);
        assert!(shown.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn test_refresh_note_matches_cache_ttl() {
        assert_eq!(refresh_note(DATA_TTL), "This data is refreshed once per hour.");
        assert_eq!(
            refresh_note(Duration::from_secs(7200)),
            "This data is refreshed every 2 hours."
        );
        assert_eq!(
            refresh_note(Duration::from_secs(600)),
            "This data is refreshed every 10 minutes."
        );
    }

    #[test]
    fn test_markdown_form() {
        let doc = compose(&sample_commits(2), 2, now()).unwrap();
        let text = doc.to_markdown();

        assert!(text.starts_with("## Last change\n\n2024-01-01T10:00:00 (5 minutes ago)\n"));
        assert!(text.contains("## Recent commits"));
        assert!(text.contains("Limiting to last 2 commits:"));
        assert!(text.contains("| Date                     | Message"));
        assert!(text.contains("+==="));
        assert!(text.contains("| 2024-01-01 08:55:00      | Commit number 2"));
        assert!(text.trim_end().ends_with("This data is refreshed once per hour."));
    }
}
