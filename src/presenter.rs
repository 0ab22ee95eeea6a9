//! Rendering of result snapshots for the terminal.

use std::io::Write;

use store_search::{ResultSnapshot, SearchItem};

use crate::config::OutputFormat;
use crate::error::Result;

/// Render a snapshot as plain text.
///
/// Each section prints its label, then one indented line per item. An
/// empty snapshot renders as `(no results)`.
pub fn render_text(snapshot: &ResultSnapshot) -> String {
    if snapshot.is_empty() {
        return "(no results)\n".to_string();
    }

    let mut out = String::new();
    for section in snapshot.sections() {
        out.push_str(&format!("{} ({})\n", section.label(), section.items.len()));
        for item in &section.items {
            out.push_str("  ");
            out.push_str(&item_line(item));
            out.push('\n');
        }
    }
    out
}

fn item_line(item: &SearchItem) -> String {
    if item.artist.is_empty() {
        item.title.clone()
    } else {
        format!("{} - {}", item.title, item.artist)
    }
}

/// Render a snapshot as a single JSON line.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be serialised.
pub fn render_json(snapshot: &ResultSnapshot) -> Result<String> {
    let line = serde_json::to_string(snapshot)?;
    Ok(format!("{line}\n"))
}

/// Writes every snapshot it is given to an output stream.
pub struct Presenter<W> {
    out: W,
    format: OutputFormat,
    shown: usize,
}

impl<W: Write> Presenter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self {
            out,
            format,
            shown: 0,
        }
    }

    /// Render and flush one snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or writing fails.
    pub fn show(&mut self, snapshot: &ResultSnapshot) -> Result<()> {
        let rendered = match self.format {
            OutputFormat::Text => {
                let separator = if self.shown == 0 { "" } else { "---\n" };
                format!("{separator}{}", render_text(snapshot))
            }
            OutputFormat::Json => render_json(snapshot)?,
        };
        self.out.write_all(rendered.as_bytes())?;
        self.out.flush()?;
        self.shown += 1;
        Ok(())
    }

    /// Number of snapshots shown so far.
    pub fn shown(&self) -> usize {
        self.shown
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store_search::ItemKind;

    fn snapshot() -> ResultSnapshot {
        let items = [
            SearchItem::new("1", ItemKind::Song, "One").with_artist("U2"),
            SearchItem::new("2", ItemKind::Software, "Pages"),
        ];
        ResultSnapshot::from_items(&items)
    }

    #[test]
    fn text_lists_sections_in_order() {
        let text = render_text(&snapshot());
        assert_eq!(text, "Music (1)\n  One - U2\nApps (1)\n  Pages\n");
    }

    #[test]
    fn empty_snapshot_text() {
        assert_eq!(render_text(&ResultSnapshot::empty()), "(no results)\n");
    }

    #[test]
    fn json_is_one_line() {
        let json = render_json(&snapshot()).expect("json");
        assert!(json.ends_with('\n'));
        assert_eq!(json.lines().count(), 1);
        let value: serde_json::Value = serde_json::from_str(json.trim()).expect("valid json");
        assert_eq!(value["sections"][0]["scope"], "music");
        assert_eq!(value["sections"][0]["items"][0]["kind"], "song");
    }

    #[test]
    fn presenter_separates_text_snapshots() {
        let mut presenter = Presenter::new(Vec::new(), OutputFormat::Text);
        presenter.show(&ResultSnapshot::empty()).expect("first");
        presenter.show(&snapshot()).expect("second");
        assert_eq!(presenter.shown(), 2);

        let out = String::from_utf8(presenter.into_inner()).expect("utf8");
        assert!(out.starts_with("(no results)\n---\nMusic (1)"));
    }
}
