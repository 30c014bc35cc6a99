//! Projection of the record list into a display table.
//!
//! Rendering produces a [`TableView`]: plain data describing rows, cells and
//! row actions. Field text is only ever stored as text; the HTML output
//! encodes every value so a name like `<b>x</b>` shows up literally.

use std::fmt::Write as _;

use serde::Serialize;

use crate::record::{Record, RecordId};
use crate::validation::Field;

/// Message shown in place of an empty table.
pub const EMPTY_MESSAGE: &str = "No student records found.";

/// Vertical alignment of the table inside its scroll container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    /// Content overflows; pin to the top so it can scroll.
    Start,
    /// Content fits; center it.
    Center,
}

/// Size of the scroll container, in table rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Rows visible without scrolling.
    pub visible_rows: usize,
}

/// What a row action does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Load the record into the form.
    Edit,
    /// Delete the record.
    Delete,
}

impl ActionKind {
    fn label(self) -> &'static str {
        match self {
            Self::Edit => "Edit",
            Self::Delete => "Delete",
        }
    }
}

/// A button in the actions cell, tagged with its record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionView {
    /// What the button does.
    pub kind: ActionKind,
    /// The record it targets.
    pub record_id: RecordId,
}

/// One table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowView {
    /// Record the row shows.
    pub id: RecordId,
    /// Name, uid, email, contact, in that order.
    pub cells: [String; 4],
    /// Edit and delete buttons.
    pub actions: [ActionView; 2],
}

/// The rendered table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableView {
    /// Rows in list order.
    pub rows: Vec<RowView>,
    /// Whether the empty-state message is shown.
    pub placeholder_visible: bool,
    /// Alignment inside the scroll container.
    pub alignment: Alignment,
}

/// Build the table for the given records.
#[must_use]
pub fn render(records: &[Record], viewport: Viewport) -> TableView {
    let rows: Vec<RowView> = records
        .iter()
        .map(|record| RowView {
            id: record.id.clone(),
            cells: Field::ALL.map(|f| record.data.get(f).to_string()),
            actions: [ActionKind::Edit, ActionKind::Delete].map(|kind| ActionView {
                kind,
                record_id: record.id.clone(),
            }),
        })
        .collect();

    let alignment = if rows.len() > viewport.visible_rows {
        Alignment::Start
    } else {
        Alignment::Center
    };

    TableView {
        placeholder_visible: rows.is_empty(),
        rows,
        alignment,
    }
}

impl TableView {
    /// Aligned plain-text table for terminals.
    #[must_use]
    pub fn to_text(&self) -> String {
        if self.placeholder_visible {
            return format!("{EMPTY_MESSAGE}\n");
        }

        let headers: Vec<&str> = std::iter::once("ID")
            .chain(Field::ALL.iter().map(|f| f.label()))
            .collect();
        let lines: Vec<Vec<&str>> = self
            .rows
            .iter()
            .map(|row| {
                std::iter::once(row.id.as_str())
                    .chain(row.cells.iter().map(String::as_str))
                    .collect()
            })
            .collect();

        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for line in &lines {
            for (width, cell) in widths.iter_mut().zip(line) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut out = String::new();
        push_line(&mut out, &headers, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        push_line(
            &mut out,
            &rule.iter().map(String::as_str).collect::<Vec<_>>(),
            &widths,
        );
        for line in &lines {
            push_line(&mut out, line, &widths);
        }
        out
    }

    /// One tab-separated line per row (id then the four fields), no header.
    ///
    /// Whitespace inside a value is flattened to spaces so every record
    /// stays on its own line. An empty table yields an empty string.
    #[must_use]
    pub fn to_plain(&self) -> String {
        let mut out = String::new();
        for row in &self.rows {
            out.push_str(row.id.as_str());
            for cell in &row.cells {
                out.push('\t');
                out.extend(cell.chars().map(|c| if c.is_whitespace() { ' ' } else { c }));
            }
            out.push('\n');
        }
        out
    }

    /// HTML fragment for the table body and empty-state message.
    ///
    /// Built element by element; every cell value and id is entity-encoded.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        let display = if self.placeholder_visible { "block" } else { "none" };
        let _ = writeln!(
            out,
            "<p id=\"no-records-msg\" style=\"display: {display}\">{}</p>",
            encode(EMPTY_MESSAGE)
        );

        let justify = match self.alignment {
            Alignment::Start => "flex-start",
            Alignment::Center => "center",
        };
        let _ = writeln!(
            out,
            "<div id=\"table-container\" style=\"justify-content: {justify}\">"
        );
        out.push_str("<tbody id=\"student-list\">\n");
        for row in &self.rows {
            out.push_str("<tr>");
            for cell in &row.cells {
                let _ = write!(out, "<td>{}</td>", encode(cell));
            }
            out.push_str("<td class=\"action-btns\">");
            for action in &row.actions {
                let class = match action.kind {
                    ActionKind::Edit => "edit-btn",
                    ActionKind::Delete => "delete-btn",
                };
                let _ = write!(
                    out,
                    "<button class=\"{class}\" data-id=\"{}\">{}</button>",
                    encode(action.record_id.as_str()),
                    action.kind.label()
                );
            }
            out.push_str("</td></tr>\n");
        }
        out.push_str("</tbody>\n</div>\n");
        out
    }
}

fn push_line(out: &mut String, cells: &[&str], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    out.push_str(padded.join("  ").trim_end());
    out.push('\n');
}

/// Encode text for use in HTML element content and quoted attributes.
#[must_use]
pub fn encode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordData;

    fn record(id: u64, name: &str) -> Record {
        Record::new(
            RecordId::from_sequence(id),
            RecordData {
                name: name.to_string(),
                uid: id.to_string(),
                email: "a@b.co".to_string(),
                contact: "1234567890".to_string(),
            },
        )
    }

    const VIEW: Viewport = Viewport { visible_rows: 2 };

    #[test]
    fn test_empty_list_shows_placeholder() {
        let table = render(&[], VIEW);
        assert!(table.placeholder_visible);
        assert!(table.rows.is_empty());
        assert_eq!(table.alignment, Alignment::Center);
        assert_eq!(table.to_text(), "No student records found.\n");
    }

    #[test]
    fn test_rows_follow_list_order() {
        let table = render(&[record(2, "Bo Chen"), record(1, "Ann Lee")], VIEW);

        assert!(!table.placeholder_visible);
        assert_eq!(table.rows[0].cells[0], "Bo Chen");
        assert_eq!(table.rows[1].cells[0], "Ann Lee");
        assert_eq!(table.rows[1].actions[0].kind, ActionKind::Edit);
        assert_eq!(table.rows[1].actions[1].kind, ActionKind::Delete);
        assert_eq!(table.rows[1].actions[1].record_id.as_str(), "1");
    }

    #[test]
    fn test_alignment_tracks_overflow() {
        let fits = render(&[record(1, "A"), record(2, "B")], VIEW);
        assert_eq!(fits.alignment, Alignment::Center);

        let overflows = render(&[record(1, "A"), record(2, "B"), record(3, "C")], VIEW);
        assert_eq!(overflows.alignment, Alignment::Start);
    }

    #[test]
    fn test_html_encodes_field_text() {
        let table = render(&[record(1, "<img src=x onerror=alert(1)>")], VIEW);
        let html = table.to_html();

        assert!(!html.contains("<img"));
        assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;"));
        assert!(html.contains("data-id=\"1\""));
        assert!(html.contains("display: none"));
    }

    #[test]
    fn test_encode() {
        assert_eq!(encode(r#"a&b "c" 'd'"#), "a&amp;b &quot;c&quot; &#39;d&#39;");
    }

    #[test]
    fn test_text_table_has_header_and_rows() {
        let text = render(&[record(1, "Ann Lee")], VIEW).to_text();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[0].contains("Contact No."));
        assert!(lines[2].contains("Ann Lee"));
    }

    #[test]
    fn test_plain_lines_are_tab_separated() {
        let table = render(&[record(1, "Ann\tLee"), record(2, "Bo Chen")], VIEW);

        assert_eq!(
            table.to_plain(),
            "1\tAnn Lee\t1\ta@b.co\t1234567890\n2\tBo Chen\t2\ta@b.co\t1234567890\n"
        );
        assert_eq!(render(&[], VIEW).to_plain(), "");
    }
}
