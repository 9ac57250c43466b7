//! Plain-text report rendering.
//!
//! Output is a pure function of the records handed in: no clocks, no
//! randomness, no map iteration order.

use crate::envelope::warning_hint;
use trivia_core::{Outcome, SourceRecord};

pub const NO_RESULTS: &str = "No results found.";

const RULE: &str = "==================================================";
const SUB_RULE: &str = "------------------------------";

/// `• title: snippet (url)`, omitting the empty parts.
pub fn format_record(r: &SourceRecord) -> String {
    let mut line = format!("• {}", r.title.trim());
    let snippet = r.snippet.trim();
    if !snippet.is_empty() {
        line.push_str(": ");
        line.push_str(snippet);
    }
    let url = r.url.trim();
    if !url.is_empty() {
        line.push_str(&format!(" ({url})"));
    }
    line
}

pub fn format_section(title: &str, records: &[SourceRecord]) -> String {
    format_section_or(title, records, NO_RESULTS)
}

/// Like [`format_section`] with a custom empty-state line.
pub fn format_section_or(title: &str, records: &[SourceRecord], empty: &str) -> String {
    let mut out = format!("{title}\n{SUB_RULE}\n");
    if records.is_empty() {
        out.push_str(empty);
    } else {
        let lines: Vec<String> = records.iter().map(format_record).collect();
        out.push_str(&lines.join("\n"));
    }
    out
}

/// A titled report: header, sections, then notes about missing sources.
#[derive(Debug, Clone, Default)]
pub struct Report {
    header: String,
    subtitle: Vec<String>,
    sections: Vec<String>,
    unavailable: Vec<(String, String)>,
    notes: Vec<String>,
    footer: Option<String>,
}

impl Report {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            ..Default::default()
        }
    }

    pub fn subtitle(mut self, line: impl Into<String>) -> Self {
        self.subtitle.push(line.into());
        self
    }

    pub fn footer(mut self, line: impl Into<String>) -> Self {
        self.footer = Some(line.into());
        self
    }

    pub fn records(&mut self, title: &str, records: &[SourceRecord]) -> &mut Self {
        self.sections.push(format_section(title, records));
        self
    }

    pub fn records_or(&mut self, title: &str, records: &[SourceRecord], empty: &str) -> &mut Self {
        self.sections.push(format_section_or(title, records, empty));
        self
    }

    /// Renders the records, or the empty state plus a note naming `source`.
    pub fn outcome(
        &mut self,
        title: &str,
        source: &str,
        outcome: Outcome<Vec<SourceRecord>>,
    ) -> &mut Self {
        if let Some(reason) = outcome.reason() {
            self.unavailable(source, reason);
        }
        let records = outcome.unwrap_or_empty();
        self.records(title, &records)
    }

    pub fn text(&mut self, title: &str, body: &str) -> &mut Self {
        self.sections.push(format!("{title}\n{SUB_RULE}\n{}", body.trim()));
        self
    }

    pub fn unavailable(&mut self, source: &str, reason: &str) -> &mut Self {
        self.unavailable.push((source.to_string(), reason.to_string()));
        self
    }

    pub fn note(&mut self, line: impl Into<String>) -> &mut Self {
        self.notes.push(line.into());
        self
    }

    pub fn render(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        let mut head = format!("{}\n{RULE}", self.header);
        for line in &self.subtitle {
            head.push('\n');
            head.push_str(line);
        }
        parts.push(head);
        parts.extend(self.sections.iter().cloned());

        let mut notes: Vec<String> = Vec::new();
        if !self.unavailable.is_empty() {
            let list: Vec<String> = self
                .unavailable
                .iter()
                .map(|(source, reason)| format!("{source} ({reason})"))
                .collect();
            notes.push(format!(
                "⚠️ Some sources returned nothing: {}",
                list.join(", ")
            ));
            if let Some(hint) = warning_hint("sources_unavailable") {
                notes.push(format!("💡 {hint}"));
            }
        }
        notes.extend(self.notes.iter().map(|n| format!("ℹ️ {n}")));
        if !notes.is_empty() {
            parts.push(notes.join("\n"));
        }

        if let Some(footer) = &self.footer {
            parts.push(format!("{RULE}\n{footer}"));
        }
        parts.join("\n\n")
    }
}
