use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{ExtractionResult, Reference};

static MARKER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(\d+)\]").expect("valid regex"));

/// Parses a reply for `[n]` citation markers. Two independent passes run over
/// the same source: the definition pass collects `[n] source text` lines into
/// reference entries, the rewrite pass turns bare inline markers into anchor
/// links targeting `#refN`. A marker is a definition when the rest of its line
/// is non-empty and holds no further marker; otherwise it is an inline use.
pub fn extract(raw_text: &str) -> ExtractionResult {
    ExtractionResult {
        cleaned_body: rewrite_inline_markers(raw_text),
        references: collect_references(raw_text),
    }
}

fn collect_references(text: &str) -> Vec<Reference> {
    let mut references = Vec::new();
    for caps in MARKER_RE.captures_iter(text) {
        let marker = caps.get(0).expect("whole match");
        let remainder = line_remainder(text, marker.end());
        if !is_definition(remainder) {
            continue;
        }
        let Ok(number) = caps[1].parse::<u32>() else {
            continue;
        };
        references.push(Reference {
            number,
            text: remainder.trim().to_string(),
        });
    }
    references
}

fn rewrite_inline_markers(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in MARKER_RE.captures_iter(text) {
        let marker = caps.get(0).expect("whole match");
        if is_definition(line_remainder(text, marker.end())) {
            continue;
        }
        let number = &caps[1];
        out.push_str(&text[last..marker.start()]);
        out.push_str(&format!(
            "<a href=\"#ref{number}\" class=\"reference\" title=\"Voir la référence {number}\">{number}</a>"
        ));
        last = marker.end();
    }
    out.push_str(&text[last..]);
    out
}

/// Rest of the line after byte offset `end`, stopping before the next break.
fn line_remainder(text: &str, end: usize) -> &str {
    let rest = &text[end..];
    let cut = rest.find(['\n', '\r']).unwrap_or(rest.len());
    &rest[..cut]
}

fn is_definition(remainder: &str) -> bool {
    let trimmed = remainder.trim();
    !trimmed.is_empty() && !MARKER_RE.is_match(trimmed)
}
