use once_cell::sync::Lazy;
use regex::Regex;

use crate::citation;
use crate::markdown::{self, html_escape};
use crate::model::{Reference, RenderedMessage, Role};

static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://[^\s]+").expect("valid regex"));

/// Builds the display fragment for one message: citation extraction, markdown
/// rendering, then the sources section when any reference was found. User and
/// assistant messages go through the same pipeline.
pub fn render(sender: Role, raw_text: &str) -> RenderedMessage {
    let extraction = citation::extract(raw_text);
    let mut html_body = markdown::render_markdown(&extraction.cleaned_body);
    if !extraction.references.is_empty() {
        html_body.push_str(&references_section(&extraction.references));
    }

    RenderedMessage {
        sender,
        html_body,
        references: extraction.references,
    }
}

fn references_section(references: &[Reference]) -> String {
    let mut out = String::from(
        "<div class=\"references-section\">\n<h4>Sources et références :</h4>\n<ul class=\"references-list\">\n",
    );
    for reference in references {
        out.push_str(&format!(
            "<li id=\"ref{0}\" data-ref=\"{0}\">{1}</li>\n",
            reference.number,
            linkify(&html_escape(&reference.text)),
        ));
    }
    out.push_str("</ul>\n</div>\n");
    out
}

fn linkify(text: &str) -> String {
    URL_RE
        .replace_all(
            text,
            "<a href=\"$0\" target=\"_blank\" rel=\"noopener noreferrer\">$0</a>",
        )
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::render;
    use crate::model::Role;

    #[test]
    fn reply_without_references_has_no_sources_section() {
        let message = render(Role::Assistant, "Une réponse simple.");
        assert!(!message.html_body.contains("references-section"));
        assert!(message.references.is_empty());
    }

    #[test]
    fn reply_with_definitions_gets_sources_section() {
        let message = render(
            Role::Assistant,
            "Voir la source.\n[1] Documentation officielle https://docs.test/guide",
        );

        assert_eq!(message.references.len(), 1);
        assert!(message.html_body.contains("Sources et références :"));
        assert!(message.html_body.contains("<li id=\"ref1\" data-ref=\"1\">"));
        assert!(message.html_body.contains(
            "<a href=\"https://docs.test/guide\" target=\"_blank\" rel=\"noopener noreferrer\">"
        ));
    }

    #[test]
    fn inline_marker_survives_markdown_as_anchor() {
        let message = render(Role::Assistant, "Comme indiqué dans [2]");
        assert!(message.html_body.contains("<a href=\"#ref2\""));
    }

    #[test]
    fn user_messages_are_markdown_rendered_too() {
        let message = render(Role::User, "c'est **important**");
        assert_eq!(message.sender, Role::User);
        assert!(message.html_body.contains("<strong>important</strong>"));
    }

    #[test]
    fn reference_text_is_escaped_before_linkify() {
        let message = render(Role::Assistant, "texte\n[1] source <b>brute</b>");
        assert!(message.html_body.contains("&lt;b&gt;brute&lt;/b&gt;"));
    }
}
