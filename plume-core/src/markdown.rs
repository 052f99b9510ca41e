use once_cell::sync::Lazy;
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd, html};
use regex::Regex;
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

static MARK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"==(.*?)==").expect("valid regex"));
static BLOCK_MATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\$(.*?)\$\$").expect("valid regex"));
static INLINE_MATH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$(.*?)\$").expect("valid regex"));

static SYNTAXES: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);
static THEMES: Lazy<ThemeSet> = Lazy::new(ThemeSet::load_defaults);

const HIGHLIGHT_THEME: &str = "InspiredGitHub";

const CONTAINER_OPEN: &str = "<div class=\"code-block-container\">";
const COPY_BUTTON: &str = "<button class=\"copy-btn\" type=\"button\">Copier</button>";
const EXTERNAL_ICON: &str = "<span class=\"external-icon\"></span>";

/// Markdown to HTML with tables, newline-as-break semantics, highlighted
/// fenced code blocks, and the widget's `==mark==` / `$math$` extensions.
pub fn render_markdown(text: &str) -> String {
    let text = apply_span_extensions(text);

    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    let parser = Parser::new_ext(&text, options);

    let mut events = Vec::new();
    let mut code = String::new();
    let mut lang = String::new();
    let mut in_code_block = false;
    for event in parser {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                in_code_block = true;
                code.clear();
                lang = match kind {
                    CodeBlockKind::Fenced(token) => token.to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                events.push(Event::Html(highlight(&code, &lang).into()));
            }
            Event::Text(chunk) if in_code_block => code.push_str(&chunk),
            Event::SoftBreak => events.push(Event::HardBreak),
            other => events.push(other),
        }
    }

    let mut out = String::new();
    html::push_html(&mut out, events.into_iter());
    out
}

// Block math must run before inline math, otherwise `$$x$$` is consumed as
// two empty single-dollar spans.
fn apply_span_extensions(text: &str) -> String {
    let text = MARK_RE.replace_all(text, "<mark>$1</mark>");
    let text = BLOCK_MATH_RE.replace_all(&text, "<code class=\"math\">$1</code>");
    INLINE_MATH_RE
        .replace_all(&text, "<code class=\"math-inline\">$1</code>")
        .into_owned()
}

/// Highlights a code block. An unknown language falls back to first-line
/// detection, and any highlighting failure falls back to an escaped plain
/// block; this never errors.
pub fn highlight(code: &str, lang: &str) -> String {
    let theme = &THEMES.themes[HIGHLIGHT_THEME];
    let syntax = SYNTAXES
        .find_syntax_by_token(lang)
        .or_else(|| SYNTAXES.find_syntax_by_first_line(code));

    if let Some(syntax) = syntax
        && let Ok(highlighted) = highlighted_html_for_string(code, &SYNTAXES, syntax, theme)
    {
        return highlighted;
    }

    format!("<pre><code>{}</code></pre>\n", html_escape(code))
}

pub fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Post-render enhancement: copy buttons on code blocks, new-tab attributes
/// and a visual marker on external links. Safe to run repeatedly; already
/// enhanced markup is left untouched.
pub fn enhance(html: &str) -> String {
    decorate_external_links(&wrap_code_blocks(html))
}

fn wrap_code_blocks(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut pos = 0;
    while let Some(found) = html[pos..].find("<pre") {
        let start = pos + found;
        let Some(end_rel) = html[start..].find("</pre>") else {
            break;
        };
        let end = start + end_rel + "</pre>".len();
        out.push_str(&html[pos..start]);
        if html[..start].ends_with(CONTAINER_OPEN) {
            out.push_str(&html[start..end]);
        } else {
            out.push_str(CONTAINER_OPEN);
            out.push_str(&html[start..end]);
            out.push_str(COPY_BUTTON);
            out.push_str("</div>");
        }
        pos = end;
    }
    out.push_str(&html[pos..]);
    out
}

fn decorate_external_links(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut pos = 0;
    while let Some(found) = html[pos..].find("<a ") {
        let start = pos + found;
        let Some(open_end_rel) = html[start..].find('>') else {
            break;
        };
        let open_end = start + open_end_rel;
        let Some(close_rel) = html[open_end..].find("</a>") else {
            break;
        };
        let close = open_end + close_rel;
        let end = close + "</a>".len();

        out.push_str(&html[pos..start]);
        let tag = &html[start..open_end];
        let inner = &html[open_end + 1..close];
        if tag.contains("href=\"http") && !tag.contains("class=\"reference\"") {
            out.push_str(tag);
            if !tag.contains("target=") {
                out.push_str(" target=\"_blank\"");
            }
            if !tag.contains("rel=") {
                out.push_str(" rel=\"noopener noreferrer\"");
            }
            out.push('>');
            out.push_str(inner);
            if !inner.ends_with(EXTERNAL_ICON) {
                out.push_str(EXTERNAL_ICON);
            }
            out.push_str("</a>");
        } else {
            out.push_str(&html[start..end]);
        }
        pos = end;
    }
    out.push_str(&html[pos..]);
    out
}
