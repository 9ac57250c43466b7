use std::io::Cursor;

/// Elements whose text never reaches the output.
///
/// The last four are page chrome; everything else in the document is kept
/// (there is no "main content" scoring).
const SKIPPED_ELEMENTS: &[&str] = &[
    "script", "style", "noscript", "template", "nav", "header", "footer", "aside",
];

/// Convert HTML to readable plain text.
///
/// Falls back to the raw input when the renderer rejects it.
pub fn html_to_text(html: &str, width: usize) -> String {
    // html2text expects bytes; Cursor avoids allocating a second large buffer.
    html2text::from_read(Cursor::new(html.as_bytes()), width).unwrap_or_else(|_| html.to_string())
}

pub fn norm_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn has_any_text(s: &str) -> bool {
    s.chars().any(|c| !c.is_whitespace())
}

/// First `max_chars` characters of `s`, plus whether anything was cut.
pub fn truncate_chars(s: &str, max_chars: usize) -> (String, bool) {
    if max_chars == 0 {
        return (String::new(), !s.is_empty());
    }
    let mut out = String::new();
    for (n, ch) in s.chars().enumerate() {
        if n >= max_chars {
            return (out, true);
        }
        out.push(ch);
    }
    (out, false)
}

/// Whitespace-normalize and cap a snippet, marking cuts with an ellipsis.
///
/// The result never exceeds `max_chars` characters.
pub fn clip(s: &str, max_chars: usize) -> String {
    let s = norm_ws(s);
    if max_chars == 0 {
        return String::new();
    }
    let (head, clipped) = truncate_chars(&s, max_chars);
    if !clipped {
        return head;
    }
    let (mut head, _) = truncate_chars(&head, max_chars.saturating_sub(1));
    head.truncate(head.trim_end().len());
    head.push('…');
    head
}

fn strip_tag_blocks(html: &str, tag: &str) -> String {
    // Minimal stripper for <tag ...> ... </tag> blocks; only removes when a close
    // tag exists. ASCII-case-insensitive on tag names.
    let open_pat = format!("<{}", tag.to_ascii_lowercase());
    let close_pat = format!("</{}>", tag.to_ascii_lowercase());

    let mut out = String::new();
    let mut i = 0usize;
    let lower = html.to_ascii_lowercase();
    while let Some(rel_start) = lower[i..].find(&open_pat) {
        let start = i + rel_start;
        let after_open = start + open_pat.len();
        if let Some(rel_end) = lower[after_open..].find(&close_pat) {
            let end = after_open + rel_end + close_pat.len();
            out.push_str(&html[i..start]);
            i = end;
        } else {
            break;
        }
    }
    out.push_str(&html[i..]);
    out
}

fn dom_text(html: &str) -> String {
    let doc = html_scraper::Html::parse_document(html);
    let mut out = String::new();
    for node in doc.tree.root().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let skipped = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .is_some_and(|el| SKIPPED_ELEMENTS.contains(&el.name()))
        });
        if skipped {
            continue;
        }
        out.push_str(text);
        out.push(' ');
    }
    norm_ws(&out)
}

/// Plain text of a whole document, cut to `limit` characters.
///
/// Never fails: when the DOM walk finds nothing in a non-empty input, the
/// html2text rendering is used instead (which itself degrades to the raw input).
pub fn extract(html: &str, limit: usize) -> String {
    if limit == 0 || !has_any_text(html) {
        return String::new();
    }
    let mut text = dom_text(html);
    if text.is_empty() {
        let stripped = strip_tag_blocks(&strip_tag_blocks(html, "script"), "style");
        text = norm_ws(&html_to_text(&stripped, 10_000));
    }
    truncate_chars(&text, limit).0
}
