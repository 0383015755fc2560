use std::sync::OnceLock;

use chrono::NaiveDateTime;
use regex::Regex;

use crate::model::Note;

const ALLOWED_TAGS: &[&str] = &["b", "strong", "i", "em", "u", "div", "p", "br", "span"];

struct Patterns {
    leading_blank_divs: Regex,
    trailing_blank_divs: Regex,
    leading_empty: Regex,
    trailing_empty: Regex,
    dropped_blocks: Regex,
    tag: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        leading_blank_divs: Regex::new(r"(?i)^(?:\s*<div>(?:<br\s*/?>)+</div>)+").expect("pattern"),
        trailing_blank_divs: Regex::new(r"(?i)(?:<div>(?:<br\s*/?>)+</div>\s*)+$").expect("pattern"),
        leading_empty: Regex::new(r"(?i)^(?:\s*(?:<div></div>|<br\s*/?>|&nbsp;))+").expect("pattern"),
        trailing_empty: Regex::new(r"(?i)(?:(?:<div></div>|<br\s*/?>|&nbsp;)\s*)+$").expect("pattern"),
        dropped_blocks: Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)\s*>").expect("pattern"),
        tag: Regex::new(r"(?s)<(/?)([a-zA-Z][a-zA-Z0-9]*)\b[^>]*?(/?)>").expect("pattern"),
    })
}

/// Removes empty editor wrappers from both ends of the captured markup.
pub fn strip_empty_edges(raw: &str) -> String {
    let p = patterns();
    let mut content = raw.trim().to_string();
    loop {
        let before = content.len();
        content = p.leading_blank_divs.replace(&content, "").into_owned();
        content = p.trailing_blank_divs.replace(&content, "").into_owned();
        content = p.leading_empty.replace(&content, "").into_owned();
        content = p.trailing_empty.replace(&content, "").into_owned();
        content = content.trim().to_string();
        if content.len() == before {
            return content;
        }
    }
}

/// Keeps only simple formatting tags, without attributes.
pub fn sanitize_markup(html: &str) -> String {
    let p = patterns();
    let without_blocks = p.dropped_blocks.replace_all(html, "");
    p.tag
        .replace_all(&without_blocks, |caps: &regex::Captures| {
            let closing = &caps[1];
            let name = caps[2].to_lowercase();
            if !ALLOWED_TAGS.contains(&name.as_str()) {
                return String::new();
            }
            if name == "br" {
                "<br>".to_string()
            } else {
                format!("<{}{}>", closing, name)
            }
        })
        .into_owned()
}

/// Turns raw editor markup into what gets posted, or `None` when there is
/// nothing worth saving.
pub fn prepare_note(raw_html: &str) -> Option<String> {
    let cleaned = strip_empty_edges(&sanitize_markup(raw_html));
    let text = patterns().tag.replace_all(&cleaned, "").replace("&nbsp;", " ");
    (!text.trim().is_empty()).then_some(cleaned)
}

pub fn sort_notes_newest_first(notes: &mut [Note]) {
    notes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}

pub fn format_note_timestamp(ts: &NaiveDateTime) -> String {
    ts.format("%B %-d, %Y, %I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::parse_timestamp;

    #[test]
    fn empty_editor_output_is_not_submitted() {
        assert_eq!(prepare_note(""), None);
        assert_eq!(prepare_note("   "), None);
        assert_eq!(prepare_note("<br>"), None);
        assert_eq!(prepare_note("<div><br></div><div><br></div>"), None);
        assert_eq!(prepare_note("<div></div><br><div><br/></div>"), None);
        assert_eq!(prepare_note("<b></b>"), None);
        assert_eq!(prepare_note("&nbsp;"), None);
    }

    #[test]
    fn strips_blank_lines_at_both_ends_only() {
        let raw = "<div><br></div><b>first</b><div><br></div><div>second</div><div><br></div><br>";
        assert_eq!(prepare_note(raw).as_deref(), Some("<b>first</b><div><br></div><div>second</div>"));
    }

    #[test]
    fn sanitizer_keeps_formatting_and_drops_the_rest() {
        let raw = r#"<b onclick="x()">bold</b><script>alert(1)</script><i>it</i><img src=x onerror=y><u>u</u><a href="j">link</a>"#;
        assert_eq!(sanitize_markup(raw), "<b>bold</b><i>it</i><u>u</u>link");
        assert_eq!(sanitize_markup("line<br/>next"), "line<br>next");
    }

    #[test]
    fn notes_sort_newest_first() {
        let make = |id, ts: &str| Note {
            id,
            video_id: 1,
            content: String::new(),
            created_at: parse_timestamp(ts).unwrap(),
        };
        let mut notes = vec![make(1, "2024-01-01T09:00:00"), make(2, "2024-05-01T09:00:00"), make(3, "2024-03-01T09:00:00")];
        sort_notes_newest_first(&mut notes);
        assert_eq!(notes.iter().map(|n| n.id).collect::<Vec<_>>(), vec![2, 3, 1]);
    }

    #[test]
    fn timestamp_format() {
        let ts = parse_timestamp("2024-10-05T15:04:00").unwrap();
        assert_eq!(format_note_timestamp(&ts), "October 5, 2024, 03:04 PM");
    }
}
