//! Embedded block lookup in HTML text
//!
//! Configuration blocks ride along inside the page as script elements:
//!
//! ```html
//! <script type="application/json" class="diversity-config" data-name="main">
//!   {"themes": ["aurora"]}
//! </script>
//! ```
//!
//! `HtmlPage` scans the document text for the first `<script>` whose class
//! list contains the marker token and whose `data-name` equals the wanted
//! name, and returns the element body verbatim. The scan is a tolerant
//! hand-rolled pass, not a full HTML parse: lowercase tag and attribute
//! names, quoted attribute values.

use super::BlockSource;

/// Class token that marks an element as a configuration block.
pub const DEFAULT_MARKER: &str = "diversity-config";

/// An HTML document holding embedded configuration blocks.
#[derive(Debug, Clone)]
pub struct HtmlPage {
    html: String,
    marker: String,
}

impl HtmlPage {
    /// Wrap a document, looking blocks up under [`DEFAULT_MARKER`].
    pub fn new(html: impl Into<String>) -> Self {
        Self::with_marker(html, DEFAULT_MARKER)
    }

    /// Wrap a document with a custom marker class.
    pub fn with_marker(html: impl Into<String>, marker: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            marker: marker.into(),
        }
    }

    /// The marker class this page matches blocks against.
    pub fn marker(&self) -> &str {
        &self.marker
    }
}

impl BlockSource for HtmlPage {
    fn block_text(&self, name: &str) -> Option<String> {
        let html = self.html.as_str();
        let mut at = 0;
        while let Some(rel) = html[at..].find("<script") {
            let open = at + rel;
            let after_tag = open + "<script".len();
            // "<scripting" is not a script tag.
            match html[after_tag..].chars().next() {
                Some(c) if c.is_ascii_whitespace() || c == '>' => {}
                _ => {
                    at = after_tag;
                    continue;
                }
            }
            let gt_rel = html[after_tag..].find('>')?;
            let attrs_end = after_tag + gt_rel;
            let attrs = &html[after_tag..attrs_end];
            let body_start = attrs_end + 1;
            let close_rel = html[body_start..].find("</script")?;
            let body_end = body_start + close_rel;
            at = body_end + "</script".len();

            let classes = attr_value(attrs, "class").unwrap_or("");
            if !class_list_contains(classes, &self.marker) {
                continue;
            }
            if attr_value(attrs, "data-name") != Some(name) {
                continue;
            }
            return Some(html[body_start..body_end].to_string());
        }
        None
    }
}

/// True when `classes` (a space-separated class attribute value) contains
/// `marker` as a whole token.
fn class_list_contains(classes: &str, marker: &str) -> bool {
    classes.split_ascii_whitespace().any(|token| token == marker)
}

/// Value of attribute `attr` inside a tag's attribute text, if present
/// with a single- or double-quoted value.
fn attr_value<'a>(attrs: &'a str, attr: &str) -> Option<&'a str> {
    let bytes = attrs.as_bytes();
    let mut search = 0;
    while let Some(pos) = attrs[search..].find(attr) {
        let start = search + pos;
        let end = start + attr.len();
        search = end;
        // The name must start at a whitespace boundary so "data-name" does
        // not match inside "x-data-name".
        if start > 0 && !bytes[start - 1].is_ascii_whitespace() {
            continue;
        }
        let rest = attrs[end..].trim_start();
        let Some(rest) = rest.strip_prefix('=') else {
            continue;
        };
        let rest = rest.trim_start();
        let mut chars = rest.chars();
        let quote = chars.next()?;
        if quote != '"' && quote != '\'' {
            continue;
        }
        let value = chars.as_str();
        let close = value.find(quote)?;
        return Some(&value[..close]);
    }
    None
}
