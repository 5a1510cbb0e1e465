//! URL query parameter access
//!
//! Query parameters override configuration at the last minute, so the
//! lookup contract distinguishes *absent* from *present but empty*:
//! `None` when the URL has no query string or no parameter named `name`,
//! `Some("")` when the parameter appears without a usable value (no `=`,
//! an empty value, or the literal `null`), and otherwise the
//! percent-decoded value.

use std::borrow::Cow;

/// Look up query parameter `name` in `url`.
pub fn get_parameter(name: &str, url: &str) -> Option<String> {
    let query = url.split_once('?')?.1;
    if query.is_empty() {
        return None;
    }
    for pair in query.split('&') {
        // Only the first two segments count, as in "a=b=c" reading "b".
        let mut parts = pair.split('=');
        let key = parts.next().unwrap_or_default();
        let value = parts.next();
        if decode(key) != name {
            continue;
        }
        return match value {
            None | Some("") | Some("null") => Some(String::new()),
            Some(raw) => Some(decode(raw).into_owned()),
        };
    }
    None
}

/// Percent-decode, keeping the raw text when it is not valid UTF-8.
fn decode(raw: &str) -> Cow<'_, str> {
    urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw))
}
