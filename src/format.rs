//! Placeholder expansion
//!
//! Embedded widgets render templated strings from configuration, with
//! positional `{0}`, `{1}`, … tokens standing in for runtime values.
//! Tokens whose index has no value are left in the output verbatim.

use regex_lite::Regex;

/// Replace each `{i}` token in `template` with `values[i]`.
pub fn expand(template: &str, values: &[&str]) -> String {
    let token = Regex::new(r"\{(\d+)\}").unwrap();
    let mut out = String::with_capacity(template.len());
    let mut last = 0;
    for caps in token.captures_iter(template) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&template[last..whole.start()]);
        let replacement = caps
            .get(1)
            .and_then(|index| index.as_str().parse::<usize>().ok())
            .and_then(|index| values.get(index).copied());
        match replacement {
            Some(value) => out.push_str(value),
            // Out-of-range token, kept as-is.
            None => out.push_str(whole.as_str()),
        }
        last = whole.end();
    }
    out.push_str(&template[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_tokens_are_replaced() {
        assert_eq!(expand("Hello {0}!", &["world"]), "Hello world!");
        assert_eq!(
            expand("{0} of {1}", &["page 2", "10"]),
            "page 2 of 10"
        );
    }

    #[test]
    fn test_token_can_repeat() {
        assert_eq!(expand("{0}{0}-{0}", &["x"]), "xx-x");
    }

    #[test]
    fn test_out_of_range_token_left_verbatim() {
        assert_eq!(expand("have {0}, miss {3}", &["a"]), "have a, miss {3}");
        assert_eq!(expand("{0}", &[]), "{0}");
    }

    #[test]
    fn test_multi_digit_indexes() {
        let values: Vec<String> = (0..=10).map(|i| i.to_string()).collect();
        let values: Vec<&str> = values.iter().map(String::as_str).collect();
        assert_eq!(expand("{10}|{2}", &values), "10|2");
    }

    #[test]
    fn test_non_token_braces_untouched() {
        assert_eq!(expand("{x} {} {0}", &["v"]), "{x} {} v");
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(expand("no tokens here", &["unused"]), "no tokens here");
        assert_eq!(expand("", &[]), "");
    }
}
