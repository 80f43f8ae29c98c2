//! Dotted column paths with back-tick quoting
//!
//! `a.b` names field `b` of struct `a`, while `` `a.b` `` names a single field
//! called `a.b`. Inside back-ticks a doubled back-tick stands for a literal one.

use std::borrow::Cow;

use crate::error::{OrcError, Result};

const QUOTE: char = '`';

/// Split a dotted path into its segments, honouring back-tick quoting
pub fn split_dotted_path(path: &str) -> Result<Vec<String>> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut chars = path.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            QUOTE if quoted && chars.peek() == Some(&QUOTE) => {
                chars.next();
                current.push(QUOTE);
            }
            QUOTE => quoted = !quoted,
            '.' if !quoted => segments.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }

    if quoted {
        return Err(OrcError::value(format!(
            "Unterminated back-tick in column path {:?}",
            path
        )));
    }
    segments.push(current);
    Ok(segments)
}

/// Whether a field name can be written without back-ticks
pub fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Quote a field name for the schema string or a dotted path when needed
pub fn quote_field_name(name: &str) -> Cow<'_, str> {
    if is_plain_name(name) {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(format!("`{}`", name.replace(QUOTE, "``")))
    }
}

/// Join segments into a dotted path, quoting where needed
pub fn join_dotted_path<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(|s| quote_field_name(s.as_ref()))
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_split() {
        assert_eq!(split_dotted_path("a.b.c").unwrap(), vec!["a", "b", "c"]);
        assert_eq!(split_dotted_path("single").unwrap(), vec!["single"]);
    }

    #[test]
    fn test_quoted_segments() {
        assert_eq!(split_dotted_path("`a.b`").unwrap(), vec!["a.b"]);
        assert_eq!(
            split_dotted_path("x.`y.z`.w").unwrap(),
            vec!["x", "y.z", "w"]
        );
        assert_eq!(split_dotted_path("`tick``s`").unwrap(), vec!["tick`s"]);
    }

    #[test]
    fn test_empty_segments_are_kept() {
        assert_eq!(split_dotted_path("a..b").unwrap(), vec!["a", "", "b"]);
        assert_eq!(split_dotted_path("").unwrap(), vec![""]);
    }

    #[test]
    fn test_unterminated_quote() {
        let err = split_dotted_path("a.`b.c").unwrap_err();
        assert!(matches!(err, OrcError::Value(_)));
    }

    #[test]
    fn test_quote_round_trip() {
        for name in ["plain_1", "with.dot", "sp ace", "tick`s", ""] {
            let joined = join_dotted_path(&["root", name]);
            assert_eq!(split_dotted_path(&joined).unwrap(), vec!["root", name]);
        }
        assert_eq!(quote_field_name("a.b"), "`a.b`");
        assert_eq!(quote_field_name("ab"), "ab");
    }
}
