//! Quoting words so a shell reads them back unchanged.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches any character outside the shell-safe set.
static UNSAFE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_@%+=:,./-]").expect("unsafe-char pattern is valid"));

/// Whether `s` can be passed to a shell without quoting.
pub fn is_safe(s: &str) -> bool {
    !s.is_empty() && !UNSAFE.is_match(s)
}

/// Return a shell-escaped version of `s`.
///
/// Safe strings are returned unchanged; anything else is wrapped in
/// single quotes, with embedded single quotes written as `'"'"'`.
pub fn quote(s: &str) -> String {
    if s.is_empty() {
        return "''".to_string();
    }
    if is_safe(s) {
        return s.to_string();
    }
    format!("'{}'", s.replace('\'', "'\"'\"'"))
}

/// Quote each word and join them with spaces.
pub fn join<I, S>(words: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    words
        .into_iter()
        .map(|w| quote(w.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::split;

    #[test]
    fn test_quote_empty() {
        assert_eq!(quote(""), "''");
    }

    #[test]
    fn test_quote_safe_unchanged() {
        assert_eq!(quote("foo"), "foo");
        assert_eq!(quote("user@host:/path/to,file.txt"), "user@host:/path/to,file.txt");
        assert_eq!(quote("a+b=c%d-e"), "a+b=c%d-e");
    }

    #[test]
    fn test_quote_unsafe() {
        assert_eq!(quote("foo bar"), "'foo bar'");
        assert_eq!(quote("$HOME"), "'$HOME'");
        assert_eq!(quote("é"), "'é'");
    }

    #[test]
    fn test_quote_embedded_single_quote() {
        assert_eq!(quote("don't"), "'don'\"'\"'t'");
    }

    #[test]
    fn test_quote_splits_back() {
        for word in ["don't", "a b", "", "x\"y", "back\\slash", "#hash"] {
            let quoted = quote(word);
            assert_eq!(split(&quoted, true, true).unwrap(), vec![word.to_string()]);
        }
    }

    #[test]
    fn test_join() {
        assert_eq!(join(["echo", "hello world", ""]), "echo 'hello world' ''");
        let words = vec!["a'b".to_string(), "c".to_string()];
        assert_eq!(split(&join(&words), true, true).unwrap(), words);
    }
}
