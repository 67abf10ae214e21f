//! String inflection helpers.
//!
//! These are the transforms behind the controller naming convention
//! (`forward-after` → `forwardAfterAction`), so their exact behavior is part of
//! the routing contract: `humanize` only splits on `_`, `ucwords` only upper-cases
//! the first letter of each word and never lower-cases the rest. Case changes
//! apply to ASCII letters only; other characters pass through untouched.

/// Upper-case the first character, leave the rest untouched.
#[must_use]
pub fn ucfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => std::iter::once(first.to_ascii_uppercase()).chain(chars).collect(),
        None => String::new(),
    }
}

/// Lower-case the first character, leave the rest untouched.
#[must_use]
pub fn lcfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => std::iter::once(first.to_ascii_lowercase()).chain(chars).collect(),
        None => String::new(),
    }
}

/// Upper-case the first character of every whitespace-separated word.
fn ucwords(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if at_word_start {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = c.is_ascii_whitespace() || c == '\x0b';
    }
    out
}

/// `hello_there` → `Hello There`
#[must_use]
pub fn humanize(s: &str) -> String {
    ucwords(&s.replace('_', " "))
}

/// `hello_there` → `helloThere`
///
/// The first letter is always lower-cased; callers wanting a type name apply
/// [`ucfirst`] on top.
#[must_use]
pub fn camelize(s: &str) -> String {
    lcfirst(&humanize(s).replace(' ', ""))
}

/// `helloThere` → `hello_there`
#[must_use]
pub fn underscore(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    let mut prev_is_word = false;
    for c in s.chars() {
        if c.is_ascii_uppercase() && prev_is_word {
            out.push('_');
        }
        out.push(c.to_ascii_lowercase());
        prev_is_word = c.is_ascii_alphanumeric() || c == '_';
    }
    out
}

/// Plural suffix for a count: `s` (or `x`) above one, nothing otherwise.
#[must_use]
pub fn pluralize(count: usize, x: bool) -> &'static str {
    match (count > 1, x) {
        (true, true) => "x",
        (true, false) => "s",
        (false, _) => "",
    }
}

/// Truncate to `max_len` characters, ending with ` ...` when shortened.
#[must_use]
pub fn ellipsis(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let keep = max_len.saturating_sub(4);
    let mut out: String = s.chars().take(keep).collect();
    out.push_str(" ...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camelize() {
        assert_eq!(camelize("hello_there"), "helloThere");
        assert_eq!(camelize("Hello there"), "helloThere");
        assert_eq!(camelize("forward_after"), "forwardAfter");
        assert_eq!(camelize("forwardAfter"), "forwardAfter");
        assert_eq!(camelize(""), "");
    }

    #[test]
    fn test_camelize_keeps_inner_case() {
        assert_eq!(camelize("FOO_bar"), "fOOBar");
    }

    #[test]
    fn test_humanize() {
        assert_eq!(humanize("hello_there"), "Hello There");
        assert_eq!(humanize("already Spaced"), "Already Spaced");
    }

    #[test]
    fn test_underscore() {
        assert_eq!(underscore("helloThere"), "hello_there");
        assert_eq!(underscore("HelloThere"), "hello_there");
        assert_eq!(underscore("hello"), "hello");
    }

    #[test]
    fn test_ucfirst_lcfirst() {
        assert_eq!(ucfirst("dummy"), "Dummy");
        assert_eq!(lcfirst("Dummy"), "dummy");
        assert_eq!(ucfirst(""), "");
    }

    #[test]
    fn test_case_changes_are_ascii_only() {
        assert_eq!(ucfirst("école"), "école");
        assert_eq!(lcfirst("École"), "École");
        assert_eq!(humanize("été_plage"), "été Plage");
        assert_eq!(camelize("über_cart"), "überCart");
        assert_eq!(underscore("ÉtéCart"), "Étécart");
        assert_eq!(underscore("caféBar"), "cafébar");
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize(0, false), "");
        assert_eq!(pluralize(1, false), "");
        assert_eq!(pluralize(2, false), "s");
        assert_eq!(pluralize(2, true), "x");
    }

    #[test]
    fn test_ellipsis() {
        assert_eq!(ellipsis("short", 10), "short");
        assert_eq!(ellipsis("a long sentence here", 10), "a long ...");
    }
}
