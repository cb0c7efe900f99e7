//! Escaping for string values embedded in generated SQL.
//!
//! Every string that lands inside a quoted clause goes through
//! [`escape_string`]. Values read back from `DESCRIBE` output (currently only
//! the `NULL_IF` list) go through [`unescape_string`], which is its inverse.

/// Escape a value for embedding in a quoted SQL literal.
///
/// Backslashes are doubled first, then single quotes are backslash-escaped.
///
/// # Examples
///
/// ```
/// use hemmer_provider_snowflake::snowflake::escape_string;
///
/// assert_eq!(escape_string(r"\N"), r"\\N");
/// assert_eq!(escape_string("it's"), r"it\'s");
/// ```
pub fn escape_string(input: &str) -> String {
    input.replace('\\', r"\\").replace('\'', r"\'")
}

/// Reverse [`escape_string`].
pub fn unescape_string(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some(other) => {
                out.push('\\');
                out.push(other);
            },
            None => out.push('\\'),
        }
    }

    out
}
