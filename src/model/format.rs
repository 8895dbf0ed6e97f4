//! `Format` — the content-addressed template string of a structured log.

/// A printf-like template with positional placeholders `{0}..{9}`.
///
/// Content-addressed: two producers emitting the same `format_string` share
/// one row via the `FormatString` column's `UNIQUE` constraint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Format {
    pub id: i64,
    pub format_string: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_format_strings_are_equal_keys() {
        let a = Format {
            id: 1,
            format_string: "hello {0}".to_string(),
        };
        let b = Format {
            id: 2,
            format_string: "hello {0}".to_string(),
        };
        assert_eq!(a.format_string, b.format_string);
    }
}
