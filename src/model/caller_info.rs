//! `CallerInfo` — optional producer call-site metadata, content-addressed on
//! the `(member, file, line)` triple.

/// Where a log call originated: member name, source file, source line.
///
/// All three fields are independently optional; the composite triple is the
/// unique key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CallerInfo {
    pub id: i64,
    pub member_name: Option<String>,
    pub source_file_path: Option<String>,
    pub source_line_number: Option<i32>,
}

/// The unresolved (pre-flush) key for a `CallerInfo` row: the triple without
/// an assigned id, used as a hash-map key during satellite dedup resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallerInfoKey {
    pub member_name: Option<String>,
    pub source_file_path: Option<String>,
    pub source_line_number: Option<i32>,
}

impl From<&CallerInfo> for CallerInfoKey {
    fn from(c: &CallerInfo) -> Self {
        Self {
            member_name: c.member_name.clone(),
            source_file_path: c.source_file_path.clone(),
            source_line_number: c.source_line_number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_equality_ignores_id() {
        let a = CallerInfo {
            id: 1,
            member_name: Some("foo".to_string()),
            source_file_path: Some("src/lib.rs".to_string()),
            source_line_number: Some(10),
        };
        let b = CallerInfo {
            id: 99,
            ..a.clone()
        };
        assert_eq!(CallerInfoKey::from(&a), CallerInfoKey::from(&b));
    }
}
