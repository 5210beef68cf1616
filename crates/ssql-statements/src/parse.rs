//! Statement file parsing.
//!
//! A statement file is a sequence of blocks, each introduced by a marker
//! line naming its tag:
//!
//! ```sql
//! -- name: get_by_id
//! SELECT * FROM users WHERE id = ?
//!
//! -- name: list_active
//! -- Only users that logged in at least once.
//! SELECT * FROM users
//! WHERE last_login IS NOT NULL
//! ```
//!
//! Plain `--` comments and blank lines are skipped. SQL lines are
//! right-trimmed and joined with `\n`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Parse failure, with the 1-based line number where it was detected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// SQL text found before any `-- name:` marker.
    #[error("line {line}: SQL text before the first '-- name:' marker")]
    Untagged { line: usize },

    /// A `-- name:` marker without a tag.
    #[error("line {line}: '-- name:' marker without a tag")]
    MissingTag { line: usize },

    /// The same tag appears twice in one file.
    #[error("line {line}: tag '{tag}' is already defined")]
    DuplicateTag { line: usize, tag: String },

    /// A marker followed directly by another marker or end of file.
    #[error("line {line}: tag '{tag}' has no SQL text")]
    EmptyStatement { line: usize, tag: String },
}

/// The statements of one namespace, keyed by tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatementFile {
    origin: Option<PathBuf>,
    statements: BTreeMap<String, String>,
}

enum Line<'a> {
    Marker(&'a str),
    Comment,
    Sql,
}

fn classify(line: &str) -> Line<'_> {
    let Some(comment) = line.trim_start().strip_prefix("--") else {
        return Line::Sql;
    };

    let marker = comment
        .trim_start()
        .strip_prefix("name")
        .and_then(|rest| rest.trim_start().strip_prefix(':'));

    match marker {
        Some(tag) => Line::Marker(tag.trim()),
        None => Line::Comment,
    }
}

struct Block<'a> {
    tag: String,
    line: usize,
    sql: Vec<&'a str>,
}

impl StatementFile {
    /// Parse statement file contents into tag → SQL text.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut statements = BTreeMap::new();
        let mut current: Option<Block<'_>> = None;

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim_end();
            if line.trim_start().is_empty() {
                continue;
            }

            match classify(line) {
                Line::Marker(tag) => {
                    if tag.is_empty() {
                        return Err(ParseError::MissingTag { line: line_no });
                    }
                    if let Some(block) = current.take() {
                        finish_block(&mut statements, block)?;
                    }
                    if statements.contains_key(tag) {
                        return Err(ParseError::DuplicateTag {
                            line: line_no,
                            tag: tag.to_string(),
                        });
                    }
                    current = Some(Block {
                        tag: tag.to_string(),
                        line: line_no,
                        sql: Vec::new(),
                    });
                }
                Line::Comment => {}
                Line::Sql => match current.as_mut() {
                    Some(block) => block.sql.push(line),
                    None => return Err(ParseError::Untagged { line: line_no }),
                },
            }
        }

        if let Some(block) = current {
            finish_block(&mut statements, block)?;
        }

        Ok(Self {
            origin: None,
            statements,
        })
    }

    /// Attach the path this file was loaded from.
    pub fn with_origin(mut self, origin: impl Into<PathBuf>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Path this file was loaded from, if it came from disk.
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    /// SQL text for a tag.
    pub fn get(&self, tag: &str) -> Option<&str> {
        self.statements.get(tag).map(String::as_str)
    }

    /// Tags in sorted order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.statements.keys().map(String::as_str)
    }

    /// `(tag, sql)` pairs in tag order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.statements
            .iter()
            .map(|(tag, sql)| (tag.as_str(), sql.as_str()))
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Overlay another file's statements onto this one. Tags present in
    /// both take `other`'s SQL; the origin becomes `other`'s.
    pub(crate) fn merge(&mut self, other: StatementFile) {
        if other.origin.is_some() {
            self.origin = other.origin;
        }
        self.statements.extend(other.statements);
    }
}

fn finish_block(
    statements: &mut BTreeMap<String, String>,
    block: Block<'_>,
) -> Result<(), ParseError> {
    if block.sql.is_empty() {
        return Err(ParseError::EmptyStatement {
            line: block.line,
            tag: block.tag,
        });
    }
    statements.insert(block.tag, block.sql.join("\n"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_statement() {
        let file = StatementFile::parse("-- name: get_by_id\nSELECT * FROM users WHERE id = ?\n")
            .unwrap();
        assert_eq!(file.len(), 1);
        assert_eq!(
            file.get("get_by_id"),
            Some("SELECT * FROM users WHERE id = ?")
        );
    }

    #[test]
    fn test_parse_multiple_multiline_statements() {
        let src = "\
-- name: list_active
-- Only users that logged in at least once.
SELECT id, name
FROM users
WHERE last_login IS NOT NULL

-- name: count
SELECT COUNT(*) FROM users
";
        let file = StatementFile::parse(src).unwrap();
        assert_eq!(file.len(), 2);
        assert_eq!(
            file.get("list_active"),
            Some("SELECT id, name\nFROM users\nWHERE last_login IS NOT NULL")
        );
        assert_eq!(file.get("count"), Some("SELECT COUNT(*) FROM users"));
        assert_eq!(file.tags().collect::<Vec<_>>(), vec!["count", "list_active"]);
    }

    #[test]
    fn test_marker_spacing_variants() {
        let src = "--name:a\nSELECT 1\n  --   name  :   b  \nSELECT 2\n";
        let file = StatementFile::parse(src).unwrap();
        assert_eq!(file.get("a"), Some("SELECT 1"));
        assert_eq!(file.get("b"), Some("SELECT 2"));
    }

    #[test]
    fn test_comment_that_mentions_name_is_not_a_marker() {
        let src = "-- name: a\n-- names are unique per file\nSELECT 1\n";
        let file = StatementFile::parse(src).unwrap();
        assert_eq!(file.len(), 1);
        assert_eq!(file.get("a"), Some("SELECT 1"));
    }

    #[test]
    fn test_leading_comments_and_crlf() {
        let src = "\u{feff}-- users queries\r\n\r\n-- name: a\r\nSELECT 1\r\n";
        let file = StatementFile::parse(src).unwrap();
        assert_eq!(file.get("a"), Some("SELECT 1"));
    }

    #[test]
    fn test_empty_input() {
        let file = StatementFile::parse("").unwrap();
        assert!(file.is_empty());
        assert!(file.origin().is_none());
    }

    #[test]
    fn test_sql_before_marker() {
        let err = StatementFile::parse("\nSELECT 1\n-- name: a\nSELECT 2\n").unwrap_err();
        assert_eq!(err, ParseError::Untagged { line: 2 });
    }

    #[test]
    fn test_marker_without_tag() {
        let err = StatementFile::parse("-- name:   \nSELECT 1\n").unwrap_err();
        assert_eq!(err, ParseError::MissingTag { line: 1 });
    }

    #[test]
    fn test_duplicate_tag() {
        let err =
            StatementFile::parse("-- name: a\nSELECT 1\n-- name: a\nSELECT 2\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::DuplicateTag {
                line: 3,
                tag: "a".into()
            }
        );
    }

    #[test]
    fn test_empty_statement() {
        let err = StatementFile::parse("-- name: a\n-- name: b\nSELECT 1\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::EmptyStatement {
                line: 1,
                tag: "a".into()
            }
        );

        let err = StatementFile::parse("-- name: a\nSELECT 1\n-- name: b\n\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::EmptyStatement {
                line: 3,
                tag: "b".into()
            }
        );
    }

    #[test]
    fn test_merge_overlays_tags() {
        let mut base = StatementFile::parse("-- name: a\nSELECT 1\n-- name: b\nSELECT 2\n")
            .unwrap()
            .with_origin("one.sql");
        let other = StatementFile::parse("-- name: b\nSELECT 20\n-- name: c\nSELECT 3\n")
            .unwrap()
            .with_origin("two.sql");

        base.merge(other);

        assert_eq!(base.get("a"), Some("SELECT 1"));
        assert_eq!(base.get("b"), Some("SELECT 20"));
        assert_eq!(base.get("c"), Some("SELECT 3"));
        assert_eq!(base.origin(), Some(Path::new("two.sql")));
    }
}
