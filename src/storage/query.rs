//! Typed query predicates over photo records.
//!
//! Queries are built from predicate values instead of strings, so user input
//! is only ever compared against fields, never interpreted. The index layer
//! inspects the predicate to pick a secondary index; anything it cannot
//! serve falls back to a full scan evaluated with `Predicate::matches`.

use super::types::PhotoRecord;
use crate::search::tokenizer::{normalize_extension, tokenize_path};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Md5sum,
    FileType,
    Origin,
    FilenameTokens,
    FilepathTokens,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Every record.
    All,
    /// Exact match on the field (any token, for token fields).
    Eq(Field, String),
    /// Case-insensitive substring match; the pattern is stored lowercased.
    Contains(Field, String),
    /// Some tag whose key contains `tag` has a value containing `pattern`.
    /// Both are stored lowercased.
    ExifTag { tag: String, pattern: String },
    Or(Vec<Predicate>),
}

impl Predicate {
    pub fn eq(field: Field, value: impl Into<String>) -> Self {
        Predicate::Eq(field, value.into())
    }

    pub fn contains(field: Field, pattern: &str) -> Self {
        Predicate::Contains(field, pattern.to_lowercase())
    }

    pub fn exif_tag(tag: &str, pattern: &str) -> Self {
        Predicate::ExifTag {
            tag: tag.to_lowercase(),
            pattern: pattern.to_lowercase(),
        }
    }

    /// Filename search: substring over filename tokens or path tokens.
    pub fn filename(pattern: &str) -> Self {
        Predicate::Or(vec![
            Predicate::contains(Field::FilenameTokens, pattern),
            Predicate::contains(Field::FilepathTokens, pattern),
        ])
    }

    /// Extension search: `jpg`, `.JPG` and `.jpg` are the same query.
    pub fn extension(pattern: &str) -> Self {
        Predicate::eq(Field::FileType, normalize_extension(pattern))
    }

    pub fn matches(&self, record: &PhotoRecord) -> bool {
        match self {
            Predicate::All => true,
            Predicate::Eq(field, value) => match field {
                Field::Md5sum => record.md5sum == *value,
                Field::FileType => record.file_type == *value,
                Field::Origin => record.origin == *value,
                Field::FilenameTokens => tokenize_path(&record.filename).contains(value),
                Field::FilepathTokens => tokenize_path(&record.filepath).contains(value),
            },
            Predicate::Contains(field, pattern) => match field {
                Field::Md5sum => record.md5sum.to_lowercase().contains(pattern),
                Field::FileType => record.file_type.contains(pattern),
                Field::Origin => record.origin.to_lowercase().contains(pattern),
                Field::FilenameTokens => tokenize_path(&record.filename)
                    .iter()
                    .any(|token| token.contains(pattern)),
                Field::FilepathTokens => tokenize_path(&record.filepath)
                    .iter()
                    .any(|token| token.contains(pattern)),
            },
            Predicate::ExifTag { tag, pattern } => record.exif.iter().any(|(key, value)| {
                key.to_lowercase().contains(tag) && value.to_lowercase().contains(pattern)
            }),
            Predicate::Or(predicates) => predicates.iter().any(|p| p.matches(record)),
        }
    }
}
