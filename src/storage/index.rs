use super::query::{Field, Predicate};
use super::types::{DocId, PhotoRecord};
use crate::search::tokenizer::tokenize_path;

use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Secondary indexes of the photo collection.
///
/// `by_hash` keeps the first id seen for a hash, so a collection loaded with
/// legacy duplicates still resolves a hash to its oldest record.
#[derive(Debug, Default)]
pub struct PhotoIndex {
    by_hash: HashMap<String, DocId>,
    by_type: HashMap<String, BTreeSet<DocId>>,
    by_origin: HashMap<String, BTreeSet<DocId>>,
    filename_tokens: BTreeMap<String, BTreeSet<DocId>>,
    filepath_tokens: BTreeMap<String, BTreeSet<DocId>>,
}

impl PhotoIndex {
    pub fn insert(&mut self, id: DocId, record: &PhotoRecord) {
        self.by_hash.entry(record.md5sum.clone()).or_insert(id);
        self.by_type
            .entry(record.file_type.clone())
            .or_default()
            .insert(id);
        self.by_origin
            .entry(record.origin.clone())
            .or_default()
            .insert(id);
        for token in tokenize_path(&record.filename) {
            self.filename_tokens.entry(token).or_default().insert(id);
        }
        for token in tokenize_path(&record.filepath) {
            self.filepath_tokens.entry(token).or_default().insert(id);
        }
    }

    pub fn id_of(&self, md5sum: &str) -> Option<DocId> {
        self.by_hash.get(md5sum).copied()
    }

    pub fn contains_hash(&self, md5sum: &str) -> bool {
        self.by_hash.contains_key(md5sum)
    }

    /// Ids that may satisfy `predicate`, or `None` when no index applies and
    /// the caller has to scan.
    pub fn candidates(&self, predicate: &Predicate) -> Option<BTreeSet<DocId>> {
        match predicate {
            Predicate::All | Predicate::ExifTag { .. } => None,
            Predicate::Eq(field, value) => Some(match field {
                Field::Md5sum => self.by_hash.get(value).into_iter().copied().collect(),
                Field::FileType => lookup(&self.by_type, value),
                Field::Origin => lookup(&self.by_origin, value),
                Field::FilenameTokens => self.filename_tokens.get(value).cloned().unwrap_or_default(),
                Field::FilepathTokens => self.filepath_tokens.get(value).cloned().unwrap_or_default(),
            }),
            Predicate::Contains(Field::FilenameTokens, pattern) => {
                Some(token_scan(&self.filename_tokens, pattern))
            }
            Predicate::Contains(Field::FilepathTokens, pattern) => {
                Some(token_scan(&self.filepath_tokens, pattern))
            }
            Predicate::Contains(..) => None,
            Predicate::Or(predicates) => {
                let mut union = BTreeSet::new();
                for predicate in predicates {
                    union.extend(self.candidates(predicate)?);
                }
                Some(union)
            }
        }
    }
}

fn lookup(index: &HashMap<String, BTreeSet<DocId>>, key: &str) -> BTreeSet<DocId> {
    index.get(key).cloned().unwrap_or_default()
}

// Substring match over the token keys; the token sets are tiny compared to
// the record set.
fn token_scan(index: &BTreeMap<String, BTreeSet<DocId>>, pattern: &str) -> BTreeSet<DocId> {
    index
        .iter()
        .filter(|(token, _)| token.contains(pattern))
        .flat_map(|(_, ids)| ids.iter().copied())
        .collect()
}

/// Album name index; first id wins for legacy duplicates.
#[derive(Debug, Default)]
pub struct AlbumIndex {
    by_name: HashMap<String, DocId>,
}

impl AlbumIndex {
    pub fn insert(&mut self, id: DocId, name: &str) {
        self.by_name.entry(name.to_string()).or_insert(id);
    }

    pub fn id_of(&self, name: &str) -> Option<DocId> {
        self.by_name.get(name).copied()
    }
}
