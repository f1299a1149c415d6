//! JSON file backed fact repository.
//!
//! # Responsibility
//! - Load the whole dataset from one JSON document at construction.
//! - Rewrite the whole document after every successful mutation.
//!
//! # Invariants
//! - The file is the durable copy; `facts` is a cache loaded only in `open`.
//! - `next_id` is computed once at load (`max(id) + 1`, or 1) and only grows.
//! - Reads are forgiving (absent or malformed file means empty dataset),
//!   writes are strict (any failure is a `RepoError`).
//! - A failed rewrite rolls the in-memory change back before returning.
//! - Writers in other processes sharing the path are not coordinated; the
//!   last rewrite wins.

use crate::model::fact::{Fact, FactDraft, FactId};
use crate::repo::fact_repo::{FactRepository, RepoError, RepoResult};
use chrono::Utc;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const DOCUMENT_FIELDS: &[&str] = &["facts"];
const FACT_FIELDS: &[&str] = &["id", "text", "category", "createdAt", "isVerified"];

#[derive(Debug, Default, Deserialize)]
struct FactsDocument {
    #[serde(default)]
    facts: Vec<Fact>,
}

#[derive(Serialize)]
struct FactsDocumentRef<'a> {
    facts: &'a [Fact],
}

/// Fact repository persisted as a single JSON document.
#[derive(Debug)]
pub struct JsonFactRepository {
    path: PathBuf,
    facts: Vec<Fact>,
    next_id: FactId,
}

impl JsonFactRepository {
    /// Loads the dataset stored at `path`.
    ///
    /// # Errors
    /// - Returns `RepoError::Io` when the file exists but cannot be read.
    ///   A missing or unparseable file is not an error.
    /// - Returns `RepoError::InvalidData` when the highest stored id leaves
    ///   no room for another one.
    pub fn open(path: impl Into<PathBuf>) -> RepoResult<Self> {
        let path = path.into();
        let facts = load_facts(&path)?;
        let next_id = match facts.iter().map(|fact| fact.id).max() {
            Some(max) => max.checked_add(1).ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "highest fact id {max} in {} leaves no next id",
                    path.display()
                ))
            })?,
            None => 1,
        };

        info!(
            "event=facts_load module=repo backend=json status=ok path={} count={} next_id={}",
            path.display(),
            facts.len(),
            next_id
        );

        Ok(Self {
            path,
            facts,
            next_id,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    fn position(&self, id: FactId) -> Option<usize> {
        self.facts.iter().position(|fact| fact.id == id)
    }

    fn save(&self) -> RepoResult<()> {
        let result = write_document(&self.path, &self.facts);
        if let Err(err) = &result {
            error!(
                "event=facts_save module=repo backend=json status=error path={} error={}",
                self.path.display(),
                err
            );
        }
        result
    }
}

impl FactRepository for JsonFactRepository {
    fn list_facts(&self) -> RepoResult<Vec<Fact>> {
        Ok(self.facts.clone())
    }

    fn get_fact(&self, id: FactId) -> RepoResult<Option<Fact>> {
        Ok(self.position(id).map(|index| self.facts[index].clone()))
    }

    fn create_fact(&mut self, draft: &FactDraft) -> RepoResult<Fact> {
        let following_id = self.next_id.checked_add(1).ok_or_else(|| {
            RepoError::InvalidData(format!("fact id space exhausted at {}", self.next_id))
        })?;
        let fact = Fact::from_draft(self.next_id, draft, Utc::now());
        self.facts.push(fact.clone());

        if let Err(err) = self.save() {
            self.facts.pop();
            return Err(err);
        }

        self.next_id = following_id;
        debug!(
            "event=fact_create module=repo backend=json status=ok id={}",
            fact.id
        );
        Ok(fact)
    }

    fn update_fact(&mut self, id: FactId, draft: &FactDraft) -> RepoResult<Option<Fact>> {
        let Some(index) = self.position(id) else {
            return Ok(None);
        };

        let previous = self.facts[index].clone();
        self.facts[index].apply(draft);

        if let Err(err) = self.save() {
            self.facts[index] = previous;
            return Err(err);
        }

        debug!("event=fact_update module=repo backend=json status=ok id={id}");
        Ok(Some(self.facts[index].clone()))
    }

    fn delete_fact(&mut self, id: FactId) -> RepoResult<bool> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };

        let removed = self.facts.remove(index);

        if let Err(err) = self.save() {
            self.facts.insert(index, removed);
            return Err(err);
        }

        debug!("event=fact_delete module=repo backend=json status=ok id={id}");
        Ok(true)
    }
}

fn load_facts(path: &Path) -> RepoResult<Vec<Fact>> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!(
                "event=facts_load module=repo backend=json status=missing path={}",
                path.display()
            );
            return Ok(Vec::new());
        }
        Err(err) if err.kind() == ErrorKind::InvalidData => {
            warn!(
                "event=facts_load module=repo backend=json status=unparseable path={} error={}",
                path.display(),
                err
            );
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(RepoError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    match parse_document(&raw) {
        Ok(facts) => Ok(facts),
        Err(err) => {
            warn!(
                "event=facts_load module=repo backend=json status=unparseable path={} error={}",
                path.display(),
                err
            );
            Ok(Vec::new())
        }
    }
}

/// Parses a facts document, matching field names without regard to case.
fn parse_document(raw: &str) -> Result<Vec<Fact>, serde_json::Error> {
    let mut value: Value = serde_json::from_str(raw)?;
    canonicalize_document(&mut value);
    let document: FactsDocument = serde_json::from_value(value)?;
    Ok(document.facts)
}

fn canonicalize_document(value: &mut Value) {
    let Some(root) = value.as_object_mut() else {
        return;
    };
    canonicalize_keys(root, DOCUMENT_FIELDS);

    if let Some(Value::Array(items)) = root.get_mut("facts") {
        for item in items.iter_mut() {
            if let Some(object) = item.as_object_mut() {
                canonicalize_keys(object, FACT_FIELDS);
            }
        }
    }
}

fn canonicalize_keys(object: &mut Map<String, Value>, canonical: &[&str]) {
    let keys: Vec<String> = object.keys().cloned().collect();
    for key in keys {
        let Some(name) = canonical
            .iter()
            .find(|name| name.eq_ignore_ascii_case(&key))
        else {
            continue;
        };
        if key == *name {
            continue;
        }
        if let Some(value) = object.remove(&key) {
            object.insert((*name).to_string(), value);
        }
    }
}

fn write_document(path: &Path, facts: &[Fact]) -> RepoResult<()> {
    let json = serde_json::to_string_pretty(&FactsDocumentRef { facts })?;

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| RepoError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    std::fs::write(path, json).map_err(|source| RepoError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::{parse_document, JsonFactRepository};
    use crate::model::fact::FactDraft;
    use crate::repo::fact_repo::{FactRepository, RepoError};

    #[test]
    fn parse_document_matches_field_names_case_insensitively() {
        let raw = r#"{
            "Facts": [
                {
                    "ID": 4,
                    "Text": "Octopuses have three hearts",
                    "CATEGORY": "Nature",
                    "CreatedAt": "2024-05-01T12:00:00Z",
                    "IsVerified": true
                }
            ]
        }"#;

        let facts = parse_document(raw).unwrap();
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].id, 4);
        assert_eq!(facts[0].category, "Nature");
        assert!(facts[0].is_verified);
    }

    #[test]
    fn parse_document_treats_missing_facts_field_as_empty() {
        assert!(parse_document("{}").unwrap().is_empty());
        assert!(parse_document(r#"{"facts": 3}"#).is_err());
    }

    #[test]
    fn failed_rewrite_rolls_back_memory_and_keeps_next_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("facts.json");
        let mut repo = JsonFactRepository::open(&path).unwrap();

        // A directory at the target path makes every rewrite fail.
        std::fs::create_dir(&path).unwrap();
        let err = repo
            .create_fact(&FactDraft::new("blocked", "Test", false))
            .unwrap_err();
        assert!(matches!(err, RepoError::Io { .. }));
        assert!(repo.is_empty());

        std::fs::remove_dir(&path).unwrap();
        let created = repo
            .create_fact(&FactDraft::new("written", "Test", false))
            .unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn failed_rewrite_restores_updated_and_deleted_facts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("facts.json");
        let mut repo = JsonFactRepository::open(&path).unwrap();
        let created = repo
            .create_fact(&FactDraft::new("first draft", "Test", true))
            .unwrap();

        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        repo.update_fact(created.id, &FactDraft::new("changed", "Other", false))
            .unwrap_err();
        repo.delete_fact(created.id).unwrap_err();

        let current = repo.get_fact(created.id).unwrap().unwrap();
        assert_eq!(current, created);
    }
}
