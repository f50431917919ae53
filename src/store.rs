use std::collections::BTreeMap;
use std::fs;
use std::io::Write;

use camino::Utf8Path;
use tempfile::Builder;

use crate::domain::Record;
use crate::error::IngestError;

/// In-memory paper collection keyed by raw arXiv id. At most one record per
/// id; the stored record always carries the highest version seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaperStore {
    papers: BTreeMap<String, Record>,
}

impl PaperStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Utf8Path) -> Result<Self, IngestError> {
        let content = fs::read(path.as_std_path()).map_err(|err| IngestError::StoreLoad {
            path: path.to_string(),
            message: err.to_string(),
        })?;
        let papers: BTreeMap<String, Record> =
            serde_json::from_slice(&content).map_err(|err| IngestError::StoreLoad {
                path: path.to_string(),
                message: err.to_string(),
            })?;
        if let Some((key, record)) = papers.iter().find(|(key, record)| **key != record.raw_id) {
            return Err(IngestError::StoreLoad {
                path: path.to_string(),
                message: format!("entry `{key}` holds record `{}`", record.raw_id),
            });
        }
        Ok(Self { papers })
    }

    /// Writes the whole store to a temp file beside `path`, then renames it
    /// over the target so a crash never truncates the previous snapshot.
    pub fn save(&self, path: &Utf8Path) -> Result<(), IngestError> {
        let save_err = |message: String| IngestError::StoreSave {
            path: path.to_string(),
            message,
        };
        let parent = match path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };
        fs::create_dir_all(parent.as_std_path()).map_err(|err| save_err(err.to_string()))?;

        let content =
            serde_json::to_vec(&self.papers).map_err(|err| save_err(err.to_string()))?;
        let mut temp = Builder::new()
            .prefix(".arxiv-ingest-store")
            .tempfile_in(parent.as_std_path())
            .map_err(|err| save_err(err.to_string()))?;
        temp.write_all(&content)
            .map_err(|err| save_err(err.to_string()))?;
        temp.as_file()
            .sync_all()
            .map_err(|err| save_err(err.to_string()))?;
        temp.persist(path.as_std_path())
            .map_err(|err| save_err(err.error.to_string()))?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.papers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }

    pub fn get(&self, raw_id: &str) -> Option<&Record> {
        self.papers.get(raw_id)
    }

    pub fn contains(&self, raw_id: &str) -> bool {
        self.papers.contains_key(raw_id)
    }

    /// Unconditional whole-record write; version policy lives in
    /// [`crate::merge`].
    pub(crate) fn put(&mut self, record: Record) {
        self.papers.insert(record.raw_id.clone(), record);
    }
}
