use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::IngestError;

/// Version-independent paper identifier plus the revision number, as carried
/// by the trailing segment of an entry URL (`http://arxiv.org/abs/1512.08756v2`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PaperId {
    raw_id: String,
    version: u32,
}

impl PaperId {
    pub fn raw_id(&self) -> &str {
        &self.raw_id
    }

    pub fn version(&self) -> u32 {
        self.version
    }
}

impl fmt::Display for PaperId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.raw_id, self.version)
    }
}

impl FromStr for PaperId {
    type Err = IngestError;

    fn from_str(url: &str) -> Result<Self, Self::Err> {
        let id_version = match url.rfind('/') {
            Some(ix) => &url[ix + 1..],
            None => url,
        };
        let parts = id_version.split('v').collect::<Vec<_>>();
        let [raw_id, version] = parts.as_slice() else {
            return Err(IngestError::InvalidEntryUrl(url.to_string()));
        };
        if raw_id.is_empty() {
            return Err(IngestError::InvalidEntryUrl(url.to_string()));
        }
        let version = version
            .parse::<u32>()
            .ok()
            .filter(|version| *version > 0)
            .ok_or_else(|| IngestError::InvalidEntryUrl(url.to_string()))?;
        Ok(Self {
            raw_id: raw_id.to_string(),
            version,
        })
    }
}

pub fn parse_arxiv_url(url: &str) -> Result<PaperId, IngestError> {
    url.parse()
}

/// One normalized feed entry. Passthrough fields from the feed are kept as-is
/// in `fields`; the derived identifier and version sit beside them when
/// serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "_rawid")]
    pub raw_id: String,
    #[serde(rename = "_version")]
    pub version: u32,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    pub fn new(id: PaperId, fields: Map<String, Value>) -> Self {
        Self {
            raw_id: id.raw_id,
            version: id.version,
            fields,
        }
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn id(&self) -> Option<&str> {
        self.text_field("id")
    }

    pub fn updated(&self) -> Option<&str> {
        self.text_field("updated")
    }

    pub fn title(&self) -> Option<&str> {
        self.text_field("title")
    }

    fn text_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}
