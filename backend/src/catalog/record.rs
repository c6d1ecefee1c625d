//! Cultivar records
//!
//! A record is one spreadsheet row kept as an open field map, so columns added
//! to the inventory flow through without code changes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Column holding the accession identifier
pub const ACCESSION_FIELD: &str = "ACCESSION";
/// Column holding the cultivar's display name
pub const CULTIVAR_NAME_FIELD: &str = "CULTIVAR NAME";
/// Derived field set when an image was matched
pub const IMAGE_URL_FIELD: &str = "image_url";

/// One catalog row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CultivarRecord {
    pub fields: Map<String, Value>,
}

impl CultivarRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Accession as text, empty if the column is absent
    pub fn accession(&self) -> String {
        self.text(ACCESSION_FIELD)
    }

    /// Cultivar name as text, empty if the column is absent
    pub fn cultivar_name(&self) -> String {
        self.text(CULTIVAR_NAME_FIELD)
    }

    /// Cultivar name in image filename form (spaces become underscores)
    pub fn filename_stem(&self) -> String {
        self.cultivar_name().replace(' ', "_")
    }

    pub fn image_url(&self) -> Option<&str> {
        self.fields.get(IMAGE_URL_FIELD).and_then(Value::as_str)
    }

    pub fn set_image_url(&mut self, url: String) {
        self.fields.insert(IMAGE_URL_FIELD.to_string(), Value::String(url));
    }

    /// Field value coerced to text
    pub fn text(&self, field: &str) -> String {
        self.fields.get(field).map(value_as_text).unwrap_or_default()
    }
}

impl TryFrom<Value> for CultivarRecord {
    type Error = anyhow::Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => anyhow::bail!("Expected a JSON object for a cultivar record, got {}", other),
        }
    }
}

impl From<CultivarRecord> for Value {
    fn from(record: CultivarRecord) -> Self {
        Value::Object(record.fields)
    }
}

/// Render a cell value as the text used for filename matching
pub fn value_as_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
