//! Records and table documents
//!
//! A table is persisted as one [`TableDocument`]: the highest identifier ever
//! assigned, the table's own timestamps and the ordered list of records.
//!
//! ```json
//! {"maxid": 2, "created": "...", "modified": "...", "items": [{"_id": 1, ...}]}
//! ```

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reserved field holding the record identifier
pub const ID_FIELD: &str = "_id";
/// Reserved field holding the insertion timestamp
pub const CREATED_FIELD: &str = "_created";
/// Reserved field holding the last mutation timestamp
pub const MODIFIED_FIELD: &str = "_modified";
/// Fields that `update` never overwrites
pub const RESERVED_FIELDS: [&str; 3] = [ID_FIELD, CREATED_FIELD, MODIFIED_FIELD];

/// Current local time as an ISO-8601 string with offset, second precision
pub fn timestamp() -> String {
    chrono::Local::now()
        .format("%Y-%m-%dT%H:%M:%S%:z")
        .to_string()
}

/// One stored entity: field name to value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(BTreeMap<String, Value>);

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Record(BTreeMap::new())
    }

    /// Build a record from a JSON object
    ///
    /// Returns `None` if `json` is not an object.
    pub fn from_json(json: serde_json::Value) -> Option<Self> {
        match Value::from(json) {
            Value::Object(fields) => Some(Record(fields)),
            _ => None,
        }
    }

    /// Builder-style field setter
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    /// Get a field, `None` when absent
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Get a mutable reference to a field
    pub fn get_mut(&mut self, field: &str) -> Option<&mut Value> {
        self.0.get_mut(field)
    }

    /// Set a field, returning the previous value
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(field.into(), value.into())
    }

    /// Remove a field, returning its value
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    /// Check if a field is present
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Iterate over fields in key order
    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the record has no fields
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The record identifier, if assigned
    pub fn id(&self) -> Option<u64> {
        match self.get(ID_FIELD)? {
            Value::Int(i) => u64::try_from(*i).ok(),
            Value::Float(f) if f.fract() == 0.0 && *f >= 0.0 => Some(*f as u64),
            _ => None,
        }
    }

    /// Stamp identifier and both timestamps for a fresh insert
    pub fn stamp_inserted(&mut self, id: u64, now: &str) {
        self.set(ID_FIELD, id);
        self.set(CREATED_FIELD, now);
        self.set(MODIFIED_FIELD, now);
    }

    /// Copy every non-reserved field of `values` into this record and stamp `_modified`
    pub fn apply_values(&mut self, values: &Record, now: &str) {
        for (field, value) in values.fields() {
            if RESERVED_FIELDS.contains(&field.as_str()) {
                continue;
            }
            self.0.insert(field.clone(), value.clone());
        }
        self.set(MODIFIED_FIELD, now);
    }
}

impl From<BTreeMap<String, Value>> for Record {
    fn from(fields: BTreeMap<String, Value>) -> Self {
        Record(fields)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Object(record.0)
    }
}

/// Whole persisted state of one table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDocument {
    /// Highest `_id` ever assigned; never decreases except on truncate
    #[serde(default)]
    pub maxid: u64,
    /// Table creation timestamp
    #[serde(default)]
    pub created: String,
    /// Timestamp of the last persisted mutation
    #[serde(default)]
    pub modified: String,
    /// Records in insertion order
    #[serde(default)]
    pub items: Vec<Record>,
}

impl TableDocument {
    /// Create an empty document stamped with `now`
    pub fn new(now: &str) -> Self {
        TableDocument {
            maxid: 0,
            created: now.to_string(),
            modified: now.to_string(),
            items: Vec::new(),
        }
    }

    /// Allocate the next identifier
    pub fn next_id(&mut self) -> u64 {
        self.maxid += 1;
        self.maxid
    }

    /// Drop every record and reset the identifier counter
    pub fn clear(&mut self) {
        self.maxid = 0;
        self.items.clear();
    }

    /// Find a record by identifier
    pub fn find(&self, id: u64) -> Option<&Record> {
        self.items.iter().find(|item| item.id() == Some(id))
    }
}
