//! Relation descriptors and the relation-value codec
//!
//! A dependent record links back to its owner by storing the string
//! `<table>~<id>` in one of its fields, either as a scalar or inside an array.

use serde::{Deserialize, Serialize};

/// Separator between table name and identifier in a relation value
pub const RELATION_SEPARATOR: char = '~';

/// Encode the relation value for record `id` of `table`
pub fn relation_value(table: &str, id: u64) -> String {
    format!("{}{}{}", table, RELATION_SEPARATOR, id)
}

/// Decode a relation value into `(table, id)`
///
/// Splits on the last separator so table names may contain `~` themselves.
pub fn parse_relation_value(value: &str) -> Option<(&str, u64)> {
    let (table, id) = value.rsplit_once(RELATION_SEPARATOR)?;
    Some((table, id.parse().ok()?))
}

/// How dependent records react when their owner is deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationMode {
    /// Drop the link, keep the dependent record
    Unset,
    /// Drop the dependent record once it no longer links anywhere
    Cascade,
}

/// Dependent table/field maintained when records of the owning table are deleted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    /// Dependent table
    pub table: String,
    /// Field of the dependent table holding relation values
    pub field: String,
    /// Cascade instead of unset
    #[serde(default)]
    pub delete: bool,
}

impl Relation {
    /// Relation that unsets the link on delete
    pub fn unset(table: impl Into<String>, field: impl Into<String>) -> Self {
        Relation {
            table: table.into(),
            field: field.into(),
            delete: false,
        }
    }

    /// Relation that deletes dependent records on delete
    pub fn cascade(table: impl Into<String>, field: impl Into<String>) -> Self {
        Relation {
            delete: true,
            ..Self::unset(table, field)
        }
    }

    /// Propagation mode selected by the `delete` flag
    pub fn mode(&self) -> RelationMode {
        if self.delete {
            RelationMode::Cascade
        } else {
            RelationMode::Unset
        }
    }
}
