//! Schema types

use serde::{Deserialize, Serialize};

/// Warehouse column type
///
/// The reduced type vocabulary the destination analytical system understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WarehouseType {
    Integer,
    Float,
    Timestamp,
    String,
}

impl std::fmt::Display for WarehouseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WarehouseType::Integer => write!(f, "INTEGER"),
            WarehouseType::Float => write!(f, "FLOAT"),
            WarehouseType::Timestamp => write!(f, "TIMESTAMP"),
            WarehouseType::String => write!(f, "STRING"),
        }
    }
}

/// Warehouse column mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldMode {
    Nullable,
    Required,
}

/// One column descriptor in a warehouse schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaField {
    /// Column name
    pub name: String,

    /// Warehouse column type
    #[serde(rename = "type")]
    pub field_type: WarehouseType,

    /// Column mode
    pub mode: FieldMode,
}

impl SchemaField {
    /// Create a new field descriptor
    pub fn new(name: impl Into<String>, field_type: WarehouseType, mode: FieldMode) -> Self {
        Self {
            name: name.into(),
            field_type,
            mode,
        }
    }

    /// Create a nullable field
    pub fn nullable(name: impl Into<String>, field_type: WarehouseType) -> Self {
        Self::new(name, field_type, FieldMode::Nullable)
    }

    /// Create a required field
    pub fn required(name: impl Into<String>, field_type: WarehouseType) -> Self {
        Self::new(name, field_type, FieldMode::Required)
    }
}

/// Caller-supplied schema override
///
/// Either a pre-serialized blob written to the schema file verbatim without
/// re-validation, or an explicit field list used as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaSpec {
    /// Explicit ordered field list
    Fields(Vec<SchemaField>),
    /// Pre-serialized schema file content
    Raw(String),
}
