//! Schema inference from cursor metadata

use super::types::{FieldMode, SchemaField, SchemaSpec, WarehouseType};
use crate::convert::map_type;
use crate::error::Result;
use crate::query::ColumnMeta;

/// Resolved schema file content
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaContent {
    /// Caller-supplied blob, emitted byte-for-byte
    Verbatim(String),
    /// Ordered field descriptors, serialized as a JSON array
    Fields(Vec<SchemaField>),
}

impl SchemaContent {
    /// Serialize to the bytes written into the schema file
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        match self {
            SchemaContent::Verbatim(blob) => Ok(blob.as_bytes().to_vec()),
            SchemaContent::Fields(fields) => Ok(serde_json::to_vec(fields)?),
        }
    }
}

/// Derive the schema for an export.
///
/// A caller-supplied spec wins: a raw blob passes through verbatim and an
/// explicit field list is used as-is. Otherwise each column's type comes from
/// the fixed type-code table and its mode from the source's nullable flag.
///
/// Calling this twice with the same inputs yields identical output.
pub fn infer(columns: &[ColumnMeta], explicit: Option<&SchemaSpec>) -> SchemaContent {
    let content = match explicit {
        Some(SchemaSpec::Raw(blob)) => SchemaContent::Verbatim(blob.clone()),
        Some(SchemaSpec::Fields(fields)) => SchemaContent::Fields(fields.clone()),
        None => SchemaContent::Fields(columns.iter().map(infer_field).collect()),
    };

    match &content {
        SchemaContent::Verbatim(blob) => {
            tracing::info!(schema = %blob, "using caller-supplied schema");
        }
        SchemaContent::Fields(fields) => {
            tracing::info!(
                schema = %serde_json::to_string(fields).unwrap_or_default(),
                "resolved export schema"
            );
        }
    }

    content
}

/// Infer a single column descriptor from source metadata.
///
/// Timestamps are always nullable: some source timestamp encodings hold
/// calendar values the driver cannot represent (e.g. 0000-00-00 00:00:00),
/// so the driver yields NULL even for columns it reports as non-null.
fn infer_field(column: &ColumnMeta) -> SchemaField {
    let field_type = map_type(column.type_code);
    let mode = if column.nullable || field_type == WarehouseType::Timestamp {
        FieldMode::Nullable
    } else {
        FieldMode::Required
    };
    SchemaField::new(&column.name, field_type, mode)
}
