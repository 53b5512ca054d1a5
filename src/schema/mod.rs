//! Schema descriptors and inference
//!
//! # Overview
//!
//! The schema module provides:
//! - `SchemaField` - One warehouse column descriptor (name, type, mode)
//! - `SchemaSpec` - Caller-supplied schema (raw blob or explicit field list)
//! - `infer` - Derive a schema from cursor metadata when none is supplied

mod inference;
mod types;

pub use inference::{infer, SchemaContent};
pub use types::{FieldMode, SchemaField, SchemaSpec, WarehouseType};
