//! Warehouse-safe type conversion
//!
//! Maps source-system values and declared field type codes into the reduced
//! value and type vocabulary the destination warehouse understands.

use crate::schema::WarehouseType;
use crate::types::Cell;
use chrono::NaiveTime;

/// Field type codes as reported by MySQL-protocol drivers.
///
/// Only the codes the mapping table cares about are named; anything else
/// falls through to STRING.
pub mod type_code {
    pub const DECIMAL: u32 = 0;
    pub const TINY: u32 = 1;
    pub const SHORT: u32 = 2;
    pub const LONG: u32 = 3;
    pub const FLOAT: u32 = 4;
    pub const DOUBLE: u32 = 5;
    pub const TIMESTAMP: u32 = 7;
    pub const LONGLONG: u32 = 8;
    pub const INT24: u32 = 9;
    pub const DATE: u32 = 10;
    pub const TIME: u32 = 11;
    pub const DATETIME: u32 = 12;
    pub const YEAR: u32 = 13;
    pub const BIT: u32 = 16;
    pub const NEWDECIMAL: u32 = 246;
    pub const BLOB: u32 = 252;
    pub const VAR_STRING: u32 = 253;
    pub const STRING: u32 = 254;
}

/// Map a source field type code to its warehouse type.
///
/// Total over all inputs: unrecognized codes map to STRING, never an error.
pub fn map_type(code: u32) -> WarehouseType {
    use type_code::{
        BIT, DATE, DATETIME, DECIMAL, DOUBLE, FLOAT, INT24, LONG, LONGLONG, NEWDECIMAL, SHORT,
        TIMESTAMP, TINY, YEAR,
    };
    match code {
        TINY | SHORT | LONG | LONGLONG | INT24 | BIT | YEAR => WarehouseType::Integer,
        DECIMAL | NEWDECIMAL | DOUBLE | FLOAT => WarehouseType::Float,
        DATE | DATETIME | TIMESTAMP => WarehouseType::Timestamp,
        _ => WarehouseType::String,
    }
}

/// Convert a row cell into a warehouse-safe value.
///
/// Dates and datetimes become Unix epoch seconds computed from their naive
/// wall-clock calendar fields. This matches the sending system's naive
/// calendar, not true UTC when the source runs in a different timezone, so
/// callers must not assume timezone correctness beyond what the source
/// guarantees. Decimals become the nearest floating point number; the small
/// precision loss is acceptable at the warehouse's field size. Everything
/// else passes through unchanged.
pub fn convert(cell: Cell, code: u32) -> Cell {
    match cell {
        Cell::Date(d) => Cell::Integer(d.and_time(NaiveTime::MIN).and_utc().timestamp()),
        Cell::DateTime(dt) => Cell::Integer(dt.and_utc().timestamp()),
        Cell::Decimal(d) => floatify(d),
        // Drivers frequently return decimal columns as text; the declared
        // type code tells us to floatify them anyway.
        Cell::Text(s) if is_decimal_code(code) => floatify(s),
        other => other,
    }
}

fn is_decimal_code(code: u32) -> bool {
    code == type_code::DECIMAL || code == type_code::NEWDECIMAL
}

fn floatify(text: String) -> Cell {
    match text.parse::<f64>() {
        Ok(f) => Cell::Float(f),
        Err(_) => Cell::Text(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use test_case::test_case;

    #[test_case(type_code::TINY, WarehouseType::Integer; "tiny")]
    #[test_case(type_code::SHORT, WarehouseType::Integer; "short")]
    #[test_case(type_code::LONG, WarehouseType::Integer; "long")]
    #[test_case(type_code::LONGLONG, WarehouseType::Integer; "longlong")]
    #[test_case(type_code::INT24, WarehouseType::Integer; "int24")]
    #[test_case(type_code::BIT, WarehouseType::Integer; "bit")]
    #[test_case(type_code::YEAR, WarehouseType::Integer; "year")]
    #[test_case(type_code::DECIMAL, WarehouseType::Float; "decimal")]
    #[test_case(type_code::NEWDECIMAL, WarehouseType::Float; "newdecimal")]
    #[test_case(type_code::FLOAT, WarehouseType::Float; "float")]
    #[test_case(type_code::DOUBLE, WarehouseType::Float; "double")]
    #[test_case(type_code::DATE, WarehouseType::Timestamp; "date")]
    #[test_case(type_code::DATETIME, WarehouseType::Timestamp; "datetime")]
    #[test_case(type_code::TIMESTAMP, WarehouseType::Timestamp; "timestamp")]
    #[test_case(type_code::VAR_STRING, WarehouseType::String; "var_string")]
    #[test_case(type_code::BLOB, WarehouseType::String; "blob")]
    #[test_case(type_code::TIME, WarehouseType::String; "time")]
    fn test_map_type_table(code: u32, expected: WarehouseType) {
        assert_eq!(map_type(code), expected);
    }

    #[test]
    fn test_map_type_unknown_defaults_to_string() {
        assert_eq!(map_type(9999), WarehouseType::String);
        assert_eq!(map_type(u32::MAX), WarehouseType::String);
    }

    #[test]
    fn test_convert_date_to_epoch() {
        let d = NaiveDate::from_ymd_opt(1970, 1, 2).unwrap();
        assert_eq!(
            convert(Cell::Date(d), type_code::DATE),
            Cell::Integer(86_400)
        );
    }

    #[test]
    fn test_convert_datetime_to_epoch() {
        let dt: NaiveDateTime = "2021-06-01T12:00:00".parse().unwrap();
        assert_eq!(
            convert(Cell::DateTime(dt), type_code::DATETIME),
            Cell::Integer(1_622_548_800)
        );
    }

    #[test]
    fn test_convert_decimal_to_float() {
        assert_eq!(
            convert(Cell::Decimal("10.25".into()), type_code::NEWDECIMAL),
            Cell::Float(10.25)
        );
        // Text reported under a decimal type code converts too
        assert_eq!(
            convert(Cell::Text("3.5".into()), type_code::DECIMAL),
            Cell::Float(3.5)
        );
        // Text under a non-decimal code passes through
        assert_eq!(
            convert(Cell::Text("3.5".into()), type_code::VAR_STRING),
            Cell::Text("3.5".into())
        );
    }

    #[test]
    fn test_convert_passthrough() {
        assert_eq!(convert(Cell::Null, 0), Cell::Null);
        assert_eq!(
            convert(Cell::Integer(5), type_code::LONG),
            Cell::Integer(5)
        );
        assert_eq!(
            convert(Cell::Text("x".into()), type_code::STRING),
            Cell::Text("x".into())
        );
    }

    #[test]
    fn test_convert_unparseable_decimal_stays_text() {
        assert_eq!(
            convert(Cell::Decimal("not-a-number".into()), type_code::DECIMAL),
            Cell::Text("not-a-number".into())
        );
    }
}
