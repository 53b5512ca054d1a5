//! Integration tests for the full export flow
//!
//! Tests run YAML job → query → encode → spool files → local upload

use offload::config::load_job_from_str;
use offload::convert::type_code;
use offload::export::Exporter;
use offload::query::{ColumnMeta, MemorySource};
use offload::types::Cell;
use offload::CloudDestination;
use pretty_assertions::assert_eq;

fn read(file: &offload::output::SpoolFile) -> String {
    std::fs::read_to_string(file.path()).unwrap()
}

fn orders_source() -> MemorySource {
    MemorySource::new(
        vec![
            ColumnMeta::new("id", type_code::LONG, false),
            ColumnMeta::new("customer", type_code::VAR_STRING, true),
            ColumnMeta::new("total", type_code::NEWDECIMAL, true),
            ColumnMeta::new("placed_at", type_code::DATETIME, true),
        ],
        vec![
            vec![
                Cell::Integer(1),
                Cell::Text("alice".into()),
                Cell::Decimal("19.99".into()),
                Cell::DateTime("2021-06-01T12:00:00".parse().unwrap()),
            ],
            vec![
                Cell::Integer(2),
                Cell::Text("bob".into()),
                Cell::Null,
                Cell::Null,
            ],
            vec![
                Cell::Integer(3),
                Cell::Null,
                Cell::Decimal("5.00".into()),
                Cell::DateTime("2021-06-02T00:00:00".parse().unwrap()),
            ],
        ],
    )
}

// ============================================================================
// JSON export
// ============================================================================

#[test]
fn json_export_end_to_end() {
    let job_file = load_job_from_str(
        r#"
source:
  engine: duckdb
  database: ":memory:"
destination: /tmp/unused
sql: SELECT * FROM orders
filename: orders_{}.json
schema_filename: orders_schema.json
"#,
    )
    .unwrap();

    let mut source = orders_source();
    let report = Exporter::new(job_file.job).run(&mut source).unwrap();

    assert_eq!(report.rows, 3);
    assert_eq!(report.files.len(), 2);

    // Decimals are floats, datetimes are epoch seconds, keys sorted
    assert_eq!(
        read(&report.files[0]),
        "{\"customer\":\"alice\",\"id\":1,\"placed_at\":1622548800,\"total\":19.99}\n\
         {\"customer\":\"bob\",\"id\":2,\"placed_at\":null,\"total\":null}\n\
         {\"customer\":null,\"id\":3,\"placed_at\":1622592000,\"total\":5.0}\n"
    );

    let schema: serde_json::Value = serde_json::from_str(&read(&report.files[1])).unwrap();
    assert_eq!(
        schema,
        serde_json::json!([
            {"name": "id", "type": "INTEGER", "mode": "REQUIRED"},
            {"name": "customer", "type": "STRING", "mode": "NULLABLE"},
            {"name": "total", "type": "FLOAT", "mode": "NULLABLE"},
            {"name": "placed_at", "type": "TIMESTAMP", "mode": "NULLABLE"},
        ])
    );
}

#[test]
fn json_export_rolls_over_small_threshold() {
    let job_file = load_job_from_str(
        r#"
source:
  engine: duckdb
  database: ":memory:"
destination: /tmp/unused
sql: SELECT * FROM orders
filename: orders_{}.json
approx_max_file_size_bytes: 10
"#,
    )
    .unwrap();

    let mut source = orders_source();
    let report = Exporter::new(job_file.job).run(&mut source).unwrap();

    // Every row exceeds the threshold on its own: one row per file, plus
    // the empty trailing file sealed by the final rollover.
    assert_eq!(report.files.len(), 4);
    let names: Vec<&str> = report
        .files
        .iter()
        .map(|f| f.object_name.as_str())
        .collect();
    assert_eq!(
        names,
        vec![
            "orders_0.json",
            "orders_1.json",
            "orders_2.json",
            "orders_3.json"
        ]
    );
    for file in &report.files[..3] {
        let content = read(file);
        assert_eq!(content.lines().count(), 1);
        assert!(content.ends_with('\n'));
    }
    assert_eq!(report.files[3].bytes, 0);
}

#[test]
fn empty_result_produces_single_empty_file() {
    let job_file = load_job_from_str(
        r#"
source:
  engine: duckdb
  database: ":memory:"
destination: /tmp/unused
sql: SELECT * FROM orders WHERE 1 = 0
filename: empty_{}.json
"#,
    )
    .unwrap();

    let mut source = MemorySource::new(
        vec![ColumnMeta::new("id", type_code::LONG, false)],
        vec![],
    );
    let report = Exporter::new(job_file.job).run(&mut source).unwrap();

    assert_eq!(report.rows, 0);
    assert_eq!(report.files.len(), 1);
    assert_eq!(report.files[0].object_name, "empty_0.json");
    assert_eq!(read(&report.files[0]), "");
}

// ============================================================================
// CSV export
// ============================================================================

#[test]
fn csv_export_with_header_and_rollover() {
    let job_file = load_job_from_str(
        r#"
source:
  engine: duckdb
  database: ":memory:"
destination: /tmp/unused
sql: SELECT * FROM orders
filename: orders_{}.csv
approx_max_file_size_bytes: 60
export_format:
  file_format: csv
  csv_include_header: true
"#,
    )
    .unwrap();

    let mut source = orders_source();
    let report = Exporter::new(job_file.job).run(&mut source).unwrap();

    assert_eq!(report.mime_type, "application/csv");
    assert!(report.files.len() >= 2);

    let header = "id,customer,total,placed_at";
    let mut rows_seen = Vec::new();
    for file in &report.files {
        let content = read(file);
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some(header));
        rows_seen.extend(lines.map(String::from));
    }
    assert_eq!(
        rows_seen,
        vec![
            "1,alice,19.99,1622548800",
            "2,bob,,",
            "3,,5,1622592000",
        ]
    );
}

#[test]
fn explicit_schema_blob_written_verbatim() {
    let blob = "[{\"name\": \"id\", \"type\": \"INTEGER\", \"mode\": \"REQUIRED\"}]";
    let job_file = load_job_from_str(&format!(
        r#"
source:
  engine: duckdb
  database: ":memory:"
destination: /tmp/unused
sql: SELECT * FROM orders
filename: orders_{{}}.json
schema_filename: schema.json
schema: '{blob}'
"#
    ))
    .unwrap();

    let mut source = orders_source();
    let report = Exporter::new(job_file.job).run(&mut source).unwrap();

    let schema_file = report.files.last().unwrap();
    assert_eq!(schema_file.object_name, "schema.json");
    assert_eq!(read(schema_file), blob);
}

#[test]
fn duckdb_export_booleans_and_hugeints_load_under_inferred_schema() {
    let job_file = load_job_from_str(
        r#"
source:
  engine: duckdb
  database: ":memory:"
destination: /tmp/unused
sql: SELECT TRUE AS flag, 9223372036854775808::HUGEINT AS big
filename: wide_{}.json
schema_filename: wide_schema.json
"#,
    )
    .unwrap();

    let mut source = offload::DuckDbSource::connect(&job_file.source).unwrap();
    let report = Exporter::new(job_file.job).run(&mut source).unwrap();

    let row: serde_json::Value = serde_json::from_str(read(&report.files[0]).trim()).unwrap();
    assert_eq!(row["flag"], serde_json::json!(1));
    assert_eq!(row["big"].as_f64(), Some(9.223372036854776e18));

    let schema: serde_json::Value = serde_json::from_str(&read(&report.files[1])).unwrap();
    assert_eq!(schema[0]["type"], "INTEGER");
    assert_eq!(schema[1]["type"], "FLOAT");
}

// ============================================================================
// Upload
// ============================================================================

#[tokio::test]
async fn upload_to_local_destination() {
    let job_file = load_job_from_str(
        r#"
source:
  engine: duckdb
  database: ":memory:"
destination: /tmp/unused
sql: SELECT * FROM orders
filename: orders_{}.json
schema_filename: orders_schema.json
"#,
    )
    .unwrap();

    let mut source = orders_source();
    let exporter = Exporter::new(job_file.job);
    let report = exporter.run(&mut source).unwrap();

    let dest_dir = tempfile::tempdir().unwrap();
    let dest = CloudDestination::parse(dest_dir.path().to_str().unwrap()).unwrap();
    exporter.upload(&report.files, &dest).await.unwrap();

    for file in &report.files {
        let uploaded =
            std::fs::read_to_string(dest_dir.path().join(&file.object_name)).unwrap();
        assert_eq!(uploaded, read(file));
    }
}
