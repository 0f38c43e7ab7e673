use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::NaiveDate;
use parquet::column::writer::ColumnWriter;
use parquet::data_type::ByteArray;
use parquet::file::properties::WriterProperties;
use parquet::file::writer::SerializedFileWriter;
use parquet::schema::parser::parse_message_type;
use polars::df;
use polars::prelude::{self as pl, IpcWriter, NamedFrom, SerWriter};

use schema_inspector::inference::{ColumnNote, Role};
use schema_inspector::ingestion::{LoadOptions, TableFormat, load_table};
use schema_inspector::summary::summarize_table;
use schema_inspector::types::{DataType, Value};

fn tmp_file(name: &str, ext: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("schema-inspector-{name}-{nanos}.{ext}"))
}

/// Four rows: `account_id`, `opened` (DATE), `balance` (one null), `tier`.
fn write_accounts_parquet(path: &PathBuf) {
    let schema_str = r#"
    message schema {
      REQUIRED INT64 account_id;
      REQUIRED INT32 opened (DATE);
      OPTIONAL DOUBLE balance;
      REQUIRED BINARY tier (UTF8);
    }
    "#;
    let schema = Arc::new(parse_message_type(schema_str).unwrap());
    let props = Arc::new(WriterProperties::builder().build());
    let file = File::create(path).unwrap();
    let mut writer = SerializedFileWriter::new(file, schema, props).unwrap();

    let mut rg = writer.next_row_group().unwrap();
    while let Some(mut col) = rg.next_column().unwrap() {
        match col.untyped() {
            ColumnWriter::Int64ColumnWriter(w) => {
                w.write_batch(&[1_i64, 2, 3, 4], None, None).unwrap();
            }
            ColumnWriter::Int32ColumnWriter(w) => {
                w.write_batch(&[19_723_i32, 19_724, 19_724, 19_725], None, None).unwrap();
            }
            ColumnWriter::DoubleColumnWriter(w) => {
                // Definition level 0 marks the null in row three.
                w.write_batch(&[10.5_f64, 20.0, 30.25], Some(&[1, 1, 0, 1]), None)
                    .unwrap();
            }
            ColumnWriter::ByteArrayColumnWriter(w) => {
                let tiers: Vec<ByteArray> = ["gold", "silver", "gold", "gold"]
                    .into_iter()
                    .map(ByteArray::from)
                    .collect();
                w.write_batch(&tiers, None, None).unwrap();
            }
            _ => panic!("unexpected column writer in test"),
        }
        col.close().unwrap();
    }
    rg.close().unwrap();
    writer.close().unwrap();
}

#[test]
fn parquet_types_come_from_the_file_schema() {
    let path = tmp_file("accounts", "parquet");
    write_accounts_parquet(&path);

    let ds = load_table(&path, &LoadOptions::default()).unwrap();
    let types: Vec<DataType> = ds.schema.fields.iter().map(|f| f.data_type).collect();
    assert_eq!(
        types,
        vec![DataType::Int64, DataType::Date, DataType::Float64, DataType::Utf8]
    );
    assert_eq!(ds.row_count(), 4);
    assert_eq!(ds.rows[0][1], Value::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()));
    assert_eq!(ds.rows[2][2], Value::Null);

    let _ = fs::remove_file(&path);
}

#[test]
fn parquet_summary_reports_coverage_and_roles() {
    let path = tmp_file("accounts-summary", "parquet");
    write_accounts_parquet(&path);

    let summary = summarize_table(&path, None, &LoadOptions::default()).unwrap();
    let roles: Vec<Role> = summary.columns.iter().map(|c| c.role).collect();
    assert_eq!(roles, vec![Role::Id, Role::Datetime, Role::Numeric, Role::Categorical]);

    let balance = &summary.columns[2];
    assert_eq!(balance.coverage_pct, 75.0);
    assert_eq!(balance.distinct_count, 4);
    assert_eq!(balance.examples, vec!["10.5", "20.0", "30.25"]);

    let tier = &summary.columns[3];
    assert_eq!(tier.distinct_count, 2);
    assert_eq!(tier.examples, vec!["gold", "silver"]);

    let _ = fs::remove_file(&path);
}

#[test]
fn parquet_ignores_the_row_cap() {
    let path = tmp_file("accounts-cap", "parquet");
    write_accounts_parquet(&path);

    let opts = LoadOptions {
        sample_rows: Some(1),
        ..Default::default()
    };
    assert_eq!(load_table(&path, &opts).unwrap().row_count(), 4);

    let _ = fs::remove_file(&path);
}

/// Timestamps annotated only with a logical type, the way pandas writes `datetime64[ns]`.
fn write_events_parquet(path: &PathBuf) {
    let schema_str = r#"
    message schema {
      REQUIRED INT64 created (TIMESTAMP(NANOS,false));
      REQUIRED INT64 updated (TIMESTAMP(MICROS,false));
      REQUIRED INT64 clicks;
    }
    "#;
    let schema = Arc::new(parse_message_type(schema_str).unwrap());
    let props = Arc::new(WriterProperties::builder().build());
    let file = File::create(path).unwrap();
    let mut writer = SerializedFileWriter::new(file, schema, props).unwrap();

    let columns: [&[i64]; 3] = [
        &[1_704_067_200_000_000_000, 1_704_153_600_000_000_000, 1_704_240_000_500_000_000],
        &[1_704_067_200_000_000, 1_704_153_600_000_000, 1_704_240_000_000_000],
        &[3, 9, 4],
    ];
    let mut rg = writer.next_row_group().unwrap();
    let mut idx = 0;
    while let Some(mut col) = rg.next_column().unwrap() {
        match col.untyped() {
            ColumnWriter::Int64ColumnWriter(w) => {
                w.write_batch(columns[idx], None, None).unwrap();
            }
            _ => panic!("unexpected column writer in test"),
        }
        col.close().unwrap();
        idx += 1;
    }
    rg.close().unwrap();
    writer.close().unwrap();
}

#[test]
fn parquet_logical_timestamps_are_datetimes() {
    let path = tmp_file("events", "parquet");
    write_events_parquet(&path);

    let ds = load_table(&path, &LoadOptions::default()).unwrap();
    let types: Vec<DataType> = ds.schema.fields.iter().map(|f| f.data_type).collect();
    assert_eq!(types, vec![DataType::DateTime, DataType::DateTime, DataType::Int64]);
    let new_year = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
    assert_eq!(ds.rows[0][0], Value::DateTime(new_year));
    assert_eq!(ds.rows[0][1], Value::DateTime(new_year));

    let summary = summarize_table(&path, None, &LoadOptions::default()).unwrap();
    let created = &summary.columns[0];
    assert_eq!(created.role, Role::Datetime);
    assert_eq!(
        created.examples,
        vec!["2024-01-01 00:00:00", "2024-01-02 00:00:00", "2024-01-03 00:00:00.500"]
    );
    assert_eq!(summary.columns[1].role, Role::Datetime);
    assert_eq!(summary.columns[2].role, Role::Numeric);

    let _ = fs::remove_file(&path);
}

fn write_feather(path: &PathBuf) {
    let mut df = df!(
        "session_uuid" => &["a1", "b2", "c3"],
        "opened" => &[19_723_i32, 19_724, 19_725],
        "conversion_rate" => &[Some(0.5_f64), None, Some(0.25)],
        "premium" => &[true, false, true],
        "visits" => &[7_i32, 7, 7],
    )
    .unwrap();
    // Same name, so the date column replaces the raw day counts in place.
    let opened = pl::Series::new("opened".into(), &[19_723_i32, 19_724, 19_725])
        .cast(&pl::DataType::Date)
        .unwrap();
    df.with_column(opened.into()).unwrap();

    let mut file = File::create(path).unwrap();
    IpcWriter::new(&mut file).finish(&mut df).unwrap();
}

#[test]
fn feather_dtypes_map_onto_table_types() {
    let path = tmp_file("sessions", "feather");
    write_feather(&path);

    let ds = load_table(&path, &LoadOptions::default()).unwrap();
    let types: Vec<DataType> = ds.schema.fields.iter().map(|f| f.data_type).collect();
    assert_eq!(
        types,
        vec![
            DataType::Utf8,
            DataType::Date,
            DataType::Float64,
            DataType::Bool,
            DataType::Int64
        ]
    );
    assert_eq!(ds.rows[1][2], Value::Null);
    assert_eq!(ds.rows[2][1], Value::Date(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()));

    let _ = fs::remove_file(&path);
}

#[test]
fn feather_summary_notes() {
    let path = tmp_file("sessions-summary", "feather");
    write_feather(&path);

    let opts = LoadOptions {
        format: Some(TableFormat::Feather),
        ..Default::default()
    };
    let summary = summarize_table(&path, None, &opts).unwrap();
    let by_name = |name: &str| summary.columns.iter().find(|c| c.name == name).unwrap();

    assert_eq!(by_name("session_uuid").role, Role::Id);
    assert_eq!(by_name("opened").role, Role::Datetime);
    let rate = by_name("conversion_rate");
    assert_eq!(rate.role, Role::Numeric);
    assert!(rate.notes.contains(&ColumnNote::CheckPercentageScale));
    assert_eq!(by_name("premium").role, Role::Binary);
    assert_eq!(by_name("visits").notes, vec![ColumnNote::ConstantColumn]);

    let _ = fs::remove_file(&path);
}
