use enactml::error::EnactError;
use enactml::table_utils::{Cell, ColumnType, Table, TableConverter};
use std::io::Write;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn loads_headers_types_and_cells() {
    let table = Table::from_csv_bytes(b"city,temp\npune,31\nleh,2\n").unwrap();

    assert_eq!(table.get_headers(), &["city".to_string(), "temp".to_string()]);
    assert_eq!(
        table.get_column_types(),
        &[ColumnType::Text, ColumnType::Numeric]
    );
    assert_eq!(table.shape(), (2, 2));
    assert_eq!(table.rows()[0][0], Cell::Text("pune".to_string()));
    assert_eq!(table.rows()[1][1], Cell::Number(2.0));
}

#[test]
fn accepts_any_byte_value_when_decoding() {
    // 0xE9 is é in WINDOWS-1252 and would be rejected by a strict UTF-8
    // decode.
    let mut bytes = b"name,score\ncaf".to_vec();
    bytes.push(0xE9);
    bytes.extend_from_slice(b",4\n");

    let table = Table::from_csv_bytes(&bytes).unwrap();
    assert_eq!(table.rows()[0][0], Cell::Text("café".to_string()));
}

#[test]
fn sentinel_tokens_and_empty_cells_become_missing() {
    let table =
        Table::from_csv_bytes(b"a,b,c\n1,NA,x\n2,,y\n3,N/A,null\n").unwrap();

    assert_eq!(table.rows()[0][1], Cell::Missing);
    assert_eq!(table.rows()[1][1], Cell::Missing);
    assert_eq!(table.rows()[2][1], Cell::Missing);
    assert_eq!(table.rows()[2][2], Cell::Missing);
    // Column b never sees a non-missing cell, so it infers numeric.
    assert_eq!(table.get_column_types()[1], ColumnType::Numeric);
}

#[test]
fn whitespace_only_cells_become_missing() {
    let table = Table::from_raw_data(
        vec!["a".to_string()],
        vec![vec!["   ".to_string()], vec!["7".to_string()]],
    )
    .unwrap();
    assert_eq!(table.rows()[0][0], Cell::Missing);
    assert_eq!(table.rows()[1][0], Cell::Number(7.0));
}

#[test]
fn mixed_column_infers_text() {
    let table = Table::from_csv_bytes(b"v\n1\ntwo\n3\n").unwrap();
    assert_eq!(table.get_column_types()[0], ColumnType::Text);
    // Numbers in a text column stay textual.
    assert_eq!(table.rows()[0][0], Cell::Text("1".to_string()));
}

#[test]
fn short_rows_are_padded_with_missing() {
    let table = Table::from_csv_bytes(b"a,b,c\n1,2\n").unwrap();
    assert_eq!(table.shape(), (1, 3));
    assert_eq!(table.rows()[0][2], Cell::Missing);
}

#[test]
fn wide_rows_are_malformed_input() {
    let result = Table::from_csv_bytes(b"a,b\n1,2,3\n");
    assert!(matches!(result, Err(EnactError::MalformedInput(_))));
}

#[test]
fn empty_input_is_malformed() {
    assert!(matches!(
        Table::from_csv_bytes(b""),
        Err(EnactError::MalformedInput(_))
    ));
}

#[test]
fn duplicate_headers_are_rejected() {
    let result = Table::from_csv_bytes(b"a,a\n1,2\n");
    assert!(matches!(result, Err(EnactError::MalformedInput(_))));
}

#[test]
fn round_trip_preserves_headers_rows_and_cells() {
    let table = Table::from_raw_data(
        vec!["city".to_string(), "temp".to_string(), "note".to_string()],
        vec![
            vec!["pune".to_string(), "31.5".to_string(), "warm".to_string()],
            vec!["leh".to_string(), "".to_string(), "cold".to_string()],
            vec!["goa".to_string(), "30".to_string(), "".to_string()],
        ],
    )
    .unwrap();

    let written = table.to_csv_string().unwrap();
    let reloaded = Table::from_csv_bytes(written.as_bytes()).unwrap();

    assert_eq!(reloaded, table);
}

#[test]
fn save_as_and_from_csv_path_round_trip() {
    let table = Table::from_csv_bytes(b"k,v\nalpha,1\nbeta,2\n").unwrap();

    let mut tmp = tempfile::Builder::new()
        .prefix("enactml_test")
        .suffix(".csv")
        .tempfile()
        .expect("failed to create temporary file");
    tmp.flush().unwrap();
    let path = tmp.path().to_str().unwrap().to_string();

    table.save_as(&path).unwrap();
    let reloaded = Table::from_csv_path(&path).unwrap();
    assert_eq!(reloaded, table);
}

#[test]
fn column_statistics() {
    let table = Table::from_raw_data(
        vec!["date".to_string(), "temperature".to_string()],
        vec![
            vec!["2023-01-30".to_string(), "23.5".to_string()],
            vec!["2023-01-30".to_string(), "24.1".to_string()],
            vec!["2023-02-01".to_string(), "19.0".to_string()],
            vec!["2023-02-02".to_string(), "".to_string()],
        ],
    )
    .unwrap();

    assert!(close(table.get_mean("temperature").unwrap(), 66.6 / 3.0));
    assert!(close(table.get_sum("temperature").unwrap(), 66.6));
    assert!(close(table.get_min("temperature").unwrap(), 19.0));
    assert!(close(table.get_max("temperature").unwrap(), 24.1));
    assert_eq!(table.get_count("temperature"), Some(3));
    assert_eq!(table.get_missing_count("temperature"), Some(1));
    assert_eq!(table.get_mode("date").unwrap(), "2023-01-30");
    assert!(table.get_standard_deviation("temperature").unwrap() > 0.0);
    assert_eq!(table.get_mean("missing_column"), None);
}

#[test]
fn find_column_suggests_close_header() {
    let table = Table::from_csv_bytes(b"temperature,city\n1,x\n").unwrap();
    match table.find_column("temprature") {
        Err(EnactError::ColumnNotFound { column, suggestion }) => {
            assert_eq!(column, "temprature");
            assert_eq!(suggestion.as_deref(), Some("temperature"));
        }
        other => panic!("expected ColumnNotFound, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn column_partitions() {
    let table = Table::from_csv_bytes(b"a,b,c\nx,1,2\ny,3,4\n").unwrap();
    assert_eq!(table.numeric_columns(), vec!["b", "c"]);
    assert_eq!(table.categorical_columns(), vec!["a"]);
}

#[test]
fn head_and_drop_columns() {
    let table = Table::from_csv_bytes(b"a,b\n1,x\n2,y\n3,z\n").unwrap();

    let head = table.head(2);
    assert_eq!(head.row_count(), 2);
    assert_eq!(head.get_headers(), table.get_headers());

    let dropped = table.drop_columns(&["b", "nope"]);
    assert_eq!(dropped.get_headers(), &["a".to_string()]);
    assert_eq!(dropped.row_count(), 3);
}

#[test]
fn get_unique_keeps_first_seen_order() {
    let table = Table::from_csv_bytes(b"g\nb\na\nb\nc\n").unwrap();
    assert_eq!(table.get_unique("g").unwrap(), vec!["b", "a", "c"]);
}

#[test]
fn describe_builds_a_statistics_grid() {
    let table = Table::from_csv_bytes(b"city,temp\npune,10\npune,20\nleh,\n").unwrap();
    let described = table.describe().unwrap();

    assert_eq!(described.get_headers()[0], "statistic");
    let labels: Vec<String> = described
        .rows()
        .iter()
        .map(|row| row[0].render())
        .collect();
    assert_eq!(
        labels,
        vec!["count", "unique", "top", "mean", "std", "min", "max"]
    );

    // count row: city has 3 values, temp has 2 non-missing.
    assert_eq!(described.rows()[0][1].render(), "3");
    assert_eq!(described.rows()[0][2].render(), "2");
    // top of city is the modal value.
    assert_eq!(described.rows()[2][1].render(), "pune");
    // mean of temp is 15.
    assert_eq!(described.rows()[3][2].render(), "15");
}

#[test]
fn missing_summary_counts_per_column() {
    let table = Table::from_csv_bytes(b"a,b\n1,\n2,x\n,\n").unwrap();
    let summary = table.missing_summary().unwrap();

    assert_eq!(
        summary.get_headers(),
        &["Column".to_string(), "Missing Values".to_string()]
    );
    assert_eq!(summary.rows()[0][0].render(), "a");
    assert_eq!(summary.rows()[0][1], Cell::Number(1.0));
    assert_eq!(summary.rows()[1][1], Cell::Number(2.0));
}

#[test]
fn converts_json_arrays() {
    let json_data = r#"[
        {"name": "Alice", "age": "30"},
        {"name": "Bob", "age": "25"},
        {"name": "Carol"}
    ]"#;

    let table = TableConverter::from_json(json_data).unwrap();
    assert_eq!(table.row_count(), 3);
    assert!(table.get_headers().contains(&"name".to_string()));
    assert!(table.get_headers().contains(&"age".to_string()));

    let age_idx = table.find_column("age").unwrap();
    assert_eq!(table.rows()[2][age_idx], Cell::Missing);
}

#[test]
fn rejects_non_array_json() {
    assert!(TableConverter::from_json(r#"{"a": 1}"#).is_err());
}
