use enactml::agg_utils::{GroupByConfig, Reduction};
use enactml::chart_utils::{ChartData, ChartKind, ChartSelection};
use enactml::clean_utils::{CleaningConfig, MissingStrategy};
use enactml::dashboard_utils::{Dashboard, DashboardConfig};
use enactml::table_utils::ColumnType;

const UPLOAD: &[u8] = b"city,temp\npune,31\npune,31\nleh,2\ngoa,30\n";

fn dashboard() -> Dashboard {
    Dashboard::new(DashboardConfig::default())
}

#[test]
fn upload_loads_and_cleans_in_one_pass() {
    let mut dash = dashboard();
    let table = dash.upload(UPLOAD).unwrap();

    // The default policy drops duplicate rows.
    assert_eq!(table.row_count(), 3);
    assert_eq!(table.get_headers(), &["city".to_string(), "temp".to_string()]);
}

#[test]
fn accessors_require_an_upload_first() {
    let dash = dashboard();
    assert!(dash.current().is_err());
    assert!(dash.shape().is_err());
    assert!(dash.export_csv().is_err());
}

#[test]
fn preview_and_shape() {
    let mut dash = dashboard();
    dash.upload(UPLOAD).unwrap();

    assert_eq!(dash.shape().unwrap(), (3, 2));
    assert_eq!(dash.preview(2).unwrap().row_count(), 2);
    // preview_default follows config.preview_rows (5) but never exceeds the
    // table.
    assert_eq!(dash.preview_default().unwrap().row_count(), 3);
}

#[test]
fn column_types_pair_names_with_inferred_types() {
    let mut dash = dashboard();
    dash.upload(UPLOAD).unwrap();

    assert_eq!(
        dash.column_types().unwrap(),
        vec![
            ("city".to_string(), ColumnType::Text),
            ("temp".to_string(), ColumnType::Numeric),
        ]
    );
}

#[test]
fn statistics_panels_read_the_cleaned_table() {
    let mut dash = dashboard();
    dash.upload(b"city,temp\npune,10\nleh,\n").unwrap();

    let described = dash.describe().unwrap();
    assert_eq!(described.get_headers()[0], "statistic");

    let summary = dash.missing_summary().unwrap();
    assert_eq!(summary.rows()[1][1].render(), "1");
}

#[test]
fn group_by_and_pivot_pass_through() {
    let mut dash = dashboard();
    dash.upload(b"g,x\na,1\nb,2\na,3\n").unwrap();

    let request = GroupByConfig {
        group_by_column: "g".to_string(),
        value_column: "x".to_string(),
        reduction: Reduction::Mean,
    };
    let grouped = dash.group_by(&request).unwrap();
    assert_eq!(grouped, vec![("a".to_string(), 2.0), ("b".to_string(), 2.0)]);

    let pivoted = dash.pivot(&request).unwrap();
    assert_eq!(
        pivoted.get_headers(),
        &["g".to_string(), "MEAN(x)".to_string()]
    );
}

#[test]
fn chart_projects_the_cleaned_table() {
    let mut dash = dashboard();
    dash.upload(UPLOAD).unwrap();

    let data = dash
        .chart(ChartKind::PieChart, &ChartSelection::default())
        .unwrap();
    match data {
        ChartData::CategoryCounts { counts, .. } => {
            // The duplicate pune row was cleaned away before charting.
            assert_eq!(
                counts,
                vec![
                    ("pune".to_string(), 1),
                    ("leh".to_string(), 1),
                    ("goa".to_string(), 1),
                ]
            );
        }
        other => panic!("expected CategoryCounts, got {:?}", other),
    }
}

#[test]
fn export_is_utf8_csv_without_an_index_column() {
    let mut dash = dashboard();
    dash.upload(UPLOAD).unwrap();

    let exported = dash.export_csv().unwrap();
    let text = String::from_utf8(exported).unwrap();
    let mut lines = text.lines();

    assert_eq!(lines.next(), Some("city,temp"));
    assert_eq!(lines.next(), Some("pune,31"));
    assert_eq!(lines.next(), Some("leh,2"));
    assert_eq!(lines.next(), Some("goa,30"));
    assert_eq!(lines.next(), None);
}

#[test]
fn repeated_uploads_are_served_from_the_parse_cache() {
    let mut dash = dashboard();
    let first = dash.upload(UPLOAD).unwrap().clone();
    let second = dash.upload(UPLOAD).unwrap().clone();

    assert_eq!(first, second);
}

#[test]
fn cleaning_policy_is_configurable_per_dashboard() {
    let config = DashboardConfig {
        cleaning: CleaningConfig {
            drop_duplicates: false,
            missing_strategy: MissingStrategy::FillZero,
        },
        preview_rows: 5,
    };
    let mut dash = Dashboard::new(config);
    let table = dash.upload(b"g,x\na,1\na,1\nb,\n").unwrap();

    assert_eq!(table.row_count(), 3);
    assert_eq!(table.rows()[2][1].as_number(), Some(0.0));
}
