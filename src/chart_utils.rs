// chart_utils.rs
use crate::error::EnactError;
use crate::table_utils::{Cell, Table};
use serde::Serialize;

/// The chart kinds the dashboard page offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    AreaChart,
    BarChart,
    LineChart,
    ScatterChart,
    PieChart,
    Histogram,
    BoxPlot,
    Heatmap,
}

impl ChartKind {
    /// Parses the option spellings the dashboard page exposes
    /// (`area_chart`, `bar_chart`, `line_chart`, `scatter_chart`,
    /// `pie_chart`, `histogram`, `box_plot`, `heatmap`).
    pub fn from_option_str(option: &str) -> Option<ChartKind> {
        match option {
            "area_chart" => Some(ChartKind::AreaChart),
            "bar_chart" => Some(ChartKind::BarChart),
            "line_chart" => Some(ChartKind::LineChart),
            "scatter_chart" => Some(ChartKind::ScatterChart),
            "pie_chart" => Some(ChartKind::PieChart),
            "histogram" => Some(ChartKind::Histogram),
            "box_plot" => Some(ChartKind::BoxPlot),
            "heatmap" => Some(ChartKind::Heatmap),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ChartKind::AreaChart => "area_chart",
            ChartKind::BarChart => "bar_chart",
            ChartKind::LineChart => "line_chart",
            ChartKind::ScatterChart => "scatter_chart",
            ChartKind::PieChart => "pie_chart",
            ChartKind::Histogram => "histogram",
            ChartKind::BoxPlot => "box_plot",
            ChartKind::Heatmap => "heatmap",
        }
    }
}

/// Axis choices for the chart kinds that take them. Unset fields fall back
/// to the first suitable column(s) of the table.
#[derive(Debug, Clone, Default)]
pub struct ChartSelection {
    pub x: Option<String>,
    pub y: Option<String>,
    pub category: Option<String>,
}

/// The data contract handed to an external chart renderer: which kind, the
/// columns used, and the values reshaped the way that renderer expects. No
/// pixels here.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartData {
    /// Every numeric column as one series (area/bar/line). Missing cells
    /// surface as NaN so renderers can gap them.
    NumericSeries {
        columns: Vec<String>,
        series: Vec<Vec<f64>>,
    },
    /// Paired points from two numeric columns (scatter). Rows missing
    /// either coordinate are skipped.
    ScatterPoints {
        x_column: String,
        y_column: String,
        points: Vec<(f64, f64)>,
    },
    /// One numeric column's non-missing values (histogram/box plot).
    SingleSeries { column: String, values: Vec<f64> },
    /// Occurrence counts of one categorical column's values, in first-seen
    /// order (pie chart).
    CategoryCounts {
        column: String,
        counts: Vec<(String, usize)>,
    },
    /// Pearson correlation matrix over all numeric columns (heatmap),
    /// computed on pairwise-complete observations. Zero-variance pairs
    /// yield NaN.
    CorrelationMatrix {
        columns: Vec<String>,
        values: Vec<Vec<f64>>,
    },
}

/// Validates the table against a chart kind's column requirements and
/// reshapes the minimal column subset into the matching [`ChartData`]
/// variant.
///
/// ```
/// use enactml::chart_utils::{project, ChartData, ChartKind, ChartSelection};
/// use enactml::table_utils::Table;
///
/// let table = Table::from_raw_data(
///     vec!["city".to_string(), "temp".to_string()],
///     vec![
///         vec!["pune".to_string(), "31".to_string()],
///         vec!["pune".to_string(), "29".to_string()],
///         vec!["leh".to_string(), "2".to_string()],
///     ],
/// ).unwrap();
///
/// let data = project(&table, ChartKind::PieChart, &ChartSelection::default()).unwrap();
/// assert_eq!(
///     data,
///     ChartData::CategoryCounts {
///         column: "city".to_string(),
///         counts: vec![("pune".to_string(), 2), ("leh".to_string(), 1)],
///     }
/// );
/// ```
pub fn project(
    table: &Table,
    chart_kind: ChartKind,
    selection: &ChartSelection,
) -> Result<ChartData, EnactError> {
    match chart_kind {
        ChartKind::AreaChart | ChartKind::BarChart | ChartKind::LineChart => {
            let columns = require_numeric(table, chart_kind, 1)?;
            let series = columns
                .iter()
                .map(|name| numeric_series(table, name))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(ChartData::NumericSeries { columns, series })
        }
        ChartKind::ScatterChart => {
            let numeric = require_numeric(table, chart_kind, 1)?;
            let y_default = if numeric.len() > 1 { 1 } else { 0 };
            let x_column = pick(selection.x.as_deref(), &numeric, 0);
            let y_column = pick(selection.y.as_deref(), &numeric, y_default);
            let x_idx = numeric_column_index(table, &x_column)?;
            let y_idx = numeric_column_index(table, &y_column)?;
            let points = table
                .rows()
                .iter()
                .filter_map(|row| match (row[x_idx].as_number(), row[y_idx].as_number()) {
                    (Some(x), Some(y)) => Some((x, y)),
                    _ => None,
                })
                .collect();
            Ok(ChartData::ScatterPoints {
                x_column,
                y_column,
                points,
            })
        }
        ChartKind::Histogram | ChartKind::BoxPlot => {
            let numeric = require_numeric(table, chart_kind, 1)?;
            let column = pick(selection.x.as_deref(), &numeric, 0);
            let idx = numeric_column_index(table, &column)?;
            let values = table
                .rows()
                .iter()
                .filter_map(|row| row[idx].as_number())
                .collect();
            Ok(ChartData::SingleSeries { column, values })
        }
        ChartKind::PieChart => {
            let categorical = table.categorical_columns();
            if categorical.is_empty() {
                return Err(EnactError::InsufficientColumns {
                    chart: chart_kind.name().to_string(),
                    requirement: "at least one categorical column".to_string(),
                });
            }
            let column = pick(selection.category.as_deref(), &categorical, 0);
            let idx = table.find_column(&column)?;
            let mut order: Vec<String> = Vec::new();
            let mut tally: std::collections::HashMap<String, usize> =
                std::collections::HashMap::new();
            for row in table.rows() {
                if let Cell::Text(value) = &row[idx] {
                    if !tally.contains_key(value) {
                        order.push(value.clone());
                    }
                    *tally.entry(value.clone()).or_insert(0) += 1;
                }
            }
            let counts = order.into_iter().map(|v| {
                let n = tally[&v];
                (v, n)
            });
            Ok(ChartData::CategoryCounts {
                column,
                counts: counts.collect(),
            })
        }
        ChartKind::Heatmap => {
            let columns = require_numeric(table, chart_kind, 2)?;
            let indices = columns
                .iter()
                .map(|name| table.find_column(name))
                .collect::<Result<Vec<_>, _>>()?;
            let values = indices
                .iter()
                .map(|&a| {
                    indices
                        .iter()
                        .map(|&b| pearson(table, a, b))
                        .collect::<Vec<f64>>()
                })
                .collect();
            Ok(ChartData::CorrelationMatrix { columns, values })
        }
    }
}

fn require_numeric(
    table: &Table,
    chart_kind: ChartKind,
    minimum: usize,
) -> Result<Vec<String>, EnactError> {
    let numeric = table.numeric_columns();
    if numeric.len() < minimum {
        let requirement = if minimum == 1 {
            "at least one numeric column".to_string()
        } else {
            format!("at least {} numeric columns", minimum)
        };
        return Err(EnactError::InsufficientColumns {
            chart: chart_kind.name().to_string(),
            requirement,
        });
    }
    Ok(numeric)
}

fn pick(selected: Option<&str>, candidates: &[String], default_idx: usize) -> String {
    selected
        .map(|s| s.to_string())
        .unwrap_or_else(|| candidates[default_idx].clone())
}

fn numeric_column_index(table: &Table, column_name: &str) -> Result<usize, EnactError> {
    let idx = table.find_column(column_name)?;
    if table.get_column_types()[idx] != crate::table_utils::ColumnType::Numeric {
        return Err(EnactError::TypeNotNumeric(column_name.to_string()));
    }
    Ok(idx)
}

fn numeric_series(table: &Table, column_name: &str) -> Result<Vec<f64>, EnactError> {
    let idx = table.find_column(column_name)?;
    Ok(table
        .rows()
        .iter()
        .map(|row| row[idx].as_number().unwrap_or(f64::NAN))
        .collect())
}

// Pearson correlation over the rows where both columns are non-missing.
fn pearson(table: &Table, a: usize, b: usize) -> f64 {
    let pairs: Vec<(f64, f64)> = table
        .rows()
        .iter()
        .filter_map(|row| match (row[a].as_number(), row[b].as_number()) {
            (Some(x), Some(y)) => Some((x, y)),
            _ => None,
        })
        .collect();

    if pairs.is_empty() {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        cov += (x - mean_x) * (y - mean_y);
        var_x += (x - mean_x).powi(2);
        var_y += (y - mean_y).powi(2);
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        f64::NAN
    } else {
        cov / denom
    }
}
