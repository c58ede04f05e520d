// agg_utils.rs
use crate::error::EnactError;
use crate::table_utils::{Cell, ColumnType, Table};

/// A function collapsing a group's non-missing numeric values to one scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    Mean,
    Sum,
    Count,
    Max,
    Min,
}

impl Reduction {
    /// Parses the option spellings the dashboard page exposes:
    /// `mean`, `sum`, `count`, `max`, `min`.
    pub fn from_option_str(option: &str) -> Option<Reduction> {
        match option {
            "mean" => Some(Reduction::Mean),
            "sum" => Some(Reduction::Sum),
            "count" => Some(Reduction::Count),
            "max" => Some(Reduction::Max),
            "min" => Some(Reduction::Min),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Reduction::Mean => "MEAN",
            Reduction::Sum => "SUM",
            Reduction::Count => "COUNT",
            Reduction::Max => "MAX",
            Reduction::Min => "MIN",
        }
    }

    /// Reduction over the non-missing values of one group. An empty group
    /// yields the NaN sentinel for mean/max/min, the identity for sum, and
    /// zero for count; empty groups are never an error.
    fn apply(&self, values: &[f64]) -> f64 {
        match self {
            Reduction::Count => values.len() as f64,
            Reduction::Sum => values.iter().sum(),
            Reduction::Mean => {
                if values.is_empty() {
                    f64::NAN
                } else {
                    values.iter().sum::<f64>() / values.len() as f64
                }
            }
            Reduction::Max => values
                .iter()
                .copied()
                .fold(f64::NAN, |acc, v| if acc.is_nan() || v > acc { v } else { acc }),
            Reduction::Min => values
                .iter()
                .copied()
                .fold(f64::NAN, |acc, v| if acc.is_nan() || v < acc { v } else { acc }),
        }
    }
}

/// A grouped-reduction request: partition rows by a categorical column and
/// reduce a numeric column within each partition.
#[derive(Debug, Clone)]
pub struct GroupByConfig {
    pub group_by_column: String,
    pub value_column: String,
    pub reduction: Reduction,
}

/// Computes the grouped reduction, returning `(group key, value)` pairs in
/// the order each key first appears in the table.
///
/// Fails with [`EnactError::ColumnNotFound`] if either column is absent,
/// [`EnactError::TypeNotCategorical`] if the grouping column is numeric, and
/// [`EnactError::TypeNotNumeric`] if the value column is not numeric. Rows
/// whose group cell is missing are excluded; missing value cells are
/// excluded from every reduction (so `count` counts non-missing values
/// only).
///
/// ```
/// use enactml::agg_utils::{group_by, GroupByConfig, Reduction};
/// use enactml::table_utils::Table;
///
/// let table = Table::from_raw_data(
///     vec!["A".to_string(), "x".to_string()],
///     vec![
///         vec!["a".to_string(), "1".to_string()],
///         vec!["b".to_string(), "2".to_string()],
///         vec!["a".to_string(), "3".to_string()],
///     ],
/// ).unwrap();
///
/// let config = GroupByConfig {
///     group_by_column: "A".to_string(),
///     value_column: "x".to_string(),
///     reduction: Reduction::Sum,
/// };
/// let grouped = group_by(&table, &config).unwrap();
/// assert_eq!(grouped, vec![("a".to_string(), 4.0), ("b".to_string(), 2.0)]);
/// ```
pub fn group_by(table: &Table, config: &GroupByConfig) -> Result<Vec<(String, f64)>, EnactError> {
    let group_idx = table.find_column(&config.group_by_column)?;
    let value_idx = table.find_column(&config.value_column)?;

    if table.get_column_types()[group_idx] != ColumnType::Text {
        return Err(EnactError::TypeNotCategorical(
            config.group_by_column.clone(),
        ));
    }
    if table.get_column_types()[value_idx] != ColumnType::Numeric {
        return Err(EnactError::TypeNotNumeric(config.value_column.clone()));
    }

    // First-seen key order is part of the contract; a keyed map alone would
    // lose it, so the keys ride in a parallel Vec.
    let mut order: Vec<String> = Vec::new();
    let mut groups: std::collections::HashMap<String, Vec<f64>> =
        std::collections::HashMap::new();

    for row in table.rows() {
        let key = match &row[group_idx] {
            Cell::Text(s) => s.clone(),
            _ => continue,
        };
        if !groups.contains_key(&key) {
            order.push(key.clone());
        }
        let bucket = groups.entry(key).or_default();
        if let Some(v) = row[value_idx].as_number() {
            bucket.push(v);
        }
    }

    Ok(order
        .into_iter()
        .map(|key| {
            let value = config.reduction.apply(&groups[&key]);
            (key, value)
        })
        .collect())
}

/// The same request as [`group_by`], materialized as a two-column table:
/// the group key column plus one `REDUCTION(value_column)` column, rows in
/// first-seen key order.
pub fn pivot(table: &Table, config: &GroupByConfig) -> Result<Table, EnactError> {
    let grouped = group_by(table, config)?;

    let headers = vec![
        config.group_by_column.clone(),
        format!("{}({})", config.reduction.name(), config.value_column),
    ];
    let rows = grouped
        .into_iter()
        .map(|(key, value)| vec![Cell::Text(key), Cell::Number(value)])
        .collect();

    Ok(Table::from_parts(
        headers,
        vec![ColumnType::Text, ColumnType::Numeric],
        rows,
    ))
}
