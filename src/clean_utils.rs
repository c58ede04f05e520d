// clean_utils.rs
use crate::table_utils::{Cell, ColumnType, Table};
use std::collections::HashSet;

/// How missing cells are handled after duplicate removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingStrategy {
    /// Leave missing cells untouched.
    None,
    /// Remove any row containing at least one missing cell.
    DropRows,
    /// Replace missing cells in each numeric column with that column's mean,
    /// computed over the non-missing cells before any fill is applied. A
    /// column with no non-missing cells is left unfilled; there is no
    /// implicit zero fallback (use [`MissingStrategy::FillZero`] for zeros).
    FillMean,
    /// Replace missing cells in every numeric column with zero.
    FillZero,
}

impl MissingStrategy {
    /// Parses the option spellings the dashboard page exposes:
    /// `none`, `drop_rows`, `fill_mean`, `fill_zero`.
    pub fn from_option_str(option: &str) -> Option<MissingStrategy> {
        match option {
            "none" => Some(MissingStrategy::None),
            "drop_rows" => Some(MissingStrategy::DropRows),
            "fill_mean" => Some(MissingStrategy::FillMean),
            "fill_zero" => Some(MissingStrategy::FillZero),
            _ => None,
        }
    }
}

/// Declarative cleaning options applied by [`clean`].
#[derive(Debug, Clone)]
pub struct CleaningConfig {
    pub drop_duplicates: bool,
    pub missing_strategy: MissingStrategy,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        CleaningConfig {
            drop_duplicates: true,
            missing_strategy: MissingStrategy::None,
        }
    }
}

/// Applies a [`CleaningConfig`] to a table and returns the cleaned copy.
/// The input table is never mutated, and the result is idempotent under the
/// same config.
///
/// Duplicates are removed first (the first occurrence of each row survives,
/// survivors keep their relative order), then the missing-value strategy
/// runs. The order matters when both `drop_duplicates` and `DropRows` are
/// requested: a duplicate row with missing cells is deduplicated before it
/// can influence which rows the missing-row removal keeps.
///
/// ```
/// use enactml::clean_utils::{clean, CleaningConfig, MissingStrategy};
/// use enactml::table_utils::Table;
///
/// let table = Table::from_raw_data(
///     vec!["A".to_string(), "x".to_string()],
///     vec![
///         vec!["1".to_string(), "10".to_string()],
///         vec!["1".to_string(), "10".to_string()],
///         vec!["2".to_string(), "".to_string()],
///     ],
/// ).unwrap();
///
/// let config = CleaningConfig {
///     drop_duplicates: true,
///     missing_strategy: MissingStrategy::FillMean,
/// };
/// let cleaned = clean(&table, &config);
///
/// // The duplicate second row is gone; the missing cell in `x` is filled
/// // with the mean of {10}.
/// assert_eq!(cleaned.row_count(), 2);
/// assert_eq!(cleaned.rows()[1][1].as_number(), Some(10.0));
/// ```
pub fn clean(table: &Table, config: &CleaningConfig) -> Table {
    let mut rows: Vec<Vec<Cell>> = table.rows().to_vec();

    if config.drop_duplicates {
        let mut seen = HashSet::new();
        rows.retain(|row| {
            let key: Vec<String> = row.iter().map(|cell| cell.render()).collect();
            seen.insert(key)
        });
    }

    match config.missing_strategy {
        MissingStrategy::None => {}
        MissingStrategy::DropRows => {
            rows.retain(|row| row.iter().all(|cell| !cell.is_missing()));
        }
        MissingStrategy::FillMean => {
            let fills: Vec<Option<f64>> = numeric_column_means(table, &rows);
            fill_missing(&mut rows, &fills);
        }
        MissingStrategy::FillZero => {
            let fills: Vec<Option<f64>> = table
                .get_column_types()
                .iter()
                .map(|t| match t {
                    ColumnType::Numeric => Some(0.0),
                    ColumnType::Text => None,
                })
                .collect();
            fill_missing(&mut rows, &fills);
        }
    }

    Table::from_parts(
        table.get_headers().to_vec(),
        table.get_column_types().to_vec(),
        rows,
    )
}

// Per-column fill values for FillMean: the mean of the surviving rows'
// non-missing cells for numeric columns, None for text columns and for
// numeric columns with no non-missing cells.
fn numeric_column_means(table: &Table, rows: &[Vec<Cell>]) -> Vec<Option<f64>> {
    table
        .get_column_types()
        .iter()
        .enumerate()
        .map(|(idx, column_type)| {
            if *column_type != ColumnType::Numeric {
                return None;
            }
            let values: Vec<f64> = rows
                .iter()
                .filter_map(|row| row[idx].as_number())
                .collect();
            if values.is_empty() {
                None
            } else {
                Some(values.iter().sum::<f64>() / values.len() as f64)
            }
        })
        .collect()
}

fn fill_missing(rows: &mut [Vec<Cell>], fills: &[Option<f64>]) {
    for row in rows.iter_mut() {
        for (idx, cell) in row.iter_mut().enumerate() {
            if cell.is_missing() {
                if let Some(fill) = fills[idx] {
                    *cell = Cell::Number(fill);
                }
            }
        }
    }
}
