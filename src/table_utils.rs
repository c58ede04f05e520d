// table_utils.rs
use crate::error::EnactError;
use anyhow::Result as AnyhowResult;
use encoding_rs::WINDOWS_1252;
use fuzzywuzzy::fuzz;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;

/// A single cell of a [`Table`]. Cell typing is resolved once, when the
/// table is built, and never re-probed afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Missing,
}

impl Cell {
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Renders the cell the way it is written out to CSV: numbers via
    /// `Display`, missing cells as the empty string.
    pub fn render(&self) -> String {
        match self {
            Cell::Number(n) => {
                if n.is_nan() {
                    "NaN".to_string()
                } else {
                    format!("{}", n)
                }
            }
            Cell::Text(s) => s.clone(),
            Cell::Missing => String::new(),
        }
    }
}

/// The semantic type of a column, inferred at load time: a column is
/// `Numeric` iff every non-missing cell parses as a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Numeric,
    Text,
}

/// Loader options. The `missing_tokens` are matched against trimmed cell
/// text; matching cells (and empty/whitespace-only cells) become
/// [`Cell::Missing`].
#[derive(Debug, Clone)]
pub struct TableLoadConfig {
    pub missing_tokens: Vec<String>,
}

impl Default for TableLoadConfig {
    fn default() -> Self {
        TableLoadConfig {
            missing_tokens: ["NA", "N/A", "NaN", "nan", "null", "NULL", "None"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// An in-memory rectangular table: named columns, per-column inferred types,
/// row-major cells. All rows are exactly `headers.len()` wide and header
/// names are unique. Row order is significant and preserved by every
/// read-only operation in this crate.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    column_types: Vec<ColumnType>,
    rows: Vec<Vec<Cell>>,
}

/// A utility struct for converting JSON data into a [`Table`].
pub struct TableConverter;

impl TableConverter {
    /// Converts a JSON array of flat objects into a `Table`. Keys are taken
    /// from the first object; absent keys render as missing cells.
    ///
    /// ```
    /// use enactml::table_utils::TableConverter;
    ///
    /// let json_data = r#"[
    ///     {"name": "Alice", "age": "30"},
    ///     {"name": "Bob", "age": "25"}
    /// ]"#;
    ///
    /// let table = TableConverter::from_json(json_data).unwrap();
    /// assert_eq!(table.row_count(), 2);
    /// assert!(table.get_headers().contains(&"name".to_string()));
    /// ```
    pub fn from_json(json_data: &str) -> AnyhowResult<Table> {
        let data: Value = serde_json::from_str(json_data)?;

        let items = match data {
            Value::Array(items) => items,
            _ => anyhow::bail!("expected a JSON array of objects"),
        };

        let keys: Vec<String> = items
            .first()
            .and_then(|item| item.as_object())
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default();

        if keys.is_empty() {
            anyhow::bail!("expected at least one JSON object with keys");
        }

        let mut grid = Vec::new();
        for item in &items {
            if let Value::Object(map) = item {
                let row: Vec<String> = keys
                    .iter()
                    .map(|key| {
                        map.get(key).map_or_else(String::new, |v| match v {
                            Value::String(s) => s.clone(),
                            Value::Null => String::new(),
                            _ => v.to_string().replace('"', ""),
                        })
                    })
                    .collect();
                grid.push(row);
            }
        }

        Ok(Table::from_raw_data(keys, grid)?)
    }
}

impl Table {
    /// Parses raw delimited-text bytes with the default [`TableLoadConfig`].
    ///
    /// Decoding uses WINDOWS-1252, a single-byte Western encoding that
    /// accepts any byte value, so legacy exports never fail on decode. The
    /// first record is the header row. Rows shorter than the header are
    /// padded with missing cells; rows wider than the header fail with
    /// [`EnactError::MalformedInput`].
    ///
    /// ```
    /// use enactml::table_utils::Table;
    ///
    /// let table = Table::from_csv_bytes(b"name,score\nalice,10\nbob,\n").unwrap();
    /// assert_eq!(table.shape(), (2, 2));
    /// assert_eq!(table.get_headers(), &["name".to_string(), "score".to_string()]);
    /// ```
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Table, EnactError> {
        Table::from_csv_bytes_with(bytes, &TableLoadConfig::default())
    }

    /// Like [`Table::from_csv_bytes`], with explicit loader options.
    pub fn from_csv_bytes_with(
        bytes: &[u8],
        config: &TableLoadConfig,
    ) -> Result<Table, EnactError> {
        let (text, _, _) = WINDOWS_1252.decode(bytes);

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = rdr
            .headers()
            .map_err(|e| EnactError::MalformedInput(e.to_string()))?
            .iter()
            .map(String::from)
            .collect();

        if headers.is_empty() {
            return Err(EnactError::MalformedInput(
                "input contains no header row".to_string(),
            ));
        }

        let mut grid = Vec::new();
        for (i, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| EnactError::MalformedInput(e.to_string()))?;
            let mut row: Vec<String> = record.iter().map(String::from).collect();
            if row.len() > headers.len() {
                return Err(EnactError::MalformedInput(format!(
                    "row {} has {} cells but the header has {} columns",
                    i + 1,
                    row.len(),
                    headers.len()
                )));
            }
            while row.len() < headers.len() {
                row.push(String::new());
            }
            grid.push(row);
        }

        Table::build(headers, grid, config)
    }

    /// Reads a CSV file from disk and parses it with the default options.
    pub fn from_csv_path(file_path: &str) -> Result<Table, EnactError> {
        let bytes = fs::read(file_path)?;
        Table::from_csv_bytes(&bytes)
    }

    /// Builds a table from already-split string data, running the same
    /// sentinel detection and type inference as the CSV loader.
    ///
    /// ```
    /// use enactml::table_utils::{ColumnType, Table};
    ///
    /// let table = Table::from_raw_data(
    ///     vec!["date".to_string(), "temperature".to_string()],
    ///     vec![
    ///         vec!["2023-01-30".to_string(), "23.5".to_string()],
    ///         vec!["2023-02-01".to_string(), "19.0".to_string()],
    ///     ],
    /// ).unwrap();
    ///
    /// assert_eq!(table.get_column_types(), &[ColumnType::Text, ColumnType::Numeric]);
    /// ```
    pub fn from_raw_data(
        headers: Vec<String>,
        data: Vec<Vec<String>>,
    ) -> Result<Table, EnactError> {
        if headers.is_empty() {
            return Err(EnactError::MalformedInput(
                "a table needs at least one column".to_string(),
            ));
        }
        let mut grid = Vec::with_capacity(data.len());
        for (i, mut row) in data.into_iter().enumerate() {
            if row.len() > headers.len() {
                return Err(EnactError::MalformedInput(format!(
                    "row {} has {} cells but the header has {} columns",
                    i + 1,
                    row.len(),
                    headers.len()
                )));
            }
            while row.len() < headers.len() {
                row.push(String::new());
            }
            grid.push(row);
        }
        Table::build(headers, grid, &TableLoadConfig::default())
    }

    // Shared tail of every constructor: sentinel detection, per-column type
    // inference, cell materialization.
    fn build(
        headers: Vec<String>,
        grid: Vec<Vec<String>>,
        config: &TableLoadConfig,
    ) -> Result<Table, EnactError> {
        let mut seen = std::collections::HashSet::new();
        for header in &headers {
            if !seen.insert(header.clone()) {
                return Err(EnactError::MalformedInput(format!(
                    "duplicate column name '{}'",
                    header
                )));
            }
        }

        let is_missing = |raw: &str| -> bool {
            let trimmed = raw.trim();
            trimmed.is_empty() || config.missing_tokens.iter().any(|t| t == trimmed)
        };

        // A column is numeric iff every non-missing cell parses as a number.
        // All-missing columns count as numeric, matching the float-NaN column
        // a dataframe library would produce for them.
        let mut column_types = Vec::with_capacity(headers.len());
        for col in 0..headers.len() {
            let numeric = grid.iter().all(|row| {
                let raw = row[col].trim();
                is_missing(raw) || raw.parse::<f64>().is_ok()
            });
            column_types.push(if numeric {
                ColumnType::Numeric
            } else {
                ColumnType::Text
            });
        }

        let rows = grid
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .enumerate()
                    .map(|(col, raw)| {
                        let trimmed = raw.trim();
                        if is_missing(trimmed) {
                            Cell::Missing
                        } else {
                            match column_types[col] {
                                ColumnType::Numeric => match trimmed.parse::<f64>() {
                                    Ok(n) => Cell::Number(n),
                                    Err(_) => Cell::Missing,
                                },
                                ColumnType::Text => Cell::Text(trimmed.to_string()),
                            }
                        }
                    })
                    .collect()
            })
            .collect();

        Ok(Table {
            headers,
            column_types,
            rows,
        })
    }

    pub(crate) fn from_parts(
        headers: Vec<String>,
        column_types: Vec<ColumnType>,
        rows: Vec<Vec<Cell>>,
    ) -> Table {
        Table {
            headers,
            column_types,
            rows,
        }
    }

    pub fn get_headers(&self) -> &[String] {
        &self.headers
    }

    pub fn get_column_types(&self) -> &[ColumnType] {
        &self.column_types
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// `(rows, columns)`, in that order.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.headers.len())
    }

    /// Resolves a column name to its index. On a miss the error names the
    /// closest existing header when the fuzzy match is convincing enough.
    pub fn find_column(&self, column_name: &str) -> Result<usize, EnactError> {
        if let Some(idx) = self.headers.iter().position(|h| h == column_name) {
            return Ok(idx);
        }
        let suggestion = self
            .headers
            .iter()
            .map(|h| (h, fuzz::ratio(column_name, h)))
            .max_by_key(|(_, score)| *score)
            .filter(|(_, score)| *score >= 60)
            .map(|(h, _)| h.clone());
        Err(EnactError::ColumnNotFound {
            column: column_name.to_string(),
            suggestion,
        })
    }

    pub fn column_type(&self, column_name: &str) -> Result<ColumnType, EnactError> {
        let idx = self.find_column(column_name)?;
        Ok(self.column_types[idx])
    }

    /// Names of all numeric columns, in table order.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.headers
            .iter()
            .zip(&self.column_types)
            .filter(|(_, t)| **t == ColumnType::Numeric)
            .map(|(h, _)| h.clone())
            .collect()
    }

    /// Names of all non-numeric (categorical) columns, in table order.
    pub fn categorical_columns(&self) -> Vec<String> {
        self.headers
            .iter()
            .zip(&self.column_types)
            .filter(|(_, t)| **t == ColumnType::Text)
            .map(|(h, _)| h.clone())
            .collect()
    }

    pub(crate) fn column_cells(&self, idx: usize) -> impl Iterator<Item = &Cell> {
        self.rows.iter().map(move |row| &row[idx])
    }

    fn numeric_values(&self, idx: usize) -> Vec<f64> {
        self.column_cells(idx)
            .filter_map(|cell| cell.as_number())
            .collect()
    }

    /// The first `n` rows as a new table.
    pub fn head(&self, n: usize) -> Table {
        Table {
            headers: self.headers.clone(),
            column_types: self.column_types.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// A copy of the table without the named columns. Unknown names are
    /// ignored, so a stale selection never fails a whole workflow.
    pub fn drop_columns(&self, columns: &[&str]) -> Table {
        let keep: Vec<usize> = (0..self.headers.len())
            .filter(|&i| !columns.contains(&self.headers[i].as_str()))
            .collect();
        Table {
            headers: keep.iter().map(|&i| self.headers[i].clone()).collect(),
            column_types: keep.iter().map(|&i| self.column_types[i]).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| keep.iter().map(|&i| row[i].clone()).collect())
                .collect(),
        }
    }

    /// A copy of the table with one extra column appended. Fails if the
    /// name already exists or the cell count does not match the row count.
    pub fn with_column(
        &self,
        column_name: &str,
        column_type: ColumnType,
        cells: Vec<Cell>,
    ) -> Result<Table, EnactError> {
        if self.headers.iter().any(|h| h == column_name) {
            return Err(EnactError::MalformedInput(format!(
                "duplicate column name '{}'",
                column_name
            )));
        }
        if cells.len() != self.rows.len() {
            return Err(EnactError::MalformedInput(format!(
                "column '{}' has {} cells for {} rows",
                column_name,
                cells.len(),
                self.rows.len()
            )));
        }
        let mut headers = self.headers.clone();
        headers.push(column_name.to_string());
        let mut column_types = self.column_types.clone();
        column_types.push(column_type);
        let rows = self
            .rows
            .iter()
            .cloned()
            .zip(cells)
            .map(|(mut row, cell)| {
                row.push(cell);
                row
            })
            .collect();
        Ok(Table {
            headers,
            column_types,
            rows,
        })
    }

    /// Returns the mean of the non-missing values in a numeric column, or
    /// `None` if the column is absent or has no values.
    ///
    /// ```
    /// use enactml::table_utils::Table;
    ///
    /// let table = Table::from_raw_data(
    ///     vec!["date".to_string(), "temperature".to_string()],
    ///     vec![
    ///         vec!["2023-01-30".to_string(), "23.5".to_string()],
    ///         vec!["2023-01-30".to_string(), "24.1".to_string()],
    ///         vec!["2023-02-01".to_string(), "19.0".to_string()],
    ///     ],
    /// ).unwrap();
    ///
    /// assert_eq!(table.get_mean("temperature").unwrap(), 22.2);
    /// ```
    pub fn get_mean(&self, column_name: &str) -> Option<f64> {
        let idx = self.headers.iter().position(|h| h == column_name)?;
        let values = self.numeric_values(idx);
        if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<f64>() / values.len() as f64)
        }
    }

    /// Returns the sum of the non-missing values in a numeric column.
    pub fn get_sum(&self, column_name: &str) -> Option<f64> {
        let idx = self.headers.iter().position(|h| h == column_name)?;
        Some(self.numeric_values(idx).iter().sum())
    }

    pub fn get_min(&self, column_name: &str) -> Option<f64> {
        let idx = self.headers.iter().position(|h| h == column_name)?;
        self.numeric_values(idx)
            .into_iter()
            .fold(None, |acc: Option<f64>, v| match acc {
                Some(m) => Some(m.min(v)),
                None => Some(v),
            })
    }

    pub fn get_max(&self, column_name: &str) -> Option<f64> {
        let idx = self.headers.iter().position(|h| h == column_name)?;
        self.numeric_values(idx)
            .into_iter()
            .fold(None, |acc: Option<f64>, v| match acc {
                Some(m) => Some(m.max(v)),
                None => Some(v),
            })
    }

    /// Counts the non-missing cells of a column. Missing cells are never
    /// counted, whatever the column type.
    pub fn get_count(&self, column_name: &str) -> Option<usize> {
        let idx = self.headers.iter().position(|h| h == column_name)?;
        Some(self.column_cells(idx).filter(|c| !c.is_missing()).count())
    }

    pub fn get_missing_count(&self, column_name: &str) -> Option<usize> {
        let idx = self.headers.iter().position(|h| h == column_name)?;
        Some(self.column_cells(idx).filter(|c| c.is_missing()).count())
    }

    /// The most frequent rendered value of a column, missing cells excluded.
    pub fn get_mode(&self, column_name: &str) -> Option<String> {
        let idx = self.headers.iter().position(|h| h == column_name)?;
        let mut frequency_map: HashMap<String, usize> = HashMap::new();
        for cell in self.column_cells(idx) {
            if !cell.is_missing() {
                *frequency_map.entry(cell.render()).or_insert(0) += 1;
            }
        }
        frequency_map
            .into_iter()
            .max_by_key(|&(_, count)| count)
            .map(|(val, _)| val)
    }

    /// Population variance of a numeric column's non-missing values.
    pub fn get_variance(&self, column_name: &str) -> Option<f64> {
        let idx = self.headers.iter().position(|h| h == column_name)?;
        let values = self.numeric_values(idx);
        if values.is_empty() {
            return None;
        }
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        Some(values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64)
    }

    pub fn get_standard_deviation(&self, column_name: &str) -> Option<f64> {
        Some(self.get_variance(column_name)?.sqrt())
    }

    /// The distinct rendered values of a column, in first-seen order,
    /// missing cells excluded.
    pub fn get_unique(&self, column_name: &str) -> Option<Vec<String>> {
        let idx = self.headers.iter().position(|h| h == column_name)?;
        let mut seen = std::collections::HashSet::new();
        let mut unique = Vec::new();
        for cell in self.column_cells(idx) {
            if cell.is_missing() {
                continue;
            }
            let rendered = cell.render();
            if seen.insert(rendered.clone()) {
                unique.push(rendered);
            }
        }
        Some(unique)
    }

    /// A basic-statistics grid over every column: count, unique, top, mean,
    /// std, min and max, one statistic per row. Statistics that do not apply
    /// to a column's type are left empty. The std row uses population
    /// variance.
    pub fn describe(&self) -> Result<Table, EnactError> {
        fn render_opt(v: Option<f64>) -> String {
            v.map(|n| format!("{}", n)).unwrap_or_default()
        }

        let mut headers = vec!["statistic".to_string()];
        headers.extend(self.headers.iter().cloned());

        let mut grid = Vec::new();
        for label in ["count", "unique", "top", "mean", "std", "min", "max"] {
            let mut row = vec![label.to_string()];
            for name in &self.headers {
                let is_text = matches!(self.column_type(name), Ok(ColumnType::Text));
                let value = match label {
                    "count" => self
                        .get_count(name)
                        .map(|c| c.to_string())
                        .unwrap_or_default(),
                    "unique" if is_text => self
                        .get_unique(name)
                        .map(|u| u.len().to_string())
                        .unwrap_or_default(),
                    "top" if is_text => self.get_mode(name).unwrap_or_default(),
                    "mean" => render_opt(self.get_mean(name)),
                    "std" => render_opt(self.get_standard_deviation(name)),
                    "min" => render_opt(self.get_min(name)),
                    "max" => render_opt(self.get_max(name)),
                    _ => String::new(),
                };
                row.push(value);
            }
            grid.push(row);
        }

        Table::from_raw_data(headers, grid)
    }

    /// Per-column missing-cell counts as a two-column table.
    pub fn missing_summary(&self) -> Result<Table, EnactError> {
        let grid = self
            .headers
            .iter()
            .map(|name| {
                vec![
                    name.clone(),
                    self.get_missing_count(name).unwrap_or(0).to_string(),
                ]
            })
            .collect();
        Table::from_raw_data(
            vec!["Column".to_string(), "Missing Values".to_string()],
            grid,
        )
    }

    /// Serializes the table as UTF-8 CSV: header row first, rows in table
    /// order, no index column, missing cells empty.
    pub fn to_csv_string(&self) -> Result<String, EnactError> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record(&self.headers)?;
        for row in &self.rows {
            wtr.write_record(row.iter().map(|cell| cell.render()))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| EnactError::MalformedInput(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| EnactError::MalformedInput(e.to_string()))
    }

    pub fn to_csv_bytes(&self) -> Result<Vec<u8>, EnactError> {
        Ok(self.to_csv_string()?.into_bytes())
    }

    /// Writes the table to a CSV file at `file_path`.
    pub fn save_as(&self, file_path: &str) -> Result<(), EnactError> {
        fs::write(file_path, self.to_csv_bytes()?)?;
        Ok(())
    }

    /// Prints an aligned preview of up to 30 rows with a row-count footer.
    pub fn print_table(&self) {
        const MAX_ROWS: usize = 30;

        let rendered: Vec<Vec<String>> = self
            .rows
            .iter()
            .take(MAX_ROWS)
            .map(|row| row.iter().map(|cell| cell.render()).collect())
            .collect();

        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.len()).collect();
        for row in &rendered {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.len());
            }
        }

        let line = |cells: &[String]| {
            cells
                .iter()
                .enumerate()
                .map(|(i, c)| format!("{:width$}", c, width = widths[i]))
                .collect::<Vec<_>>()
                .join(" | ")
        };

        println!("{}", line(&self.headers));
        println!("{}", "-".repeat(widths.iter().sum::<usize>() + 3 * widths.len().saturating_sub(1)));
        for row in &rendered {
            println!("{}", line(row));
        }
        if self.rows.len() > MAX_ROWS {
            println!("... and {} more rows", self.rows.len() - MAX_ROWS);
        }
        println!("Total rows: {}", self.rows.len());
    }
}
