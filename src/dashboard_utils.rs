// dashboard_utils.rs
use crate::agg_utils::{group_by, pivot, GroupByConfig};
use crate::chart_utils::{project, ChartData, ChartKind, ChartSelection};
use crate::clean_utils::{clean, CleaningConfig};
use crate::error::EnactError;
use crate::table_utils::{ColumnType, Table};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::Hasher;

/// Options for one dashboard controller: the cleaning policy applied to
/// every upload and the default preview depth.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub cleaning: CleaningConfig,
    pub preview_rows: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            cleaning: CleaningConfig::default(),
            preview_rows: 5,
        }
    }
}

/// Sequences the dashboard workflow: upload -> load -> clean ->
/// preview/statistics/aggregation/chart/export. Owns no table logic itself.
///
/// Parses are cached per byte-content hash, so re-uploading the same file is
/// served from the cache; access is `&mut self`, which serializes the cache
/// and gives at-most-once parsing per key. The cache and held tables live in
/// this struct — there is no global state.
pub struct Dashboard {
    config: DashboardConfig,
    parse_cache: HashMap<u64, Table>,
    cleaned: Option<Table>,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Self {
        Dashboard {
            config,
            parse_cache: HashMap::new(),
            cleaned: None,
        }
    }

    /// Loads an uploaded CSV payload and cleans it with the configured
    /// policy. The cleaned table becomes the controller's current table.
    ///
    /// ```
    /// use enactml::dashboard_utils::{Dashboard, DashboardConfig};
    ///
    /// let mut dashboard = Dashboard::new(DashboardConfig::default());
    /// let table = dashboard.upload(b"city,temp\npune,31\npune,31\nleh,2\n").unwrap();
    /// assert_eq!(table.row_count(), 2); // duplicate row dropped
    /// ```
    pub fn upload(&mut self, bytes: &[u8]) -> Result<&Table, EnactError> {
        let key = content_key(bytes);
        if !self.parse_cache.contains_key(&key) {
            let parsed = Table::from_csv_bytes(bytes)?;
            self.parse_cache.insert(key, parsed);
        }
        let parsed = &self.parse_cache[&key];
        self.cleaned = Some(clean(parsed, &self.config.cleaning));
        Ok(self.current()?)
    }

    /// The cleaned table of the latest upload.
    pub fn current(&self) -> Result<&Table, EnactError> {
        self.cleaned.as_ref().ok_or_else(|| {
            EnactError::MalformedInput("no table uploaded yet".to_string())
        })
    }

    /// The first `n` rows of the current table (`config.preview_rows` rows
    /// via [`Dashboard::preview_default`]).
    pub fn preview(&self, n: usize) -> Result<Table, EnactError> {
        Ok(self.current()?.head(n))
    }

    pub fn preview_default(&self) -> Result<Table, EnactError> {
        self.preview(self.config.preview_rows)
    }

    pub fn shape(&self) -> Result<(usize, usize), EnactError> {
        Ok(self.current()?.shape())
    }

    /// `(column name, inferred type)` pairs, in table order.
    pub fn column_types(&self) -> Result<Vec<(String, ColumnType)>, EnactError> {
        let table = self.current()?;
        Ok(table
            .get_headers()
            .iter()
            .cloned()
            .zip(table.get_column_types().iter().copied())
            .collect())
    }

    pub fn describe(&self) -> Result<Table, EnactError> {
        self.current()?.describe()
    }

    pub fn missing_summary(&self) -> Result<Table, EnactError> {
        self.current()?.missing_summary()
    }

    pub fn group_by(&self, config: &GroupByConfig) -> Result<Vec<(String, f64)>, EnactError> {
        group_by(self.current()?, config)
    }

    pub fn pivot(&self, config: &GroupByConfig) -> Result<Table, EnactError> {
        pivot(self.current()?, config)
    }

    pub fn chart(
        &self,
        chart_kind: ChartKind,
        selection: &ChartSelection,
    ) -> Result<ChartData, EnactError> {
        project(self.current()?, chart_kind, selection)
    }

    /// The download payload: the cleaned table as UTF-8 CSV bytes, header
    /// row plus rows in table order, no index column.
    pub fn export_csv(&self) -> Result<Vec<u8>, EnactError> {
        self.current()?.to_csv_bytes()
    }

    /// Prints the default preview followed by the table shape, the way the
    /// dashboard page's preview panel reads.
    pub fn print_preview(&self) -> Result<(), EnactError> {
        let preview = self.preview_default()?;
        preview.print_table();
        let (rows, columns) = self.shape()?;
        println!("Shape (rows, columns): ({}, {})", rows, columns);
        Ok(())
    }
}

fn content_key(bytes: &[u8]) -> u64 {
    let mut hasher = DefaultHasher::new();
    hasher.write(bytes);
    hasher.finish()
}
