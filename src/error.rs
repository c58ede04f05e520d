// error.rs
use thiserror::Error;

/// Main error type for the enactml crate.
/// Aggregates the table/aggregation/chart error taxonomy with the failures
/// bubbling up from the standard library and third-party dependencies.
#[derive(Error, Debug)]
pub enum EnactError {
    /// The byte stream could not be split into a rectangular table at all:
    /// no header row, a quoting failure, or a row wider than the header.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// A requested column does not exist in the table. Carries the closest
    /// header by fuzzy match when one is close enough to be worth naming.
    #[error(
        "column '{}' not found{}",
        .column,
        .suggestion.as_ref().map(|s| format!(" (did you mean '{}'?)", s)).unwrap_or_default()
    )]
    ColumnNotFound {
        column: String,
        suggestion: Option<String>,
    },

    /// The aggregation target column is not numeric.
    #[error("column '{0}' is not numeric")]
    TypeNotNumeric(String),

    /// The grouping column is not categorical.
    #[error("column '{0}' is not categorical")]
    TypeNotCategorical(String),

    /// The table lacks the column class a chart kind requires.
    #[error("chart '{chart}' requires {requirement}")]
    InsufficientColumns { chart: String, requirement: String },

    /// The HTTP layer rejected the request before it was sent.
    #[error("api call error: {0}")]
    Api(String),

    /// A hosted inference provider returned an unusable response.
    #[error("inference provider error: {0}")]
    Provider(String),

    /// An article page could not be parsed into the expected fields.
    #[error("article error: {0}")]
    Article(String),

    // Standard library and dependency errors
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Csv(#[from] csv::Error),

    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Url(#[from] url::ParseError),
}
