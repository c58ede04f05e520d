// lib.rs
//! # ENACTML
//!
//! The 🤯 RUST data core behind the EnactOn text-analysis pages. This library
//! replicates the logic of the Auto Dashboard, Sentiment Analyzer, Article
//! Summarizer and Multi-Model Chatbot workflows as pure, host-agnostic
//! building blocks: the host application owns the widgets, the uploads and
//! the pixels, and this crate owns everything in between. 💪🚀
//!
//! ## `table_utils`
//!
//! - **Purpose**: The in-memory table every workflow runs on.
//! - **Features**:
//!   - **Table**: named columns, per-column types inferred once at load
//!     (`Numeric`/`Text`), cells as an explicit `Number`/`Text`/`Missing`
//!     enumeration.
//!   - **Permissive Loading**: WINDOWS-1252 decoding that accepts any byte,
//!     sentinel tokens for missing values, documented ragged-row policy.
//!   - **Accessors and Statistics**: shape, heads, column partitions, column
//!     stats (`get_mean`, `get_sum`, `get_mode`, ...), a `describe()` grid
//!     and a missing-values summary.
//!   - **TableConverter**: turn JSON arrays into tables.
//!   - **Flexible Saving**: UTF-8 CSV out, with no index column.
//!
//! ## `clean_utils`
//!
//! - **Purpose**: Declarative table cleaning.
//! - **Features**: Duplicate-row removal (first occurrence kept) and the
//!   four missing-value strategies (`none`, `drop_rows`, `fill_mean`,
//!   `fill_zero`), applied in a documented order by a pure, idempotent
//!   `clean` function.
//!
//! ## `agg_utils`
//!
//! - **Purpose**: Grouped reductions and pivots.
//! - **Features**: `mean`/`sum`/`count`/`max`/`min` reductions over a
//!   numeric column per categorical group key, keys in first-seen order,
//!   missing values excluded, and the same request materialized as a pivot
//!   table.
//!
//! ## `chart_utils`
//!
//! - **Purpose**: Chart-ready projections.
//! - **Features**: Validates and reshapes a table into the data contract of
//!   each chart kind the dashboard offers (series, scatter points, single
//!   series, category counts, correlation matrix) without touching pixels.
//!
//! ## `dashboard_utils`
//!
//! - **Purpose**: Sequence the dashboard workflow.
//! - **Features**: upload -> cached parse -> clean -> preview / statistics /
//!   group-by / pivot / chart / CSV export, with a content-addressed parse
//!   cache and no global state.
//!
//! ## `sentiment_utils`
//!
//! - **Purpose**: Sentiment scoring and text cleaning.
//! - **Features**: Native lexicon-based polarity and subjectivity scoring
//!   with negation and intensifier handling, the `Positive`/`Negative`/
//!   `Neutral` banding, `clean_words`, parallel per-row CSV annotation, and
//!   concurrent zero-shot annotation through the hosted inference API.
//!
//! ## `article_utils`
//!
//! - **Purpose**: Fetch and summarize news articles.
//! - **Features**: URL validation, metadata extraction (title, authors,
//!   publish date, og tags), paragraph text extraction, frequency-based
//!   extractive summaries and keyword lists.
//!
//! ## `inference_utils`
//!
//! - **Purpose**: Hosted inference collaborators, consumed opaquely.
//! - **Features**: Chat completions, zero-shot classification and
//!   text-to-image against the Hugging Face router, plus the generic
//!   `InferenceProvider::submit` boundary.
//!
//! ## `chat_utils`
//!
//! - **Purpose**: Multi-model chat sessions.
//! - **Features**: Model catalog by category, system-instruction templates,
//!   attachment snippets, per-category dispatch and conversation history.
//!
//! ## `api_utils`
//!
//! - **Purpose**: Gracefully make and cache API calls.
//! - **Features**: `ApiCallBuilder` with file-backed response caching and
//!   bounded retries.
//!
//! ## License
//!
//! This project is licensed under the MIT License.

pub mod agg_utils;
pub mod api_utils;
pub mod article_utils;
pub mod chart_utils;
pub mod chat_utils;
pub mod clean_utils;
pub mod dashboard_utils;
pub mod error;
pub mod inference_utils;
pub mod sentiment_utils;
pub mod table_utils;
