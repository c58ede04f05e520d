// sentiment_utils.rs
use crate::error::EnactError;
use crate::inference_utils::{HuggingFaceConnect, ZeroShotConfig};
use crate::table_utils::{Cell, ColumnType, Table};
use futures::future::join_all;
use lazy_static::lazy_static;
use rayon::prelude::*;
use regex::Regex;
use std::collections::{HashMap, HashSet};

lazy_static! {
    // (polarity, subjectivity) per word. Polarity in [-1, 1], subjectivity
    // in [0, 1].
    static ref POLARITY_LEXICON: HashMap<&'static str, (f64, f64)> = {
        let entries: &[(&str, f64, f64)] = &[
            ("amazing", 0.75, 0.9),
            ("awesome", 0.8, 0.9),
            ("beautiful", 0.85, 1.0),
            ("best", 1.0, 0.3),
            ("brilliant", 0.9, 0.9),
            ("charming", 0.6, 0.8),
            ("delicious", 0.8, 0.9),
            ("delightful", 0.8, 0.9),
            ("easy", 0.45, 0.8),
            ("enjoy", 0.5, 0.5),
            ("excellent", 1.0, 1.0),
            ("excited", 0.6, 0.8),
            ("fantastic", 0.9, 0.9),
            ("favorite", 0.6, 0.9),
            ("fun", 0.55, 0.6),
            ("glad", 0.5, 1.0),
            ("good", 0.7, 0.6),
            ("great", 0.8, 0.75),
            ("happy", 0.8, 1.0),
            ("helpful", 0.55, 0.5),
            ("impressive", 0.9, 1.0),
            ("incredible", 0.9, 0.9),
            ("interesting", 0.5, 0.5),
            ("like", 0.5, 0.4),
            ("love", 0.8, 0.6),
            ("lovely", 0.75, 0.9),
            ("nice", 0.6, 1.0),
            ("outstanding", 0.9, 0.9),
            ("perfect", 1.0, 1.0),
            ("pleasant", 0.7, 0.8),
            ("recommend", 0.55, 0.4),
            ("satisfied", 0.6, 0.8),
            ("smooth", 0.5, 0.6),
            ("superb", 0.9, 0.9),
            ("wonderful", 1.0, 1.0),
            ("worthy", 0.5, 0.4),
            ("angry", -0.6, 0.9),
            ("annoying", -0.6, 0.8),
            ("awful", -1.0, 1.0),
            ("bad", -0.7, 0.65),
            ("boring", -0.6, 0.8),
            ("broken", -0.55, 0.6),
            ("buggy", -0.6, 0.7),
            ("cheap", -0.4, 0.7),
            ("confusing", -0.5, 0.7),
            ("disappointed", -0.65, 0.8),
            ("disappointing", -0.65, 0.8),
            ("dirty", -0.6, 0.8),
            ("dreadful", -0.9, 1.0),
            ("fail", -0.6, 0.5),
            ("failure", -0.6, 0.5),
            ("hate", -0.8, 0.9),
            ("horrible", -1.0, 1.0),
            ("mediocre", -0.4, 0.7),
            ("mess", -0.55, 0.6),
            ("nasty", -0.8, 0.9),
            ("pathetic", -0.8, 0.9),
            ("poor", -0.6, 0.6),
            ("rude", -0.65, 0.9),
            ("sad", -0.6, 1.0),
            ("slow", -0.4, 0.55),
            ("terrible", -1.0, 1.0),
            ("ugly", -0.7, 0.9),
            ("unhappy", -0.7, 1.0),
            ("unreliable", -0.6, 0.7),
            ("useless", -0.7, 0.8),
            ("waste", -0.6, 0.6),
            ("worst", -1.0, 0.3),
            ("wrong", -0.5, 0.5),
        ];
        entries.iter().map(|(w, p, s)| (*w, (*p, *s))).collect()
    };

    // Multipliers applied to the sentiment word that follows them.
    static ref INTENSIFIERS: HashMap<&'static str, f64> = [
        ("absolutely", 1.4),
        ("completely", 1.3),
        ("extremely", 1.4),
        ("highly", 1.3),
        ("really", 1.25),
        ("so", 1.2),
        ("totally", 1.3),
        ("truly", 1.3),
        ("very", 1.3),
    ]
    .iter()
    .copied()
    .collect();

    static ref NEGATORS: HashSet<&'static str> = [
        "not", "no", "never", "neither", "nor", "cannot", "cant", "dont",
        "doesnt", "didnt", "isnt", "wasnt", "wont", "wouldnt",
    ]
    .iter()
    .copied()
    .collect();

    pub(crate) static ref STOPWORDS: HashSet<&'static str> = [
        "a", "about", "above", "after", "again", "all", "am", "an", "and",
        "any", "are", "as", "at", "be", "because", "been", "before", "being",
        "below", "between", "both", "but", "by", "could", "did", "do", "does",
        "doing", "down", "during", "each", "few", "for", "from", "further",
        "had", "has", "have", "having", "he", "her", "here", "hers", "him",
        "his", "how", "i", "if", "in", "into", "is", "it", "its", "just",
        "me", "more", "most", "my", "of", "off", "on", "once", "only", "or",
        "other", "our", "out", "over", "own", "s", "same", "she", "should",
        "so", "some", "such", "t", "than", "that", "the", "their", "theirs",
        "them", "then", "there", "these", "they", "this", "those", "through",
        "to", "too", "under", "until", "up", "was", "we", "were", "what",
        "when", "where", "which", "while", "who", "whom", "why", "will",
        "with", "would", "you", "your", "yours",
    ]
    .iter()
    .copied()
    .collect();

    static ref NON_ALPHA: Regex = Regex::new(r"[^a-zA-Z\s]").unwrap();
}

fn tokenize(text: &str) -> Vec<String> {
    let stripped = NON_ALPHA.replace_all(text, "");
    stripped
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect()
}

/// Scores the polarity of `text` in [-1, 1]: the average weight of the
/// sentiment-bearing words found, with a preceding intensifier scaling a
/// word's weight and a preceding negation flipping and damping it. Text
/// with no sentiment-bearing words scores 0.
///
/// ```
/// use enactml::sentiment_utils::score_polarity;
///
/// assert!(score_polarity("I love this library") > 0.5);
/// assert!(score_polarity("a terrible, horrible mess") < -0.5);
/// assert_eq!(score_polarity("the sky is above the sea"), 0.0);
/// ```
pub fn score_polarity(text: &str) -> f64 {
    let tokens = tokenize(text);
    let mut total = 0.0;
    let mut matched = 0usize;

    for (i, token) in tokens.iter().enumerate() {
        let Some((weight, _)) = POLARITY_LEXICON.get(token.as_str()) else {
            continue;
        };
        let mut weight = *weight;
        // Look back over a short window for modifiers.
        let window_start = i.saturating_sub(2);
        for prior in &tokens[window_start..i] {
            if let Some(boost) = INTENSIFIERS.get(prior.as_str()) {
                weight *= boost;
            }
            if NEGATORS.contains(prior.as_str()) {
                weight *= -0.5;
            }
        }
        total += weight;
        matched += 1;
    }

    if matched == 0 {
        0.0
    } else {
        (total / matched as f64).clamp(-1.0, 1.0)
    }
}

/// Scores the subjectivity of `text` in [0, 1]: the average subjectivity of
/// the sentiment-bearing words found; 0 when there are none.
pub fn score_subjectivity(text: &str) -> f64 {
    let tokens = tokenize(text);
    let mut total = 0.0;
    let mut matched = 0usize;
    for token in &tokens {
        if let Some((_, subjectivity)) = POLARITY_LEXICON.get(token.as_str()) {
            total += subjectivity;
            matched += 1;
        }
    }
    if matched == 0 {
        0.0
    } else {
        (total / matched as f64).clamp(0.0, 1.0)
    }
}

/// The label band a polarity score falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Negative => "Negative",
            SentimentLabel::Neutral => "Neutral",
        }
    }
}

/// Maps a polarity score to its label: `>= 0.5` Positive, `<= -0.5`
/// Negative, Neutral in between.
pub fn label_for_score(score: f64) -> SentimentLabel {
    if score >= 0.5 {
        SentimentLabel::Positive
    } else if score <= -0.5 {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

/// Text-cleaning options, mirroring what the sentiment page's "Clean"
/// button applies.
#[derive(Debug, Clone)]
pub struct CleanTextConfig {
    pub lowercase: bool,
    pub remove_stopwords: bool,
    pub remove_numbers: bool,
    pub remove_punctuation: bool,
    pub collapse_spaces: bool,
}

impl Default for CleanTextConfig {
    fn default() -> Self {
        CleanTextConfig {
            lowercase: true,
            remove_stopwords: true,
            remove_numbers: true,
            remove_punctuation: true,
            collapse_spaces: true,
        }
    }
}

/// Cleans free text per the config: lowercasing, punctuation and number
/// removal, stopword filtering and whitespace collapsing.
///
/// ```
/// use enactml::sentiment_utils::{clean_words, CleanTextConfig};
///
/// let cleaned = clean_words("The 2 BIG dogs barked!", &CleanTextConfig::default());
/// assert_eq!(cleaned, "big dogs barked");
/// ```
pub fn clean_words(text: &str, config: &CleanTextConfig) -> String {
    let mut working = text.to_string();
    if config.lowercase {
        working = working.to_lowercase();
    }
    if config.remove_punctuation {
        working = Regex::new(r"[^\w\s]")
            .expect("static pattern")
            .replace_all(&working, "")
            .to_string();
    }
    if config.remove_numbers {
        working = Regex::new(r"\d+")
            .expect("static pattern")
            .replace_all(&working, "")
            .to_string();
    }
    if config.remove_stopwords || config.collapse_spaces {
        let words: Vec<&str> = working
            .split_whitespace()
            .filter(|w| !config.remove_stopwords || !STOPWORDS.contains(&w.to_lowercase().as_str()))
            .collect();
        working = words.join(" ");
    }
    working
}

/// Appends `Sentiment Score` (polarity rounded to two decimals) and
/// `Analysis` (the label band) columns for the named text column, scoring
/// rows in parallel. Rows whose text cell is missing get missing cells in
/// both new columns.
pub fn annotate_with_sentiment(table: &Table, text_column: &str) -> Result<Table, EnactError> {
    let idx = table.find_column(text_column)?;

    let scored: Vec<Option<f64>> = table
        .rows()
        .par_iter()
        .map(|row| {
            let cell = &row[idx];
            if cell.is_missing() {
                None
            } else {
                let score = score_polarity(&cell.render());
                Some((score * 100.0).round() / 100.0)
            }
        })
        .collect();

    let score_cells: Vec<Cell> = scored
        .iter()
        .map(|s| match s {
            Some(score) => Cell::Number(*score),
            None => Cell::Missing,
        })
        .collect();
    let label_cells: Vec<Cell> = scored
        .iter()
        .map(|s| match s {
            Some(score) => Cell::Text(label_for_score(*score).as_str().to_string()),
            None => Cell::Missing,
        })
        .collect();

    table
        .with_column("Sentiment Score", ColumnType::Numeric, score_cells)?
        .with_column("Analysis", ColumnType::Text, label_cells)
}

/// Classifies the named text column of every row with the hosted zero-shot
/// endpoint, fanning the calls out concurrently, and appends the winning
/// label as a `Predicted_Sentiment` column. Missing text cells stay
/// missing.
pub async fn annotate_with_zero_shot(
    table: &Table,
    text_column: &str,
    connect: &HuggingFaceConnect,
    config: &ZeroShotConfig,
) -> Result<Table, EnactError> {
    let idx = table.find_column(text_column)?;

    let futures: Vec<_> = table
        .rows()
        .iter()
        .map(|row| {
            let cell = row[idx].clone();
            async move {
                if cell.is_missing() {
                    Ok(None)
                } else {
                    let result = connect.classify_text(&cell.render(), config).await?;
                    Ok(Some(result.top_label()?.to_string()))
                }
            }
        })
        .collect();

    let outcomes: Vec<Result<Option<String>, EnactError>> = join_all(futures).await;

    let mut cells = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        cells.push(match outcome? {
            Some(label) => Cell::Text(label),
            None => Cell::Missing,
        });
    }

    table.with_column("Predicted_Sentiment", ColumnType::Text, cells)
}
