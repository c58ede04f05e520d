// article_utils.rs
use crate::error::EnactError;
use crate::sentiment_utils::STOPWORDS;
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use url::Url;

lazy_static! {
    static ref TITLE_RE: Regex = Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap();
    static ref PARAGRAPH_RE: Regex = Regex::new(r"(?is)<p[^>]*>(.*?)</p>").unwrap();
    static ref TAG_RE: Regex = Regex::new(r"(?s)<[^>]+>").unwrap();
    static ref SCRIPT_RE: Regex =
        Regex::new(r"(?is)<(script|style)[^>]*>.*?</(script|style)>").unwrap();
    static ref SENTENCE_RE: Regex = Regex::new(r"[^.!?]+[.!?]*").unwrap();
    static ref WORD_RE: Regex = Regex::new(r"[a-zA-Z]+").unwrap();
}

/// Request options for one article fetch.
#[derive(Debug, Clone)]
pub struct ArticleConnectConfig {
    pub url: String,
    pub summary_sentences: usize,
    pub keyword_count: usize,
}

impl ArticleConnectConfig {
    pub fn for_url(url: &str) -> Self {
        ArticleConnectConfig {
            url: url.to_string(),
            summary_sentences: 5,
            keyword_count: 10,
        }
    }
}

/// A parsed news article: the metadata the summarizer page displays plus
/// the extracted body, summary and keywords.
#[derive(Debug, Clone)]
pub struct Article {
    pub title: String,
    pub authors: Vec<String>,
    pub publish_date: Option<DateTime<Utc>>,
    pub canonical_url: String,
    pub image_url: String,
    pub text: String,
    pub summary: String,
    pub keywords: Vec<String>,
}

/// Represents an ArticleConnect object.
pub struct ArticleConnect;

impl ArticleConnect {
    /// Downloads the page at `config.url` and parses it into an
    /// [`Article`]. The URL is validated before any network call.
    pub async fn fetch_and_parse(config: &ArticleConnectConfig) -> Result<Article, EnactError> {
        let parsed_url = Url::parse(&config.url)?;
        let response = reqwest::Client::new()
            .get(parsed_url)
            .send()
            .await?
            .error_for_status()?;
        let html = response.text().await?;
        if html.trim().is_empty() {
            return Err(EnactError::Article(format!(
                "empty response body from {}",
                config.url
            )));
        }
        Article::from_html(&config.url, &html, config)
    }
}

impl Article {
    /// Parses already-downloaded HTML. Pure, so page handling is testable
    /// without a network.
    pub fn from_html(
        url: &str,
        html: &str,
        config: &ArticleConnectConfig,
    ) -> Result<Article, EnactError> {
        let html = SCRIPT_RE.replace_all(html, " ");

        let title = TITLE_RE
            .captures(&html)
            .and_then(|c| c.get(1))
            .map(|m| decode_entities(m.as_str()).trim().to_string())
            .unwrap_or_default();

        let mut authors: Vec<String> = Vec::new();
        for key in ["author", "article:author"] {
            if let Some(value) = meta_content(&html, key) {
                for author in value.split(',') {
                    let author = author.trim().to_string();
                    if !author.is_empty() && !authors.contains(&author) {
                        authors.push(author);
                    }
                }
            }
        }

        let publish_date = meta_content(&html, "article:published_time")
            .and_then(|v| DateTime::parse_from_rfc3339(v.trim()).ok())
            .map(|d| d.with_timezone(&Utc));

        let canonical_url = meta_content(&html, "og:url").unwrap_or_else(|| url.to_string());
        let image_url = meta_content(&html, "og:image").unwrap_or_default();

        let mut paragraphs = Vec::new();
        for cap in PARAGRAPH_RE.captures_iter(&html) {
            let inner = TAG_RE.replace_all(&cap[1], " ");
            let paragraph = decode_entities(&inner)
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");
            // Navigation crumbs and button labels also sit in <p> tags;
            // only paragraph-sized text is article body.
            if paragraph.len() >= 20 {
                paragraphs.push(paragraph);
            }
        }
        let text = paragraphs.join("\n");

        let frequencies = word_frequencies(&text);
        let summary = summarize(&text, &frequencies, config.summary_sentences);
        let keywords = top_keywords(&frequencies, config.keyword_count);

        Ok(Article {
            title,
            authors,
            publish_date,
            canonical_url,
            image_url,
            text,
            summary,
            keywords,
        })
    }
}

// <meta property="..." content="..."> in either attribute order.
fn meta_content(html: &str, key: &str) -> Option<String> {
    let forward = Regex::new(&format!(
        r#"(?is)<meta[^>]*(?:property|name)\s*=\s*["']{}["'][^>]*content\s*=\s*["']([^"']*)["']"#,
        regex::escape(key)
    ))
    .ok()?;
    if let Some(cap) = forward.captures(html) {
        return Some(decode_entities(&cap[1]));
    }
    let reversed = Regex::new(&format!(
        r#"(?is)<meta[^>]*content\s*=\s*["']([^"']*)["'][^>]*(?:property|name)\s*=\s*["']{}["']"#,
        regex::escape(key)
    ))
    .ok()?;
    reversed.captures(html).map(|cap| decode_entities(&cap[1]))
}

fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
}

fn word_frequencies(text: &str) -> HashMap<String, usize> {
    let mut frequencies = HashMap::new();
    for m in WORD_RE.find_iter(text) {
        let word = m.as_str().to_lowercase();
        if word.len() < 3 || STOPWORDS.contains(&word.as_str()) {
            continue;
        }
        *frequencies.entry(word).or_insert(0) += 1;
    }
    frequencies
}

// Frequency-based extractive summary: every sentence scores the summed
// frequency of its content words; the top `limit` sentences come back in
// their original order.
fn summarize(text: &str, frequencies: &HashMap<String, usize>, limit: usize) -> String {
    let sentences: Vec<&str> = SENTENCE_RE
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .collect();

    if sentences.len() <= limit {
        return sentences.join(" ");
    }

    let mut scored: Vec<(usize, usize)> = sentences
        .iter()
        .enumerate()
        .map(|(i, sentence)| {
            let score = WORD_RE
                .find_iter(sentence)
                .filter_map(|m| frequencies.get(&m.as_str().to_lowercase()))
                .sum::<usize>();
            (i, score)
        })
        .collect();

    scored.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    let mut picked: Vec<usize> = scored.iter().take(limit).map(|(i, _)| *i).collect();
    picked.sort_unstable();

    picked
        .into_iter()
        .map(|i| sentences[i])
        .collect::<Vec<_>>()
        .join(" ")
}

fn top_keywords(frequencies: &HashMap<String, usize>, limit: usize) -> Vec<String> {
    let mut entries: Vec<(&String, &usize)> = frequencies.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
    entries
        .into_iter()
        .take(limit)
        .map(|(word, _)| word.clone())
        .collect()
}
