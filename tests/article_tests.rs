use enactml::article_utils::{Article, ArticleConnect, ArticleConnectConfig};

const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
<title>Monsoon arrives early over the western coast</title>
<meta name="author" content="A. Fernandes, R. Iyer">
<meta property="article:published_time" content="2025-06-02T08:30:00+05:30">
<meta property="og:url" content="https://news.example.com/monsoon-early">
<meta property="og:image" content="https://news.example.com/img/monsoon.jpg">
<script>var tracker = "ignore this script text entirely";</script>
<style>p { margin: 0; }</style>
</head>
<body>
<p>Subscribe</p>
<p>The monsoon reached the western coast nearly a week ahead of schedule, the weather bureau said on Monday.</p>
<p>Heavy monsoon rain lashed coastal districts overnight, and the bureau expects the monsoon rain to spread inland within days.</p>
<p>Farmers welcomed the early monsoon rain, which follows a dry and difficult summer for the region.</p>
<p>Officials cautioned that an early arrival does not always mean a strong season overall.</p>
</body>
</html>"#;

fn config() -> ArticleConnectConfig {
    let mut config = ArticleConnectConfig::for_url("https://news.example.com/monsoon-early");
    config.summary_sentences = 2;
    config.keyword_count = 5;
    config
}

#[test]
fn extracts_title_and_metadata() {
    let article = Article::from_html(&config().url, PAGE, &config()).unwrap();

    assert_eq!(article.title, "Monsoon arrives early over the western coast");
    assert_eq!(
        article.authors,
        vec!["A. Fernandes".to_string(), "R. Iyer".to_string()]
    );
    assert_eq!(article.canonical_url, "https://news.example.com/monsoon-early");
    assert_eq!(
        article.image_url,
        "https://news.example.com/img/monsoon.jpg"
    );

    let publish_date = article.publish_date.expect("publish date parses");
    assert_eq!(publish_date.timezone(), chrono::Utc);
    assert_eq!(publish_date.to_rfc3339(), "2025-06-02T03:00:00+00:00");
}

#[test]
fn body_text_keeps_paragraphs_and_drops_chrome() {
    let article = Article::from_html(&config().url, PAGE, &config()).unwrap();

    // Script/style content and the short "Subscribe" crumb are gone.
    assert!(!article.text.contains("tracker"));
    assert!(!article.text.contains("margin"));
    assert!(!article.text.contains("Subscribe"));
    assert!(article.text.contains("weather bureau"));
    assert_eq!(article.text.lines().count(), 4);
}

#[test]
fn summary_picks_the_top_sentences_in_original_order() {
    let article = Article::from_html(&config().url, PAGE, &config()).unwrap();

    let sentence_count = article
        .summary
        .matches('.')
        .count();
    assert!(sentence_count <= 2);
    assert!(!article.summary.is_empty());
    // The repeated topic word dominates the frequency scores.
    assert!(article.summary.to_lowercase().contains("monsoon"));
}

#[test]
fn short_texts_summarize_to_themselves() {
    let html = "<html><head><title>t</title></head><body>\
                <p>Only one real sentence lives in this tiny page.</p>\
                </body></html>";
    let article = Article::from_html("https://example.com/a", html, &config()).unwrap();
    assert_eq!(
        article.summary,
        "Only one real sentence lives in this tiny page."
    );
}

#[test]
fn keywords_rank_frequent_content_words_first() {
    let article = Article::from_html(&config().url, PAGE, &config()).unwrap();

    assert!(article.keywords.len() <= 5);
    assert_eq!(article.keywords.first().map(|s| s.as_str()), Some("monsoon"));
    // Stopwords never surface as keywords.
    assert!(article.keywords.iter().all(|k| k != "the" && k != "and"));
}

#[test]
fn missing_metadata_degrades_gracefully() {
    let html = "<html><body><p>A page without any of the usual head metadata tags.</p></body></html>";
    let article = Article::from_html("https://example.com/bare", html, &config()).unwrap();

    assert_eq!(article.title, "");
    assert!(article.authors.is_empty());
    assert!(article.publish_date.is_none());
    // og:url falls back to the request URL.
    assert_eq!(article.canonical_url, "https://example.com/bare");
    assert_eq!(article.image_url, "");
}

#[tokio::test]
async fn fetch_rejects_invalid_urls_before_any_network_call() {
    let config = ArticleConnectConfig::for_url("not a url at all");
    assert!(ArticleConnect::fetch_and_parse(&config).await.is_err());
}

#[test]
fn config_defaults() {
    let config = ArticleConnectConfig::for_url("https://example.com");
    assert_eq!(config.summary_sentences, 5);
    assert_eq!(config.keyword_count, 10);
}
