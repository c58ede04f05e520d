// api_utils.rs
use crate::error::EnactError;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;
use std::fs;
use std::str::FromStr;
use std::time::Duration;
use tokio::time::sleep;

/// Builds, caches and retries one HTTP call against a hosted API.
///
/// ```
/// use enactml::api_utils::ApiCallBuilder;
/// use serde_json::json;
///
/// let call = ApiCallBuilder::call(
///     "POST",
///     "https://example.com/v1/endpoint",
///     Some(json!({ "Content-Type": "application/json" })),
///     Some(json!({ "inputs": "hello" })),
/// )
/// .maintain_cache(10, "/tmp/enactml_api_cache.json")
/// .retries(3, 2);
/// // call.execute().await drives the request.
/// # let _ = call;
/// ```
pub struct ApiCallBuilder {
    method: String,
    url: String,
    header_option: Option<Value>,
    payload: Option<Value>,
    cache_minutes: Option<i64>,
    cache_path: Option<String>,
    retry_count: usize,
    retry_timeout: u64,
}

impl ApiCallBuilder {
    pub fn call(
        method: &str,
        url: &str,
        header_option: Option<Value>,
        payload: Option<Value>,
    ) -> Self {
        Self {
            method: method.to_uppercase(),
            url: url.to_string(),
            header_option,
            payload,
            cache_minutes: None,
            cache_path: None,
            retry_count: 0,
            retry_timeout: 1,
        }
    }

    /// Serves the response from `path` while the file is younger than
    /// `minutes`, and refreshes it on every live call.
    pub fn maintain_cache(mut self, minutes: i64, path: &str) -> Self {
        self.cache_minutes = Some(minutes);
        self.cache_path = Some(path.to_string());
        self
    }

    /// Retries failed sends up to `count` times, sleeping `timeout_secs`
    /// between attempts.
    pub fn retries(mut self, count: usize, timeout_secs: u64) -> Self {
        self.retry_count = count;
        self.retry_timeout = timeout_secs;
        self
    }

    pub async fn execute(self) -> Result<String, EnactError> {
        if let Some(cached) = self.read_fresh_cache() {
            return Ok(cached);
        }

        let method = Method::from_str(&self.method)
            .map_err(|_| EnactError::Api(format!("invalid HTTP method '{}'", self.method)))?;
        if ![Method::GET, Method::POST, Method::PUT, Method::DELETE].contains(&method) {
            return Err(EnactError::Api(format!(
                "unsupported HTTP method '{}'",
                self.method
            )));
        }

        let client = Client::new();
        let mut attempts = 0;
        loop {
            let request = self.assemble(&client, method.clone())?;
            match Self::send(request).await {
                Ok(response_text) => {
                    if let Some(cache_path) = &self.cache_path {
                        fs::write(cache_path, &response_text)?;
                    }
                    return Ok(response_text);
                }
                Err(e) if attempts < self.retry_count => {
                    eprintln!("Error: {}. Retrying in {} seconds...", e, self.retry_timeout);
                    sleep(Duration::from_secs(self.retry_timeout)).await;
                    attempts += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    // One request-assembly pass: headers first, then the payload as query
    // parameters for GET and as a JSON or form body for POST/PUT depending
    // on the Content-Type header.
    fn assemble(&self, client: &Client, method: Method) -> Result<RequestBuilder, EnactError> {
        let mut request = client.request(method.clone(), &self.url);
        let mut is_form = false;

        if let Some(header_json) = &self.header_option {
            let mut header_map = HeaderMap::new();
            let entries = header_json
                .as_object()
                .ok_or_else(|| EnactError::Api("headers must be a JSON object".to_string()))?;
            for (k, v) in entries {
                let value_str = v
                    .as_str()
                    .ok_or_else(|| EnactError::Api(format!("header '{}' must be a string", k)))?;
                if k == "Content-Type" && value_str == "application/x-www-form-urlencoded" {
                    is_form = true;
                }
                let name = HeaderName::from_str(k)
                    .map_err(|e| EnactError::Api(format!("invalid header name '{}': {}", k, e)))?;
                let value = HeaderValue::from_str(value_str).map_err(|e| {
                    EnactError::Api(format!("invalid header value for '{}': {}", k, e))
                })?;
                header_map.insert(name, value);
            }
            request = request.headers(header_map);
        }

        if method == Method::GET {
            if let Some(params_json) = &self.payload {
                let entries = params_json.as_object().ok_or_else(|| {
                    EnactError::Api("query parameters must be a JSON object".to_string())
                })?;
                let query: Vec<(String, String)> = entries
                    .iter()
                    .map(|(k, v)| {
                        let rendered = match v {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        };
                        (k.clone(), rendered)
                    })
                    .collect();
                request = request.query(&query);
            }
        } else if method == Method::POST || method == Method::PUT {
            if let Some(body_json) = &self.payload {
                if is_form {
                    let form: std::collections::HashMap<String, String> =
                        serde_json::from_value(body_json.clone())?;
                    request = request.form(&form);
                } else {
                    request = request.json(body_json);
                }
            }
        }

        Ok(request)
    }

    async fn send(request: RequestBuilder) -> Result<String, EnactError> {
        let response = request.send().await?;
        let response = response.error_for_status()?;
        Ok(response.text().await?)
    }

    fn read_fresh_cache(&self) -> Option<String> {
        let cache_path = self.cache_path.as_ref()?;
        let minutes = self.cache_minutes?;
        let modified = fs::metadata(cache_path).ok()?.modified().ok()?;
        let age = Utc::now() - DateTime::<Utc>::from(modified);
        if age.num_minutes() < minutes {
            fs::read_to_string(cache_path).ok()
        } else {
            None
        }
    }
}
