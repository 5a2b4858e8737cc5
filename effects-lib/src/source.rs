//! Loading the record list.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use serde_json::Value;
use url::Url;

use crate::error::FetchError;
use crate::model::Record;

/// Somewhere records can be loaded from.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetches the full record list.
    async fn fetch(&self) -> Result<Vec<Record>, FetchError>;

    /// Human-readable location for log messages.
    fn describe(&self) -> String;
}

/// Parses a payload: either `{"effects": [...]}` or a bare array.
///
/// A record that does not fit the schema is skipped with a warning; only a
/// payload without a record list fails.
pub fn parse_payload(text: &str) -> Result<Vec<Record>, FetchError> {
    let items = match serde_json::from_str::<Value>(text)? {
        Value::Array(items) => items,
        Value::Object(mut root) => match root.remove("effects") {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(FetchError::parse(format!(
                    "`effects` must be an array, found {}",
                    kind_of(&other)
                )));
            }
            None => return Err(FetchError::parse("missing `effects` array")),
        },
        other => {
            return Err(FetchError::parse(format!(
                "expected an object or array, found {}",
                kind_of(&other)
            )));
        }
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let id = item.get("id").and_then(Value::as_str).unwrap_or("?").to_string();
        match serde_json::from_value::<Record>(item) {
            Ok(record) => records.push(record),
            Err(e) => log::warn!("Skipping record {index} ({id}): {e}"),
        }
    }
    Ok(records)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Fetches records over HTTP, bypassing every cache.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    url: Url,
    timeout: Option<Duration>,
}

impl HttpSource {
    /// Creates a source for `url`.
    pub fn new(url: &str) -> Result<Self, FetchError> {
        let url = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;
        Ok(Self {
            client: Client::new(),
            url,
            timeout: None,
        })
    }

    /// Sets a request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the request URL with a fresh cache-busting parameter.
    pub fn request_url(&self) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut()
            .append_pair("v", &Utc::now().timestamp_millis().to_string());
        url
    }
}

#[async_trait]
impl DataSource for HttpSource {
    async fn fetch(&self) -> Result<Vec<Record>, FetchError> {
        let mut request = self
            .client
            .get(self.request_url())
            .header(CACHE_CONTROL, "no-store")
            .header(PRAGMA, "no-cache");
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.is_empty() {
                status.canonical_reason().unwrap_or_default().to_string()
            } else {
                body
            };
            return Err(FetchError::http(status.as_u16(), message));
        }

        parse_payload(&response.text().await?)
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}

/// Reads records from a local JSON file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DataSource for FileSource {
    async fn fetch(&self) -> Result<Vec<Record>, FetchError> {
        let text = tokio::fs::read_to_string(&self.path).await?;
        parse_payload(&text)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Loads records, degrading to an empty set on failure.
///
/// There is no retry. The failure is logged and the view renders its
/// no-results state.
pub async fn load_records(source: &dyn DataSource) -> Vec<Record> {
    match source.fetch().await {
        Ok(records) => {
            log::info!("Loaded {} records from {}", records.len(), source.describe());
            records
        }
        Err(e) => {
            log::error!("Failed to load records from {}: {e}", source.describe());
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wrapped_and_bare() {
        let wrapped = r#"{"effects": [{"id": "a", "mod": "Minecraft", "effect": "Speed"}]}"#;
        let bare = r#"[{"id": "a", "mod": "Minecraft", "effect": "Speed"}]"#;

        assert_eq!(parse_payload(wrapped).unwrap()[0].name(), "Speed");
        assert_eq!(parse_payload(bare).unwrap()[0].category(), "Minecraft");
    }

    #[test]
    fn test_parse_error() {
        let err = parse_payload("{\"effects\": 3}").unwrap_err();
        assert!(matches!(err, FetchError::Parse { ref message } if message.contains("a number")));

        let err = parse_payload("{\"data\": []}").unwrap_err();
        assert!(err.to_string().contains("effects"));

        assert!(matches!(parse_payload("not json"), Err(FetchError::Parse { .. })));
    }

    #[test]
    fn test_bad_record_is_skipped() {
        let text = r#"[{"id": "a", "mod": "Foo", "effect": "A"},
                       {"id": "b", "mod": "Foo", "effect": "B", "tags": "positive"},
                       {"id": "c", "mod": "Foo", "effect": "C"}]"#;
        let ids: Vec<String> = parse_payload(text)
            .unwrap()
            .iter()
            .map(|r| r.id().to_string())
            .collect();
        assert_eq!(ids, ["a", "c"]);
    }

    #[test]
    fn test_invalid_url() {
        assert!(matches!(
            HttpSource::new("not a url"),
            Err(FetchError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_request_url_busts_cache() {
        let source = HttpSource::new("https://example.com/data/effects.json?lang=en").unwrap();
        let url = source.request_url();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

        assert_eq!(pairs[0], ("lang".to_string(), "en".to_string()));
        assert_eq!(pairs[1].0, "v");
        assert!(pairs[1].1.parse::<i64>().is_ok());
    }
}
