use std::time::Duration;

use http::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_retry::strategy::ExponentialBackoff;
use tokio_retry::RetryIf;

use super::error::ApiError;
use super::types::PageMeta;

/// Connection settings for [`ApiClient`].
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout: Option<Duration>,
    /// Extra attempts for reads; 0 means a single attempt
    pub retries: u32,
}

/// Query parameters in insertion order. Unset values are skipped and lists
/// are expanded to `name[0]=..&name[1]=..`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query(Vec<(String, String)>);

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, name: &str, value: Option<impl ToString>) -> Self {
        if let Some(v) = value {
            self.0.push((name.to_string(), v.to_string()));
        }
        self
    }

    pub fn list(mut self, name: &str, values: &[String]) -> Self {
        for (i, v) in values.iter().enumerate() {
            self.0.push((format!("{}[{}]", name, i), v.clone()));
        }
        self
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }
}

/// The REST envelope: `{success?, message?, data, meta?}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: T,
    #[serde(default)]
    pub meta: Option<PageMeta>,
}

/// Result of a legacy write: the server's confirmation text.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    retries: u32,
}

impl ApiClient {
    pub fn new(options: ClientOptions) -> Result<Self, ApiError> {
        let base_url = options.base_url.trim().trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("propertifi/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            base_url,
            token: options.token.filter(|t| !t.trim().is_empty()),
            retries: options.retries,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Join `path` onto the base URL and append the query.
    pub fn url(&self, path: &str, query: &Query) -> Result<Url, ApiError> {
        let raw = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut url = Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", raw, e)))?;
        if !query.pairs().is_empty() {
            url.query_pairs_mut().extend_pairs(query.pairs());
        }
        Ok(url)
    }

    /// One request, one response body. Non-2xx statuses become errors and
    /// a `success: false` envelope becomes [`ApiError::Rejected`].
    async fn send_once(&self, method: Method, url: Url, body: Option<&Value>) -> Result<Value, ApiError> {
        log::debug!("{} {}", method, url.path());

        let mut request = self.http.request(method, url);
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            log::debug!("request failed with {}", status);
            return Err(ApiError::from_response(status, &bytes));
        }

        let value: Value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };

        if value.get("success").and_then(Value::as_bool) == Some(false) {
            let message = value
                .get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or("Request failed")
                .to_string();
            return Err(ApiError::Rejected { message });
        }

        Ok(value)
    }

    /// Reads may be retried on network and 5xx errors when retries are
    /// configured. Writes always get a single attempt.
    async fn send(&self, method: Method, url: Url, body: Option<Value>, read: bool) -> Result<Value, ApiError> {
        if !read || self.retries == 0 {
            return self.send_once(method, url, body.as_ref()).await;
        }

        let strategy = ExponentialBackoff::from_millis(100)
            .max_delay(Duration::from_secs(5))
            .take(self.retries as usize);

        RetryIf::start(
            strategy,
            || self.send_once(method.clone(), url.clone(), body.as_ref()),
            |e: &ApiError| {
                let retry = e.is_retryable();
                if retry {
                    log::debug!("retrying after error: {}", e);
                }
                retry
            },
        )
        .await
    }

    // -- legacy convention: POST everything, payload under a named key --

    async fn legacy_call(&self, path: &str, body: &impl Serialize, read: bool) -> Result<Value, ApiError> {
        let url = self.url(path, &Query::new())?;
        let body = serde_json::to_value(body)?;
        self.send(Method::POST, url, Some(body), read).await
    }

    /// Legacy read returning the payload stored under `key`.
    pub async fn legacy<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
        key: &str,
    ) -> Result<T, ApiError> {
        let mut value = self.legacy_call(path, body, true).await?;
        let payload = value
            .get_mut(key)
            .map(Value::take)
            .unwrap_or(Value::Null);
        serde_json::from_value(payload)
            .map_err(|e| ApiError::Decode(format!("{} in `{}` of {}", e, key, path)))
    }

    /// Legacy read whose whole envelope is the payload.
    pub async fn legacy_body<T: DeserializeOwned>(&self, path: &str, body: &impl Serialize) -> Result<T, ApiError> {
        let value = self.legacy_call(path, body, true).await?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode(format!("{} in {}", e, path)))
    }

    /// Legacy write. Never retried.
    pub async fn legacy_write(&self, path: &str, body: &impl Serialize) -> Result<Ack, ApiError> {
        let value = self.legacy_call(path, body, false).await?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode(format!("{} in {}", e, path)))
    }

    // -- REST convention --

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &Query) -> Result<Envelope<T>, ApiError> {
        let url = self.url(path, query)?;
        let value = self.send(Method::GET, url, None, true).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<Envelope<T>, ApiError> {
        let url = self.url(path, &Query::new())?;
        let value = self
            .send(Method::POST, url, Some(serde_json::to_value(body)?), false)
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<Envelope<T>, ApiError> {
        let url = self.url(path, &Query::new())?;
        let value = self
            .send(Method::PUT, url, Some(serde_json::to_value(body)?), false)
            .await?;
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        let _ = rustls::crypto::ring::default_provider().install_default();
        ApiClient::new(ClientOptions {
            base_url: base.to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_url_joins_path() {
        let c = client("http://localhost:8000/api/");
        let url = c.url("/blogs/list", &Query::new()).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/blogs/list");
    }

    #[test]
    fn test_query_skips_none_and_indexes_lists() {
        let c = client("http://localhost:8000/api");
        let query = Query::new()
            .param("state", Some("TX"))
            .param("city", None::<&str>)
            .list("property_types", &["condo".to_string(), "hoa-coa".to_string()])
            .param("page", Some(2));
        let url = c.url("property-managers", &query).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("state".to_string(), "TX".to_string()),
                ("property_types[0]".to_string(), "condo".to_string()),
                ("property_types[1]".to_string(), "hoa-coa".to_string()),
                ("page".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let _ = rustls::crypto::ring::default_provider().install_default();
        let result = ApiClient::new(ClientOptions {
            base_url: "not a url".to_string(),
            ..Default::default()
        });
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn test_blank_token_is_anonymous() {
        let _ = rustls::crypto::ring::default_provider().install_default();
        let c = ApiClient::new(ClientOptions {
            base_url: "http://localhost".to_string(),
            token: Some("  ".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert!(!c.has_token());
    }
}
