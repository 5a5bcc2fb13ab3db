//! HTTP client for the target API
//!
//! Every request carries the `api-key` header and a JSON content type, and
//! is timed from send until the full body has been read.

use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, Url};
use serde_json::Value;

use crate::common::config::{ApiConfig, Timeouts};
use crate::common::{Error, Result};

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "api-key";

/// Request body to send
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Raw(String),
}

/// A fully prepared request, with placeholders already rendered
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    /// `METHOD path?query` for log and report lines
    pub fn describe(&self) -> String {
        if self.query.is_empty() {
            format!("{} {}", self.method, self.path)
        } else {
            let query: Vec<String> = self
                .query
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            format!("{} {}?{}", self.method, self.path, query.join("&"))
        }
    }

    /// Body as it goes on the wire, for failure logs
    pub fn body_text(&self) -> String {
        match &self.body {
            RequestBody::Empty => String::new(),
            RequestBody::Json(value) => value.to_string(),
            RequestBody::Raw(text) => text.clone(),
        }
    }
}

/// Response status, body text and measured latency
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
    pub elapsed: Duration,
}

impl ApiResponse {
    /// Parse the body as JSON
    pub fn json(&self) -> Result<Value> {
        Ok(serde_json::from_str(&self.body)?)
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed.as_millis() as u64
    }
}

/// Client bound to one versioned base URL
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client with the default headers for every request
    pub fn new(api: &ApiConfig, timeouts: &Timeouts) -> Result<Self> {
        let base_url = api.base_url.trim_end_matches('/').to_string();
        let parsed = Url::parse(&base_url).map_err(|e| Error::invalid_url(&base_url, e))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::invalid_url(&base_url, "scheme must be http or https"));
        }

        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&api.api_key)
            .map_err(|e| Error::Config(format!("Invalid api key header value: {}", e)))?;
        headers.insert(API_KEY_HEADER, key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for a path, joined without normalisation
    ///
    /// Paths are appended verbatim so `/user{username}` stays slashless.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and read the whole response body
    pub async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let method = request.method.as_str();
        let url = self.url_for(&request.path);

        let mut builder = self.http.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.body(value.to_string()),
            RequestBody::Raw(text) => builder.body(text.clone()),
        };

        tracing::debug!(method, url = %url, "sending request");

        let started = Instant::now();
        let response = builder
            .send()
            .await
            .map_err(|e| Error::http(method, &request.path, e))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Error::http(method, &request.path, e))?;
        let elapsed = started.elapsed();

        tracing::debug!(
            method,
            url = %url,
            status,
            elapsed_ms = elapsed.as_millis() as u64,
            "received response"
        );

        Ok(ApiResponse {
            status,
            body,
            elapsed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base_url: &str) -> ApiConfig {
        ApiConfig {
            base_url: base_url.to_string(),
            api_key: "special-key".to_string(),
        }
    }

    #[test]
    fn test_url_join_keeps_path_verbatim() {
        let client = ApiClient::new(&api("https://petstore.swagger.io/v2/"), &Timeouts::default())
            .unwrap();
        assert_eq!(client.base_url(), "https://petstore.swagger.io/v2");
        assert_eq!(
            client.url_for("/userjohn"),
            "https://petstore.swagger.io/v2/userjohn"
        );
    }

    #[test]
    fn test_rejects_bad_base_url() {
        assert!(matches!(
            ApiClient::new(&api("not a url"), &Timeouts::default()),
            Err(Error::InvalidUrl { .. })
        ));
        assert!(matches!(
            ApiClient::new(&api("ftp://example.com"), &Timeouts::default()),
            Err(Error::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_describe_request() {
        let request = ApiRequest {
            method: Method::GET,
            path: "/user/login".to_string(),
            query: vec![
                ("username".to_string(), "ada".to_string()),
                ("password".to_string(), "pw".to_string()),
            ],
            body: RequestBody::Empty,
        };
        assert_eq!(request.describe(), "GET /user/login?username=ada&password=pw");
        assert_eq!(request.body_text(), "");
    }

    #[test]
    fn test_response_json() {
        let response = ApiResponse {
            status: 200,
            body: r#"{"code":200}"#.to_string(),
            elapsed: Duration::from_millis(12),
        };
        assert_eq!(response.json().unwrap()["code"], 200);
        assert_eq!(response.elapsed_ms(), 12);

        let text = ApiResponse {
            status: 200,
            body: "plain".to_string(),
            elapsed: Duration::ZERO,
        };
        assert!(text.json().is_err());
    }
}
