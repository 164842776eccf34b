use std::time::Instant;

use reqwest::Url;
use reqwest::header::{ACCEPT, HeaderValue};
use serde::Serialize;

use crate::config::ProbeConfig;
use crate::error::{ProbeError, Result};

use super::method::HttpMethod;
use super::request::RequestInput;
use super::response::HttpResponse;

/// Client bound to a single prediction service.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: &ProbeConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("riskprobe/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url: config.base_url.clone(),
            client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve `path` against the base URL. `/` and `` both map to the base itself.
    pub fn url_for(&self, path: &str) -> Result<Url> {
        let relative = path.trim().trim_start_matches('/');
        self.base_url
            .join(relative)
            .map_err(|e| ProbeError::InvalidBaseUrl {
                url: format!("{}{relative}", self.base_url),
                reason: e.to_string(),
            })
    }

    pub async fn get(&self, path: &str) -> Result<HttpResponse> {
        self.send(&RequestInput::get(path)).await
    }

    pub async fn post_json<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<HttpResponse> {
        self.send(&RequestInput::post_json(path, body)?).await
    }

    /// Perform the request. Any status code is a successful round trip; only
    /// transport failures are errors.
    pub async fn send(&self, request: &RequestInput) -> Result<HttpResponse> {
        let url = self.url_for(&request.path)?;
        let method: reqwest::Method = request.method.into();

        let mut req_builder = self
            .client
            .request(method, url.clone())
            .header(ACCEPT, HeaderValue::from_static("application/json"));

        if request.method == HttpMethod::Post {
            if let Some(body) = &request.body {
                req_builder = req_builder.json(body);
            }
        }

        tracing::debug!(method = %request.method, %url, "sending request");

        let started = Instant::now();
        let response = req_builder
            .send()
            .await
            .map_err(|e| classify_error(url.as_str(), e))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| classify_error(url.as_str(), e))?;
        let elapsed = started.elapsed().as_millis();

        tracing::debug!(
            status = status.as_u16(),
            duration_ms = elapsed as u64,
            size = bytes.len(),
            "received response"
        );

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
            duration_ms: elapsed,
            size_bytes: bytes.len(),
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

fn classify_error(url: &str, err: reqwest::Error) -> ProbeError {
    if err.is_timeout() {
        ProbeError::Timeout {
            url: url.to_string(),
            source: err,
        }
    } else if err.is_connect() {
        ProbeError::Connect {
            url: url.to_string(),
            source: err,
        }
    } else {
        ProbeError::Request(err)
    }
}
