//! Async HTTP client for a JSON quote service.
//!
//! Calls are `POST {base_url}/discover` and `POST {base_url}/explore` with
//! the bodies defined in [`crate::service`]. Non-2xx answers carrying an
//! `{"error": "..."}` body surface that message.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::service::{
  DiscoverRequest, DiscoverResponse, ExploreRequest, ExploreResponse, QuoteService,
  ServiceError,
};

fn default_base_url() -> String { "http://localhost:8787".to_string() }

fn default_timeout_secs() -> u64 { 60 }

/// Connection settings for the quote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
  #[serde(default = "default_base_url")]
  pub base_url:     String,
  /// Sent as a bearer token when present.
  #[serde(default)]
  pub api_key:      Option<String>,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

impl Default for ServiceConfig {
  fn default() -> Self {
    Self {
      base_url:     default_base_url(),
      api_key:      None,
      timeout_secs: default_timeout_secs(),
    }
  }
}

#[derive(Deserialize)]
struct ErrorBody {
  error: String,
}

/// [`QuoteService`] over HTTP.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct HttpQuoteService {
  client: Client,
  config: ServiceConfig,
}

impl HttpQuoteService {
  pub fn new(config: ServiceConfig) -> Result<Self, ServiceError> {
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()?;
    Ok(Self { client, config })
  }

  pub fn config(&self) -> &ServiceConfig { &self.config }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    match &self.config.api_key {
      Some(key) if !key.is_empty() => req.bearer_auth(key),
      _ => req,
    }
  }

  async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ServiceError>
  where
    B: Serialize + Sync,
    R: DeserializeOwned,
  {
    let resp = self
      .auth(self.client.post(self.url(path)))
      .json(body)
      .send()
      .await?;

    let status = resp.status();
    let bytes = resp.bytes().await?;
    decode(status, &bytes).inspect_err(|e| {
      tracing::debug!(path, status = status.as_u16(), error = %e, "service call failed");
    })
  }
}

/// Turn a response into `R`. An `{"error": ...}` body is a failure whatever
/// the status: `Status` on non-2xx, `Rejected` otherwise.
fn decode<R: DeserializeOwned>(status: StatusCode, bytes: &[u8]) -> Result<R, ServiceError> {
  let error = serde_json::from_slice::<ErrorBody>(bytes).map(|b| b.error);

  if !status.is_success() {
    let message = error.unwrap_or_else(|_| {
      status.canonical_reason().unwrap_or("unknown error").to_string()
    });
    return Err(ServiceError::Status { status: status.as_u16(), message });
  }
  if let Ok(message) = error {
    return Err(ServiceError::Rejected(message));
  }

  Ok(serde_json::from_slice(bytes)?)
}

impl QuoteService for HttpQuoteService {
  async fn discover(
    &self,
    request: DiscoverRequest,
  ) -> Result<DiscoverResponse, ServiceError> {
    self.post("/discover", &request).await
  }

  async fn explore(&self, request: ExploreRequest) -> Result<ExploreResponse, ServiceError> {
    self.post("/explore", &request).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn url_joins_without_double_slash() {
    let svc = HttpQuoteService::new(ServiceConfig {
      base_url: "http://quotes.test/api/".into(),
      ..ServiceConfig::default()
    })
    .unwrap();
    assert_eq!(svc.url("/discover"), "http://quotes.test/api/discover");
  }

  #[test]
  fn discover_request_uses_camel_case() {
    let body = serde_json::to_value(DiscoverRequest {
      topic_gist: "courage".into(),
      count:      5,
    })
    .unwrap();
    assert_eq!(body, serde_json::json!({ "topicGist": "courage", "count": 5 }));
  }

  #[test]
  fn explore_response_parses_confirmation_flag() {
    let resp: ExploreResponse = serde_json::from_value(serde_json::json!({
      "meaning": "m",
      "origin": "o",
      "trivia": "t",
      "isConfirmed": true,
    }))
    .unwrap();
    let (exploration, confirmed) = resp.into_parts();
    assert!(confirmed);
    assert_eq!(exploration.meaning, "m");
  }

  #[test]
  fn error_body_on_success_is_a_rejection() {
    let err = decode::<DiscoverResponse>(
      StatusCode::OK,
      br#"{"error": "topic is not allowed"}"#,
    )
    .unwrap_err();
    assert!(matches!(err, ServiceError::Rejected(ref m) if m == "topic is not allowed"));
  }

  #[test]
  fn error_status_uses_body_message_or_reason() {
    let err = decode::<DiscoverResponse>(
      StatusCode::TOO_MANY_REQUESTS,
      br#"{"error": "slow down"}"#,
    )
    .unwrap_err();
    assert!(matches!(err, ServiceError::Status { status: 429, ref message } if message == "slow down"));

    let err = decode::<DiscoverResponse>(StatusCode::BAD_GATEWAY, b"<html>").unwrap_err();
    assert!(matches!(err, ServiceError::Status { status: 502, ref message } if message == "Bad Gateway"));
  }

  #[test]
  fn success_body_decodes() {
    let resp: DiscoverResponse = decode(
      StatusCode::OK,
      br#"{"quotes": [{"text": "t", "author": "a", "tags": ["x"]}]}"#,
    )
    .unwrap();
    assert_eq!(resp.quotes[0].tags, vec!["x"]);
  }

  #[test]
  fn discover_response_tolerates_missing_tags() {
    let resp: DiscoverResponse = serde_json::from_value(serde_json::json!({
      "quotes": [{ "text": "t", "author": "a" }],
    }))
    .unwrap();
    assert!(resp.quotes[0].tags.is_empty());
  }
}
