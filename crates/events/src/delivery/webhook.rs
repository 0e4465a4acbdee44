//! Signed webhook delivery with exponential-backoff retry.
//!
//! A [`WebhookRequest`] is POSTed as JSON. When the subscription carries a
//! secret, the body is signed with HMAC-SHA256 and the hex digest is sent
//! as `X-Labelstack-Signature: sha256=<hex>`.

use std::time::Duration;

use hmac::{Hmac, Mac};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use sha2::Sha256;

/// Header carrying the payload signature.
pub const SIGNATURE_HEADER: &str = "x-labelstack-signature";

/// Retry delays between attempts (1 s, 2 s, 4 s).
const DEFAULT_RETRY_DELAYS: [Duration; 3] = [
    Duration::from_secs(1),
    Duration::from_secs(2),
    Duration::from_secs(4),
];

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// The HTTP request failed (network, DNS, timeout, ...).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint answered with a non-2xx status.
    #[error("Webhook returned HTTP {0}")]
    HttpStatus(u16),

    #[error("Invalid webhook header '{0}'")]
    InvalidHeader(String),

    #[error("Payload serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// One POST to one endpoint.
#[derive(Debug, Clone)]
pub struct WebhookRequest {
    pub url: String,
    pub body: serde_json::Value,
    /// Extra headers configured on the subscription.
    pub headers: Vec<(String, String)>,
    pub secret: Option<String>,
}

type HmacSha256 = Hmac<Sha256>;

/// Hex HMAC-SHA256 of `body` under `secret`.
pub fn sign_payload(secret: &str, body: &[u8]) -> String {
    // HMAC accepts keys of any length, so this never falls back.
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return String::new(),
    };
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

mod hex {
    /// Encode bytes as a lowercase hex string.
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
    }
}

// ---------------------------------------------------------------------------
// WebhookDelivery
// ---------------------------------------------------------------------------

pub struct WebhookDelivery {
    client: reqwest::Client,
    retry_delays: Vec<Duration>,
}

impl WebhookDelivery {
    /// Build a delivery service whose single attempts time out after
    /// `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, WebhookError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            retry_delays: DEFAULT_RETRY_DELAYS.to_vec(),
        })
    }

    /// Replace the backoff schedule. One retry is made per entry.
    pub fn with_retry_delays(mut self, delays: Vec<Duration>) -> Self {
        self.retry_delays = delays;
        self
    }

    /// Deliver `request`, retrying on failure. Returns the last error once
    /// every attempt has failed.
    pub async fn deliver(&self, request: &WebhookRequest) -> Result<(), WebhookError> {
        let body = serde_json::to_vec(&request.body)?;
        let headers = build_headers(request, &body)?;

        let mut attempt = 1;
        let mut delays = self.retry_delays.iter();
        loop {
            match self.try_send(&request.url, &headers, &body).await {
                Ok(()) => return Ok(()),
                Err(e) => match delays.next() {
                    Some(delay) => {
                        tracing::warn!(
                            attempt,
                            url = %request.url,
                            error = %e,
                            "Webhook delivery attempt failed, retrying"
                        );
                        tokio::time::sleep(*delay).await;
                        attempt += 1;
                    }
                    None => {
                        tracing::error!(
                            url = %request.url,
                            error = %e,
                            "Webhook delivery failed after all retries"
                        );
                        return Err(e);
                    }
                },
            }
        }
    }

    async fn try_send(
        &self,
        url: &str,
        headers: &HeaderMap,
        body: &[u8],
    ) -> Result<(), WebhookError> {
        let response = self
            .client
            .post(url)
            .headers(headers.clone())
            .body(body.to_vec())
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(WebhookError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}

fn build_headers(request: &WebhookRequest, body: &[u8]) -> Result<HeaderMap, WebhookError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    for (name, value) in &request.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| WebhookError::InvalidHeader(name.clone()))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| WebhookError::InvalidHeader(name.to_string()))?;
        headers.insert(name, value);
    }

    if let Some(secret) = request.secret.as_deref().filter(|s| !s.is_empty()) {
        let signature = format!("sha256={}", sign_payload(secret, body));
        let value = HeaderValue::from_str(&signature)
            .map_err(|_| WebhookError::InvalidHeader(SIGNATURE_HEADER.to_string()))?;
        headers.insert(SIGNATURE_HEADER, value);
    }

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn request(secret: Option<&str>, headers: &[(&str, &str)]) -> WebhookRequest {
        WebhookRequest {
            url: "http://127.0.0.1:1/hook".into(),
            body: serde_json::json!({"action": "ANNOTATIONS_CREATED"}),
            headers: headers
                .iter()
                .map(|(n, v)| (n.to_string(), v.to_string()))
                .collect(),
            secret: secret.map(str::to_string),
        }
    }

    #[test]
    fn signature_matches_known_vector() {
        assert_eq!(
            sign_payload("key", b"The quick brown fox jumps over the lazy dog"),
            "f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd8"
        );
    }

    #[test]
    fn headers_include_custom_values_and_signature() {
        let req = request(Some("s3cret"), &[("X-Team", "vision")]);
        let body = serde_json::to_vec(&req.body).unwrap();
        let headers = build_headers(&req, &body).unwrap();

        assert_eq!(headers["x-team"], "vision");
        let expected = format!("sha256={}", sign_payload("s3cret", &body));
        assert_eq!(headers[SIGNATURE_HEADER], expected.as_str());
    }

    #[test]
    fn unsigned_without_secret() {
        let req = request(None, &[]);
        let headers = build_headers(&req, b"{}").unwrap();
        assert!(headers.get(SIGNATURE_HEADER).is_none());
        assert_eq!(headers[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn invalid_header_name_is_rejected() {
        let req = request(None, &[("bad header", "x")]);
        assert_matches!(build_headers(&req, b"{}"), Err(WebhookError::InvalidHeader(_)));
    }

    #[tokio::test]
    async fn unreachable_endpoint_fails_after_retries() {
        let delivery = WebhookDelivery::new(Duration::from_secs(2))
            .unwrap()
            .with_retry_delays(vec![Duration::ZERO]);
        let err = delivery.deliver(&request(None, &[])).await.unwrap_err();
        assert_matches!(err, WebhookError::Request(_));
    }

    #[test]
    fn http_status_error_display() {
        assert_eq!(WebhookError::HttpStatus(502).to_string(), "Webhook returned HTTP 502");
    }
}
