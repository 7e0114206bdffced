//! Resilient JSON-over-HTTP caller with classified retry

use std::sync::Mutex;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::time::sleep;
use tracing::warn;

use tk_core::errors::NetworkError;
use tk_shared::config::RetryPolicy;
use tk_shared::types::ErrorBody;

/// Header carrying the calling service's own token
pub const SERVICE_AUTHORIZATION_HEADER: &str = "Service-Authorization";

/// JSON caller with classified retry-with-backoff
///
/// Per-attempt classification:
/// - timeout-class transport errors retry with jittered backoff;
/// - any other transport error fails immediately;
/// - a non-JSON response content type fails immediately;
/// - 2xx decodes the body into the result;
/// - 429 and 5xx retry while attempts remain, then surface the last
///   decoded error body as "retries exhausted";
/// - any other status decodes the error body and fails immediately.
///
/// Retries are sequential and blocking on the calling task; no concurrent
/// attempts are ever issued.
pub struct ResilientServiceCaller {
    client: Client,
    policy: RetryPolicy,
    jitter: Mutex<StdRng>,
}

impl ResilientServiceCaller {
    /// Creates a new caller with its own jitter generator
    ///
    /// # Arguments
    ///
    /// * `client` - The underlying HTTP client, carrying transport-level
    ///   configuration such as mTLS and per-attempt timeouts
    /// * `policy` - Retry policy, immutable for this caller's lifetime
    pub fn new(client: Client, policy: RetryPolicy) -> Self {
        Self::with_rng(client, policy, StdRng::from_entropy())
    }

    /// Creates a new caller with an explicit jitter generator
    pub fn with_rng(client: Client, policy: RetryPolicy, rng: StdRng) -> Self {
        Self {
            client,
            policy,
            jitter: Mutex::new(rng),
        }
    }

    /// Executes a GET request
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Absolute request URL
    /// * `service_token` - Sent as `Service-Authorization: Bearer` when
    ///   non-empty
    /// * `user_token` - Sent as `Authorization: Bearer` when non-empty
    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        service_token: &str,
        user_token: &str,
    ) -> Result<T, NetworkError> {
        self.call(Method::GET, endpoint, service_token, user_token, None::<&()>)
            .await
    }

    /// Executes a POST request, marshaling `payload` as the JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        service_token: &str,
        user_token: &str,
        payload: &B,
    ) -> Result<T, NetworkError> {
        self.call(Method::POST, endpoint, service_token, user_token, Some(payload))
            .await
    }

    async fn call<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: &str,
        service_token: &str,
        user_token: &str,
        payload: Option<&B>,
    ) -> Result<T, NetworkError> {
        let mut attempt: u32 = 0;

        loop {
            let mut request = self.client.request(method.clone(), endpoint);
            if !service_token.is_empty() {
                request = request.header(
                    SERVICE_AUTHORIZATION_HEADER,
                    format!("Bearer {}", service_token),
                );
            }
            if !user_token.is_empty() {
                request = request.header(AUTHORIZATION, format!("Bearer {}", user_token));
            }
            if let Some(payload) = payload {
                request = request.json(payload);
            }

            let response = match request.send().await {
                Ok(response) => response,
                Err(e) if e.is_timeout() => {
                    if attempt < self.policy.max_retries {
                        let backoff = self.jittered_backoff(attempt);
                        warn!(attempt, "request timed out, retrying in {:?}", backoff);
                        sleep(backoff).await;
                        attempt += 1;
                        continue;
                    }
                    return Err(NetworkError::Timeout);
                }
                Err(e) => {
                    return Err(NetworkError::Connection {
                        message: e.to_string(),
                    })
                }
            };

            let status = response.status();
            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            if !content_type.starts_with("application/json") {
                return Err(NetworkError::UnexpectedContentType { content_type });
            }

            if status.is_success() {
                return response
                    .json::<T>()
                    .await
                    .map_err(|e| NetworkError::InvalidBody {
                        message: e.to_string(),
                    });
            }

            let error_body = decode_error_body(response).await;

            if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                if attempt + 1 < self.policy.max_retries {
                    let backoff = self.jittered_backoff(attempt);
                    warn!(
                        attempt,
                        status = status.as_u16(),
                        "retryable remote error, retrying in {:?}",
                        backoff
                    );
                    sleep(backoff).await;
                    attempt += 1;
                    continue;
                }
                return Err(NetworkError::RetriesExhausted {
                    code: error_body.code,
                    message: error_body.message,
                });
            }

            return Err(NetworkError::RemoteStatus {
                status: status.as_u16(),
                code: error_body.code,
                message: error_body.message,
            });
        }
    }

    /// Backoff for the given attempt: half the doubled base plus a
    /// uniform jitter over the other half, capped at the policy maximum
    fn jittered_backoff(&self, attempt: u32) -> Duration {
        let backoff = self
            .policy
            .base_backoff_ms
            .saturating_mul(2u64.saturating_pow(attempt));
        let half = backoff / 2;

        let jitter = {
            let mut rng = match self.jitter.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            rng.gen_range(0..=half)
        };

        Duration::from_millis((half + jitter).min(self.policy.max_backoff_ms))
    }
}

/// Decodes the structured `{code, message}` error body, falling back to
/// the status code when the body is not decodable
async fn decode_error_body(response: reqwest::Response) -> ErrorBody {
    let status = response.status().as_u16() as i32;
    match response.json::<ErrorBody>().await {
        Ok(body) => body,
        Err(e) => ErrorBody::new(status, format!("undecodable error body: {}", e)),
    }
}
