//! HTTP client for the farm REST API

use crate::config::ClientConfig;
use crate::error::{FarmError, Result};
use crate::session::Session;
use crate::types::Pagination;
use reqwest::{header, Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// HTTP client for the farm REST API
///
/// Every request carries the session's bearer token. A 401 from any
/// endpoint clears the stored token and emits
/// [`SessionEvent::LoginRequired`](crate::SessionEvent::LoginRequired).
///
/// # Example
///
/// ```rust,no_run
/// use farm_client::{ClientConfig, FarmClient, PlotQuery, Session};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = FarmClient::new(
///     ClientConfig::new("http://localhost:5000/v1"),
///     Session::in_memory(),
/// )?;
///
/// let page = client.fetch_plots(&PlotQuery::default()).await?;
/// println!("{} plots", page.plots.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FarmClient {
    config: ClientConfig,
    session: Session,
    client: Client,
}

/// Decoded response body: the `data` part plus any pagination block
#[derive(Debug)]
pub(crate) struct Payload {
    pub data: Value,
    pub pagination: Option<Pagination>,
}

impl Payload {
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T> {
        Ok(serde_json::from_value(self.data)?)
    }
}

impl FarmClient {
    /// Create a new client
    pub fn new(config: ClientConfig, session: Session) -> Result<Self> {
        let config = config.validated()?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            config,
            session,
            client,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    // ==================== Request helpers ====================

    fn request(&self, method: Method, path: &str, query: &[(&str, String)]) -> RequestBuilder {
        let mut url = self.config.url(path);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&encode_query(query));
        }

        debug!(method = %method, url = %url, "Sending request");
        let builder = self.client.request(method, &url);

        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub(crate) async fn get_payload(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Payload> {
        let response = self.request(Method::GET, path, query).send().await?;
        self.handle_response(response).await
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.get_payload(path, query).await?.into_typed()
    }

    pub(crate) async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.request(method, path, &[]).json(body).send().await?;
        self.handle_response(response).await?.into_typed()
    }

    /// Send a request whose response body is irrelevant beyond success
    pub(crate) async fn send_empty(&self, method: Method, path: &str) -> Result<()> {
        let response = self.request(method, path, &[]).send().await?;
        self.handle_response(response).await?;
        Ok(())
    }

    /// The single place where status codes and envelopes are interpreted
    async fn handle_response(&self, response: reqwest::Response) -> Result<Payload> {
        let status = response.status();
        let text = response.text().await?;

        if status == StatusCode::UNAUTHORIZED {
            warn!("Server rejected session token, clearing it");
            self.session.expire();
            return Err(FarmError::Unauthorized(
                error_message(&text).unwrap_or_else(|| "Session expired".to_string()),
            ));
        }

        if status == StatusCode::NOT_FOUND {
            return Err(FarmError::NotFound(
                error_message(&text).unwrap_or_else(|| "Resource".to_string()),
            ));
        }

        if !status.is_success() {
            return Err(FarmError::Server {
                status: status.as_u16(),
                message: error_message(&text).unwrap_or(text),
            });
        }

        decode_payload(&text)
    }
}

/// Interpret a successful body.
///
/// `{success, data, message}` envelopes are unwrapped; anything else is a
/// legacy raw value and is returned as-is.
pub(crate) fn decode_payload(text: &str) -> Result<Payload> {
    if text.trim().is_empty() {
        return Ok(Payload {
            data: Value::Null,
            pagination: None,
        });
    }

    let mut value: Value = serde_json::from_str(text)?;

    let is_envelope = value
        .as_object()
        .map(|obj| obj.get("success").map_or(false, Value::is_boolean))
        .unwrap_or(false);

    if !is_envelope {
        return Ok(Payload {
            data: value,
            pagination: None,
        });
    }

    if value.get("success") == Some(&Value::Bool(false)) {
        return Err(FarmError::Rejected(error_message(text).unwrap_or_default()));
    }

    let pagination = match value.get_mut("pagination").map(Value::take) {
        Some(Value::Null) | None => None,
        Some(raw) => Some(serde_json::from_value(raw)?),
    };
    let data = value
        .get_mut("data")
        .map(Value::take)
        .unwrap_or(Value::Null);

    Ok(Payload { data, pagination })
}

/// Pull `message` or `error` out of a JSON error body
fn error_message(text: &str) -> Option<String> {
    let value: Value = serde_json::from_str(text).ok()?;
    ["message", "error"]
        .iter()
        .filter_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|msg| !msg.is_empty())
        .map(str::to_string)
}

fn encode_query(pairs: &[(&str, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}
