// VES collector HTTP client
//
// Wraps `reqwest::Client` with the collector's expectations: JSON body,
// optional basic auth, and the VES `requestError` envelope on failures.

use serde::Deserialize;
use tracing::{debug, trace};
use url::Url;

use crate::auth::CollectorAuth;
use crate::error::Error;
use crate::transport::TransportConfig;

/// VES collectors report rejected events as
/// `{"requestError":{"serviceException":{"messageId":"SVC0002","text":"..."}}}`
/// (or `policyException` with the same shape).
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequestErrorEnvelope {
    request_error: RequestError,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequestError {
    service_exception: Option<ExceptionBody>,
    policy_exception: Option<ExceptionBody>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExceptionBody {
    message_id: Option<String>,
    text: Option<String>,
}

/// HTTP client for posting events to a VES collector.
///
/// One client is shared across every send of a registration run; it holds
/// no per-request state.
#[derive(Debug, Clone)]
pub struct CollectorClient {
    http: reqwest::Client,
}

impl CollectorClient {
    /// Create a collector client from a `TransportConfig`.
    pub fn new(transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
        })
    }

    /// Create a collector client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// POST a serialized event to the collector.
    ///
    /// Any 2xx status is success; the response body is ignored.
    pub async fn post_event(
        &self,
        url: &Url,
        auth: &CollectorAuth,
        body: String,
    ) -> Result<(), Error> {
        debug!(%url, user = auth.username(), bytes = body.len(), "POST event");

        let builder = self
            .http
            .post(url.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body);
        let resp = auth.apply(builder).send().await.map_err(Error::Transport)?;

        Self::check_status(resp).await
    }

    async fn check_status(resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        trace!(%status, "collector responded");

        if status.is_success() {
            return Ok(());
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(Error::Authentication {
                message: format!("collector rejected credentials (HTTP {status})"),
            });
        }

        let body = resp.text().await.unwrap_or_default();
        let (message, message_id) = match serde_json::from_str::<RequestErrorEnvelope>(&body) {
            Ok(envelope) => {
                let exception = envelope
                    .request_error
                    .service_exception
                    .or(envelope.request_error.policy_exception);
                match exception {
                    Some(ex) => (
                        ex.text.unwrap_or_else(|| preview(&body)),
                        ex.message_id,
                    ),
                    None => (preview(&body), None),
                }
            }
            Err(_) => (preview(&body), None),
        };

        Err(Error::Collector {
            status: status.as_u16(),
            message,
            message_id,
        })
    }
}

fn preview(body: &str) -> String {
    body.chars().take(200).collect()
}
