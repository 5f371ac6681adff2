// ── Collector seam ──

use std::future::Future;
use std::sync::OnceLock;

use pnfreg_api::CollectorClient;
use tracing::warn;

use crate::config::{CollectorConfig, VesEndpointDetails};
use crate::error::CoreError;

/// Delivers one serialized event to a collector.
pub trait EventPublisher {
    fn publish(
        &self,
        endpoint: &VesEndpointDetails,
        body: String,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}

impl EventPublisher for CollectorClient {
    fn publish(
        &self,
        endpoint: &VesEndpointDetails,
        body: String,
    ) -> impl Future<Output = Result<(), CoreError>> + Send {
        async move {
            self.post_event(&endpoint.url, &endpoint.auth, body)
                .await
                .map_err(CoreError::from)
        }
    }
}

/// Publisher that builds its [`CollectorClient`] on the first send.
///
/// A disabled run never touches the transport settings. When the client
/// cannot be built, every send of the run fails with
/// [`CoreError::ClientSetup`].
#[derive(Debug)]
pub struct LazyCollector {
    config: CollectorConfig,
    client: OnceLock<Result<CollectorClient, String>>,
}

impl LazyCollector {
    pub fn new(config: CollectorConfig) -> Self {
        Self {
            config,
            client: OnceLock::new(),
        }
    }

    fn client(&self) -> Result<&CollectorClient, CoreError> {
        self.client
            .get_or_init(|| {
                CollectorClient::new(&self.config.transport()).map_err(|e| {
                    warn!(error = %e, "could not build collector client");
                    e.to_string()
                })
            })
            .as_ref()
            .map_err(|message| CoreError::ClientSetup {
                message: message.clone(),
            })
    }
}

impl EventPublisher for LazyCollector {
    fn publish(
        &self,
        endpoint: &VesEndpointDetails,
        body: String,
    ) -> impl Future<Output = Result<(), CoreError>> + Send {
        async move { self.client()?.publish(endpoint, body).await }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use pnfreg_api::CollectorAuth;

    use super::*;
    use crate::config::TlsVerification;

    fn unreadable_ca() -> CollectorConfig {
        CollectorConfig {
            tls: TlsVerification::CustomCa("/nonexistent/ca.pem".into()),
            timeout: Duration::from_secs(1),
        }
    }

    #[test]
    fn client_is_not_built_until_first_send() {
        let publisher = LazyCollector::new(unreadable_ca());
        assert!(publisher.client.get().is_none());
    }

    #[tokio::test]
    async fn unreadable_ca_fails_each_send() {
        let publisher = LazyCollector::new(unreadable_ca());
        let endpoint =
            VesEndpointDetails::from_parts("https", "127.0.0.1", 8443, CollectorAuth::None)
                .unwrap();

        for _ in 0..2 {
            let err = publisher
                .publish(&endpoint, "{}".into())
                .await
                .unwrap_err();
            assert!(
                matches!(err, CoreError::ClientSetup { ref message } if message.contains("CA")),
                "{err}"
            );
        }
    }
}
