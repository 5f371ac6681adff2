// ── PNF registration flow ──
//
// Feature start reads the enable flag, resolves the advertised address,
// and sends one pnfRegistration event per management endpoint: every SSH
// endpoint first, then every TLS endpoint, with a single port offset that
// runs across both. A failed send is logged and recorded; the loop always
// moves on to the next endpoint.

use serde::Serialize;
use tracing::{debug, error, info};

use crate::address::{AdvertisedEndpoint, resolve_advertised_endpoint};
use crate::config::NetworkFunctionEnv;
use crate::error::CoreError;
use crate::model::event::{DOMAIN, EVENT_TYPE, PRIORITY};
use crate::model::{
    CommonEventHeader, MacSource, PnfRegistrationFields, Protocol, RandomMac, RegistrationEvent,
};
use crate::publisher::EventPublisher;
use crate::settings::{PNF_REGISTRATION_SETTING, SettingsSource};

// ── Session ─────────────────────────────────────────────────────────

/// Sequence state of one registration run.
///
/// Reset to 0 at every feature start; advanced once per header built,
/// whether or not the send that follows succeeds.
#[derive(Debug, Default)]
pub struct RegistrationSession {
    sequence: u64,
}

impl RegistrationSession {
    pub fn reset(&mut self) {
        self.sequence = 0;
    }

    /// Sequence number the next header will carry.
    pub fn current(&self) -> u64 {
        self.sequence
    }

    /// Hand out the current sequence number and advance.
    pub fn next_sequence(&mut self) -> u64 {
        let sequence = self.sequence;
        self.sequence += 1;
        sequence
    }
}

// ── Endpoints ───────────────────────────────────────────────────────

/// One NETCONF management endpoint to announce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    pub address: String,
    /// Wider than a TCP port so a plan running past 65535 stays
    /// representable; such endpoints fail at send time.
    pub port: u32,
    pub protocol: Protocol,
}

/// Lay out `ssh` SSH endpoints then `tls` TLS endpoints on consecutive
/// ports starting at `advertised.base_port`.
pub fn plan_endpoints(advertised: &AdvertisedEndpoint, ssh: u16, tls: u16) -> Vec<Endpoint> {
    std::iter::repeat_n(Protocol::Ssh, usize::from(ssh))
        .chain(std::iter::repeat_n(Protocol::Tls, usize::from(tls)))
        .zip(u32::from(advertised.base_port)..)
        .map(|(protocol, port)| Endpoint {
            address: advertised.address.clone(),
            port,
            protocol,
        })
        .collect()
}

// ── Report ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    /// Flag false or absent; nothing was sent.
    Disabled,
    /// Every planned endpoint was attempted.
    Completed,
}

/// Result of one endpoint's send attempt.
#[derive(Debug, Clone, Serialize)]
pub struct EndpointOutcome {
    #[serde(flatten)]
    pub endpoint: Endpoint,
    /// Sequence number used in the header, if one was built.
    pub sequence: Option<u64>,
    /// Failure message; `None` means the collector accepted the event.
    pub error: Option<String>,
}

impl EndpointOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// What a feature start did.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationReport {
    pub status: RegistrationStatus,
    pub advertised: Option<AdvertisedEndpoint>,
    pub outcomes: Vec<EndpointOutcome>,
}

impl RegistrationReport {
    fn disabled() -> Self {
        Self {
            status: RegistrationStatus::Disabled,
            advertised: None,
            outcomes: Vec::new(),
        }
    }

    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.attempted() - self.succeeded()
    }
}

// ── Registrar ───────────────────────────────────────────────────────

/// Drives PNF registration for one simulated network function.
pub struct Registrar<P, M = RandomMac> {
    env: NetworkFunctionEnv,
    publisher: P,
    mac_source: M,
    session: RegistrationSession,
}

impl<P: EventPublisher> Registrar<P, RandomMac> {
    pub fn new(env: NetworkFunctionEnv, publisher: P) -> Self {
        Self::with_mac_source(env, publisher, RandomMac)
    }
}

impl<P: EventPublisher, M: MacSource> Registrar<P, M> {
    pub fn with_mac_source(env: NetworkFunctionEnv, publisher: P, mac_source: M) -> Self {
        Self {
            env,
            publisher,
            mac_source,
            session: RegistrationSession::default(),
        }
    }

    pub fn env(&self) -> &NetworkFunctionEnv {
        &self.env
    }

    pub fn session(&self) -> &RegistrationSession {
        &self.session
    }

    /// Feature start.
    ///
    /// Returns an error only when the enable flag cannot be read.
    /// Individual send failures are recorded in the report.
    pub async fn start<S>(&mut self, settings: &S) -> Result<RegistrationReport, CoreError>
    where
        S: SettingsSource + Sync,
    {
        self.session.reset();

        let enabled = match settings.get_bool(PNF_REGISTRATION_SETTING)? {
            Some(enabled) => enabled,
            None => {
                info!("PNF registration setting not found, treating as disabled");
                false
            }
        };
        if !enabled {
            info!("PNF registration is disabled");
            return Ok(RegistrationReport::disabled());
        }

        let method = settings.addressing_method();
        let advertised = resolve_advertised_endpoint(&self.env, method);
        let endpoints = plan_endpoints(
            &advertised,
            self.env.ssh_connections,
            self.env.tls_connections,
        );

        info!(
            %method,
            address = %advertised.address,
            base_port = advertised.base_port,
            ssh = self.env.ssh_connections,
            tls = self.env.tls_connections,
            "starting PNF registration"
        );

        let mut outcomes = Vec::with_capacity(endpoints.len());
        for endpoint in endpoints {
            let before = self.session.current();
            let result = self.send_registration(settings, &endpoint).await;
            let sequence = (self.session.current() > before).then_some(before);

            let error = match result {
                Ok(()) => None,
                Err(e) => {
                    error!(
                        ip = %endpoint.address,
                        port = endpoint.port,
                        protocol = %endpoint.protocol,
                        error = %e,
                        "could not send pnfRegistration message"
                    );
                    Some(e.to_string())
                }
            };
            outcomes.push(EndpointOutcome {
                endpoint,
                sequence,
                error,
            });
        }

        let report = RegistrationReport {
            status: RegistrationStatus::Completed,
            advertised: Some(advertised),
            outcomes,
        };
        info!(
            attempted = report.attempted(),
            failed = report.failed(),
            "PNF registration finished"
        );
        Ok(report)
    }

    /// Build, serialize and POST one registration event.
    pub async fn send_registration<S>(
        &mut self,
        settings: &S,
        endpoint: &Endpoint,
    ) -> Result<(), CoreError>
    where
        S: SettingsSource + Sync,
    {
        let body = self.build_event(endpoint)?.to_body()?;
        let details = settings.ves_endpoint_details()?;

        debug!(
            url = %details.url,
            port = endpoint.port,
            protocol = %endpoint.protocol,
            "sending pnfRegistration"
        );
        self.publisher.publish(&details, body).await
    }

    /// Build the event for one endpoint, consuming a sequence number.
    ///
    /// An endpoint past the TCP port range is rejected before its header
    /// is built, so it takes no sequence number.
    pub fn build_event(&mut self, endpoint: &Endpoint) -> Result<RegistrationEvent, CoreError> {
        let port = u16::try_from(endpoint.port).map_err(|_| CoreError::Config {
            message: format!("port {} is outside the TCP port range", endpoint.port),
        })?;
        let source_name = format!("{}_{}", self.env.hostname, port);
        let header = CommonEventHeader::new(
            DOMAIN,
            EVENT_TYPE,
            &source_name,
            PRIORITY,
            self.session.next_sequence(),
        );

        let mac = self.mac_source.random_mac()?;
        let fields = PnfRegistrationFields::new(
            &self.env.hostname,
            &endpoint.address,
            port,
            endpoint.protocol,
            mac,
        );

        Ok(RegistrationEvent::new(header, fields))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use pnfreg_api::CollectorAuth;
    use serde_json::Value;

    use super::*;
    use crate::config::{AddressingMethod, VesEndpointDetails};
    use crate::model::MacAddress;

    // ── Fakes ───────────────────────────────────────────────────────

    struct FakeSettings {
        flag: Result<Option<bool>, ()>,
        method: AddressingMethod,
        endpoint_available: bool,
    }

    impl FakeSettings {
        fn enabled() -> Self {
            Self {
                flag: Ok(Some(true)),
                method: AddressingMethod::DockerMapping,
                endpoint_available: true,
            }
        }
    }

    impl SettingsSource for FakeSettings {
        fn get_bool(&self, path: &str) -> Result<Option<bool>, CoreError> {
            assert_eq!(path, PNF_REGISTRATION_SETTING);
            self.flag.map_err(|()| CoreError::ConfigRead {
                path: path.into(),
                message: "store unavailable".into(),
            })
        }

        fn addressing_method(&self) -> AddressingMethod {
            self.method
        }

        fn ves_endpoint_details(&self) -> Result<VesEndpointDetails, CoreError> {
            if !self.endpoint_available {
                return Err(CoreError::EndpointDetailsUnavailable {
                    message: "no endpoint".into(),
                });
            }
            VesEndpointDetails::from_parts("https", "127.0.0.1", 8443, CollectorAuth::None)
        }
    }

    /// Records every body and fails the ports listed in `failing_ports`.
    #[derive(Default)]
    struct RecordingPublisher {
        failing_ports: HashSet<u32>,
        bodies: Mutex<Vec<Value>>,
    }

    impl RecordingPublisher {
        fn failing(ports: &[u32]) -> Self {
            Self {
                failing_ports: ports.iter().copied().collect(),
                ..Self::default()
            }
        }

        fn bodies(&self) -> Vec<Value> {
            self.bodies.lock().unwrap().clone()
        }
    }

    impl EventPublisher for RecordingPublisher {
        async fn publish(
            &self,
            _endpoint: &VesEndpointDetails,
            body: String,
        ) -> Result<(), CoreError> {
            let value: Value = serde_json::from_str(&body).unwrap();
            let port: u32 = value["event"]["pnfRegistrationFields"]["additionalFields"]["oamPort"]
                .as_str()
                .unwrap()
                .parse()
                .unwrap();
            self.bodies.lock().unwrap().push(value);
            if self.failing_ports.contains(&port) {
                return Err(CoreError::Collector {
                    message: "simulated failure".into(),
                    code: None,
                    status: Some(500),
                });
            }
            Ok(())
        }
    }

    struct FixedMac;

    impl MacSource for FixedMac {
        fn random_mac(&self) -> Result<MacAddress, CoreError> {
            Ok(MacAddress::new("02:00:00:00:00:01"))
        }
    }

    struct BrokenMac;

    impl MacSource for BrokenMac {
        fn random_mac(&self) -> Result<MacAddress, CoreError> {
            Err(CoreError::PayloadBuild {
                message: "no entropy".into(),
            })
        }
    }

    fn env(ssh: u16, tls: u16) -> NetworkFunctionEnv {
        NetworkFunctionEnv {
            hostname: "sim1".into(),
            host_ip: "192.168.1.20".into(),
            host_base_port: 50_000,
            ip_v4: "10.10.1.1".into(),
            ip_v6: "2001:db8::10".into(),
            ip_v6_enabled: false,
            ssh_connections: ssh,
            tls_connections: tls,
        }
    }

    fn registrar(
        ssh: u16,
        tls: u16,
        publisher: RecordingPublisher,
    ) -> Registrar<RecordingPublisher, FixedMac> {
        Registrar::with_mac_source(env(ssh, tls), publisher, FixedMac)
    }

    fn field<'a>(body: &'a Value, key: &str) -> &'a Value {
        &body["event"]["pnfRegistrationFields"]["additionalFields"][key]
    }

    // ── Session ─────────────────────────────────────────────────────

    #[test]
    fn session_hands_out_increasing_numbers() {
        let mut session = RegistrationSession::default();
        assert_eq!(session.next_sequence(), 0);
        assert_eq!(session.next_sequence(), 1);
        assert_eq!(session.current(), 2);
        session.reset();
        assert_eq!(session.next_sequence(), 0);
    }

    // ── Planning ────────────────────────────────────────────────────

    #[test]
    fn plan_ssh_then_tls_on_shared_offset() {
        let advertised = AdvertisedEndpoint {
            address: "10.10.1.1".into(),
            base_port: 830,
        };
        let plan = plan_endpoints(&advertised, 2, 3);

        let ports: Vec<_> = plan.iter().map(|e| e.port).collect();
        let protocols: Vec<_> = plan.iter().map(|e| e.protocol).collect();
        assert_eq!(ports, vec![830, 831, 832, 833, 834]);
        assert_eq!(
            protocols,
            vec![
                Protocol::Ssh,
                Protocol::Ssh,
                Protocol::Tls,
                Protocol::Tls,
                Protocol::Tls
            ]
        );
    }

    #[test]
    fn plan_empty_when_no_connections() {
        let advertised = AdvertisedEndpoint {
            address: "10.10.1.1".into(),
            base_port: 830,
        };
        assert!(plan_endpoints(&advertised, 0, 0).is_empty());
    }

    #[test]
    fn plan_runs_past_the_last_tcp_port() {
        let advertised = AdvertisedEndpoint {
            address: "10.10.1.1".into(),
            base_port: u16::MAX,
        };
        let ports: Vec<_> = plan_endpoints(&advertised, 1, 1)
            .iter()
            .map(|e| e.port)
            .collect();
        assert_eq!(ports, vec![65_535, 65_536]);
    }

    // ── Gate ────────────────────────────────────────────────────────

    #[tokio::test]
    async fn disabled_flag_sends_nothing() {
        let mut registrar = registrar(2, 2, RecordingPublisher::default());
        let settings = FakeSettings {
            flag: Ok(Some(false)),
            ..FakeSettings::enabled()
        };

        let report = registrar.start(&settings).await.unwrap();
        assert_eq!(report.status, RegistrationStatus::Disabled);
        assert_eq!(report.attempted(), 0);
        assert!(registrar.publisher.bodies().is_empty());
    }

    #[tokio::test]
    async fn absent_flag_is_disabled() {
        let mut registrar = registrar(1, 0, RecordingPublisher::default());
        let settings = FakeSettings {
            flag: Ok(None),
            ..FakeSettings::enabled()
        };

        let report = registrar.start(&settings).await.unwrap();
        assert_eq!(report.status, RegistrationStatus::Disabled);
        assert!(registrar.publisher.bodies().is_empty());
    }

    #[tokio::test]
    async fn unreadable_flag_fails_start() {
        let mut registrar = registrar(1, 1, RecordingPublisher::default());
        let settings = FakeSettings {
            flag: Err(()),
            ..FakeSettings::enabled()
        };

        let err = registrar.start(&settings).await.unwrap_err();
        assert!(matches!(err, CoreError::ConfigRead { .. }));
        assert!(registrar.publisher.bodies().is_empty());
    }

    // ── Dispatch ────────────────────────────────────────────────────

    #[tokio::test]
    async fn sends_one_event_per_endpoint_in_order() {
        let mut registrar = registrar(2, 1, RecordingPublisher::default());
        let report = registrar.start(&FakeSettings::enabled()).await.unwrap();

        assert_eq!(report.status, RegistrationStatus::Completed);
        assert_eq!(report.attempted(), 3);
        assert_eq!(report.succeeded(), 3);

        let bodies = registrar.publisher.bodies();
        let ports: Vec<_> = bodies.iter().map(|b| field(b, "oamPort").clone()).collect();
        let protocols: Vec<_> = bodies.iter().map(|b| field(b, "protocol").clone()).collect();
        assert_eq!(ports, vec!["830", "831", "832"]);
        assert_eq!(protocols, vec!["SSH", "SSH", "TLS"]);
    }

    #[tokio::test]
    async fn sequence_restarts_at_zero_each_start() {
        let mut registrar = registrar(1, 2, RecordingPublisher::default());
        registrar.start(&FakeSettings::enabled()).await.unwrap();
        registrar.start(&FakeSettings::enabled()).await.unwrap();

        let sequences: Vec<_> = registrar
            .publisher
            .bodies()
            .iter()
            .map(|b| b["event"]["commonEventHeader"]["sequence"].as_u64().unwrap())
            .collect();
        assert_eq!(sequences, vec![0, 1, 2, 0, 1, 2]);
    }

    #[tokio::test]
    async fn failed_send_does_not_stop_the_loop() {
        let mut registrar = registrar(2, 2, RecordingPublisher::failing(&[831]));
        let report = registrar.start(&FakeSettings::enabled()).await.unwrap();

        assert_eq!(report.attempted(), 4);
        assert_eq!(report.succeeded(), 3);
        assert_eq!(report.failed(), 1);

        let failed = &report.outcomes[1];
        assert_eq!(failed.endpoint.port, 831);
        assert!(!failed.is_success());
        assert_eq!(failed.sequence, Some(1));

        // Sequence keeps counting past the failure.
        let last = &report.outcomes[3];
        assert_eq!(last.sequence, Some(3));
        assert!(last.is_success());
    }

    #[tokio::test]
    async fn zero_endpoints_complete_without_sends() {
        let mut registrar = registrar(0, 0, RecordingPublisher::default());
        let report = registrar.start(&FakeSettings::enabled()).await.unwrap();

        assert_eq!(report.status, RegistrationStatus::Completed);
        assert_eq!(report.attempted(), 0);
        assert_eq!(registrar.session().current(), 0);
    }

    #[tokio::test]
    async fn missing_endpoint_details_fail_each_send() {
        let mut registrar = registrar(1, 1, RecordingPublisher::default());
        let settings = FakeSettings {
            endpoint_available: false,
            ..FakeSettings::enabled()
        };

        let report = registrar.start(&settings).await.unwrap();
        assert_eq!(report.status, RegistrationStatus::Completed);
        assert_eq!(report.failed(), 2);
        assert!(registrar.publisher.bodies().is_empty());
        // Headers were built before the lookup failed.
        assert_eq!(report.outcomes[1].sequence, Some(1));
    }

    #[tokio::test]
    async fn mac_failure_aborts_only_that_send() {
        let mut registrar =
            Registrar::with_mac_source(env(1, 1), RecordingPublisher::default(), BrokenMac);
        let report = registrar.start(&FakeSettings::enabled()).await.unwrap();

        assert_eq!(report.attempted(), 2);
        assert_eq!(report.failed(), 2);
        assert!(registrar.publisher.bodies().is_empty());
    }

    #[tokio::test]
    async fn host_mapping_advertises_host_ports() {
        let mut registrar = registrar(1, 1, RecordingPublisher::default());
        let settings = FakeSettings {
            method: AddressingMethod::HostMapping,
            ..FakeSettings::enabled()
        };
        let report = registrar.start(&settings).await.unwrap();

        let ports: Vec<_> = report.outcomes.iter().map(|o| o.endpoint.port).collect();
        assert_eq!(ports, vec![50_000, 50_001]);

        let body = &registrar.publisher.bodies()[0];
        let fields = &body["event"]["pnfRegistrationFields"];
        assert_eq!(fields["oamV4IpAddress"], "192.168.1.20");
        assert_eq!(
            fields["serialNumber"],
            "sim1-192.168.1.20-50000-Simulated Device Melacon"
        );
        assert_eq!(body["event"]["commonEventHeader"]["sourceName"], "sim1_50000");
    }

    #[tokio::test]
    async fn ports_past_the_range_fail_without_stopping_the_run() {
        let near_top = NetworkFunctionEnv {
            host_base_port: u16::MAX,
            ..env(2, 1)
        };
        let mut registrar =
            Registrar::with_mac_source(near_top, RecordingPublisher::default(), FixedMac);
        let settings = FakeSettings {
            method: AddressingMethod::HostMapping,
            ..FakeSettings::enabled()
        };

        let report = registrar.start(&settings).await.unwrap();
        assert_eq!(report.status, RegistrationStatus::Completed);
        assert_eq!(report.attempted(), 3);
        assert_eq!(report.succeeded(), 1);

        assert!(report.outcomes[0].is_success());
        assert_eq!(report.outcomes[0].sequence, Some(0));
        for outcome in &report.outcomes[1..] {
            assert_eq!(outcome.sequence, None);
            assert!(outcome.error.as_deref().unwrap().contains("outside the TCP port range"));
        }
        assert_eq!(registrar.publisher.bodies().len(), 1);
        assert_eq!(registrar.session().current(), 1);
    }

    #[test]
    fn build_event_consumes_one_sequence_number() {
        let mut registrar = registrar(0, 0, RecordingPublisher::default());
        let endpoint = Endpoint {
            address: "10.10.1.1".into(),
            port: 831,
            protocol: Protocol::Tls,
        };

        let first = registrar.build_event(&endpoint).unwrap();
        let second = registrar.build_event(&endpoint).unwrap();
        assert_eq!(first.event.common_event_header.sequence, 0);
        assert_eq!(second.event.common_event_header.sequence, 1);
        assert_eq!(
            first.event.pnf_registration_fields.serial_number,
            "sim1-10.10.1.1-831-Simulated Device Melacon"
        );
    }
}
