//! `pnfreg register`: one feature start against the configured collector.

use owo_colors::OwoColorize;
use tabled::Tabled;
use tracing::debug;

use pnfreg_config::FigmentSettings;
use pnfreg_core::{
    EndpointOutcome, LazyCollector, Registrar, RegistrationReport, RegistrationStatus,
};

use super::config_file;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct OutcomeRow {
    #[tabled(rename = "Protocol")]
    protocol: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Port")]
    port: u32,
    #[tabled(rename = "Seq")]
    sequence: String,
    #[tabled(rename = "Result")]
    result: String,
}

impl From<&EndpointOutcome> for OutcomeRow {
    fn from(o: &EndpointOutcome) -> Self {
        Self {
            protocol: o.endpoint.protocol.to_string(),
            address: o.endpoint.address.clone(),
            port: o.endpoint.port,
            sequence: o.sequence.map_or_else(|| "-".into(), |s| s.to_string()),
            result: o.error.clone().unwrap_or_else(|| "sent".into()),
        }
    }
}

/// Send failures are reported, not returned: the run itself succeeded.
pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let path = config_file(global);
    debug!(path = %path.display(), "loading configuration");

    let settings = FigmentSettings::load(&path)?;
    let publisher = LazyCollector::new(settings.config().collector_config());
    let mut registrar = Registrar::new(settings.config().network_function_env(), publisher);

    let report = registrar.start(&settings).await?;

    let rendered = match global.output {
        OutputFormat::Json => output::render_json(&report)?,
        OutputFormat::Text => render_report(&report, output::should_color(global.color)),
    };
    output::print_output(&rendered, global.quiet);
    Ok(())
}

fn render_report(report: &RegistrationReport, color: bool) -> String {
    if report.status == RegistrationStatus::Disabled {
        return "PNF registration is disabled (set ves.pnf_registration = true to enable)".into();
    }
    if report.outcomes.is_empty() {
        return "No NETCONF endpoints configured; nothing to register".into();
    }

    let rows: Vec<OutcomeRow> = report.outcomes.iter().map(OutcomeRow::from).collect();
    let summary = format!(
        "{}/{} endpoints registered",
        report.succeeded(),
        report.attempted()
    );
    let summary = match (color, report.failed()) {
        (false, _) => summary,
        (true, 0) => summary.green().to_string(),
        (true, _) => summary.yellow().to_string(),
    };

    let mut out = String::new();
    if let Some(ref advertised) = report.advertised {
        out.push_str(&format!(
            "Advertised {} (base port {})\n",
            advertised.address, advertised.base_port
        ));
    }
    out.push_str(&output::render_table(&rows));
    out.push('\n');
    out.push_str(&summary);
    out
}
