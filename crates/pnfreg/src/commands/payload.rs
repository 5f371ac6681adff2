//! `pnfreg payload`: build one registration event without sending it.

use std::future::{Future, ready};

use pnfreg_config::FigmentSettings;
use pnfreg_core::{
    CoreError, Endpoint, EventPublisher, Protocol, Registrar, VesEndpointDetails,
    resolve_advertised_endpoint,
};

use super::config_file;
use crate::cli::{GlobalOpts, OutputFormat, PayloadArgs};
use crate::error::CliError;
use crate::output;

/// Publisher for a registrar that only builds events.
struct DryRun;

impl EventPublisher for DryRun {
    fn publish(
        &self,
        _endpoint: &VesEndpointDetails,
        _body: String,
    ) -> impl Future<Output = Result<(), CoreError>> + Send {
        ready(Ok(()))
    }
}

pub fn handle(args: &PayloadArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let settings = FigmentSettings::load(&config_file(global))?;
    let cfg = settings.config();

    let env = cfg.network_function_env();
    let advertised = resolve_advertised_endpoint(&env, cfg.addressing_method());
    let endpoint = Endpoint {
        address: advertised.address,
        port: u32::from(args.port),
        protocol: if args.tls { Protocol::Tls } else { Protocol::Ssh },
    };

    // Fresh registrar: the event carries sequence 0.
    let event = Registrar::new(env, DryRun).build_event(&endpoint)?;

    let rendered = match global.output {
        OutputFormat::Text => output::render_json(&event)?,
        // Exactly the body that would be POSTed.
        OutputFormat::Json => event.to_body()?,
    };
    output::print_output(&rendered, global.quiet);
    Ok(())
}
