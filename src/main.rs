use luma_door::adapters::{
    camera_openers, missing_camera_hint, FileCredentialsProvider, ReqwestHttpClient,
};
use luma_door::app::DoorApp;
use luma_door::auth::SessionClient;
use luma_door::checkin::CheckInOrchestrator;
use luma_door::cli::{handle_logout_command, handle_version_command, parse_args, CliCommand};
use luma_door::scanner::{PayloadParser, QrDecoder, ScanLoop, ScanOptions};
use luma_door::startup::{logging, AccountCredentials, Settings};
use luma_door::traits::CredentialsProvider;

use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::sync::Arc;

fn main() -> Result<()> {
    let args = parse_args(std::env::args());

    // Handle --version before any initialization
    if args.command == CliCommand::Version {
        handle_version_command();
        return Ok(());
    }

    color_eyre::install()?;

    let config_path = args.config.clone().unwrap_or_else(Settings::default_path);
    let settings = Settings::load(&config_path)?;
    logging::init(&settings.logging)?;
    if config_path.exists() {
        tracing::info!("Loaded settings from {}", config_path.display());
    } else {
        tracing::warn!("No settings at {}, using defaults", config_path.display());
    }

    let runtime = tokio::runtime::Runtime::new()?;
    let credentials: Arc<dyn CredentialsProvider> =
        Arc::new(FileCredentialsProvider::with_path(settings.credentials_path()?));

    if args.command == CliCommand::Logout {
        runtime.block_on(handle_logout_command(credentials.as_ref()))?;
        return Ok(());
    }

    let account = AccountCredentials::from_env()?;
    let http = Arc::new(ReqwestHttpClient::with_timeout(settings.api.timeout())?);
    let session = SessionClient::new(settings.api.clone(), http, credentials)
        .with_span(tracing::info_span!("session"));
    let orchestrator =
        CheckInOrchestrator::new(session, account).with_span(tracing::info_span!("orchestrator"));
    let app = Arc::new(
        DoorApp::new(orchestrator, runtime.handle().clone())
            .with_span(tracing::info_span!("door")),
    );
    let parser = PayloadParser::new(settings.qr.url_pattern.clone());

    if let CliCommand::CheckIn { payload } = &args.command {
        let outcome = app.check_in_payload(&parser, payload)?;
        if !outcome.is_success() {
            return Err(eyre!("check-in did not succeed"));
        }
        return Ok(());
    }

    let decoder = QrDecoder::new(settings.qr.duplicate_window())
        .with_span(tracing::info_span!("decoder"));
    let openers = camera_openers(&settings.camera.backends);
    if let Some(hint) = missing_camera_hint(&openers, &settings.camera.backends) {
        tracing::error!("{}", hint);
        return Err(eyre!(hint));
    }
    let scan = ScanLoop::new(
        openers,
        decoder,
        parser,
        ScanOptions::from_settings(&settings.camera, &settings.qr),
    )
    .with_span(tracing::info_span!("scanner"));

    let stop = scan.stop_handle();
    ctrlc::set_handler(move || {
        tracing::info!("Interrupted, stopping scanner");
        stop.stop();
    })?;

    app.run(&scan)?;
    Ok(())
}
