//! Application entry point for the `sprinkler-agent` binary.
//!
//! One invocation makes one watering decision:
//! - Loading configuration from environment variables or `.env`
//! - Initializing structured logging/tracing
//! - Authenticating with the irrigation controller and building the
//!   sensor, forecast, model and notification clients
//! - Running the decision pipeline and pushing the answer as a note
//!
//! # Environment Variables
//! See `config::load_from_env` for the full list. Logging is controlled by:
//! - `SPRINKLER_LOG_LEVEL` (optional) – log verbosity (default: `debug`)
//! - `SPRINKLER_SPAN_EVENTS` (optional) – span event mode for tracing
//!
//! Scheduling (cron, systemd timer) is left to the host.
use std::{env, process::ExitCode};

use anyhow::Result;
use chrono::Local;
use dotenvy::dotenv;
use is_terminal::IsTerminal;
use tracing::Level;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use sprinkler_agent::clients::{
    EcowittClient, GeminiClient, NwsClient, PushbulletClient, RainMachineClient,
};
use sprinkler_agent::{config, pipeline, Collaborators, RunSettings};

// ---

#[tokio::main]
async fn main() -> ExitCode {
    // ---
    init_tracing();
    dotenv().ok();

    match try_main().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn try_main() -> Result<()> {
    // ---
    let cfg = config::load_from_env()?;
    cfg.log_config();

    let timeout = cfg.http_timeout_secs;

    tracing::info!("Authenticating with RainMachine API at {}", cfg.rain_machine_url);
    let rain_machine =
        RainMachineClient::login(&cfg.rain_machine_url, &cfg.rain_machine_password, timeout)
            .await?;

    let ecowitt = EcowittClient::new(&cfg.ecowitt_api_key, &cfg.ecowitt_application_key, timeout)?;
    let nws = NwsClient::new(
        cfg.forecast_latitude,
        cfg.forecast_longitude,
        &cfg.user_agent,
        timeout,
    )?;
    let gemini = GeminiClient::new(&cfg.google_api_key, &cfg.google_model, timeout)?;
    let pushbullet = PushbulletClient::new(&cfg.pushbullet_api_key, timeout)?;

    let settings = RunSettings::from_config(&cfg, Local::now().date_naive());
    let decision = pipeline::run(
        &settings,
        Collaborators {
            sensors: &ecowitt,
            watering: &rain_machine,
            forecast: &nws,
            decision: &gemini,
            notifier: &pushbullet,
        },
    )
    .await?;

    tracing::info!(
        watering_days = decision.watering.len(),
        soil_days = decision.soil.len(),
        "Run complete"
    );
    Ok(())
}

// ---

/// Install the global `tracing` subscriber (compact, with file and line).
///
/// `RUST_LOG` wins when set; otherwise `SPRINKLER_LOG_LEVEL` picks the level
/// and chatty HTTP/TLS targets are capped at `warn`. `SPRINKLER_SPAN_EVENTS`
/// (`full` | `enter_exit`) widens span events beyond CLOSE, and `FORCE_COLOR`
/// overrides TTY colour detection.
fn init_tracing() {
    // ---
    let span_events = match env::var("SPRINKLER_SPAN_EVENTS").as_deref() {
        Ok("full") => FmtSpan::FULL,
        Ok("enter_exit") => FmtSpan::ENTER | FmtSpan::EXIT,
        _ => FmtSpan::CLOSE,
    };

    let use_color = match env::var("FORCE_COLOR").as_deref() {
        Ok("1") | Ok("true") | Ok("yes") => true,
        Ok("0") | Ok("false") | Ok("no") => false,
        _ => std::io::stdout().is_terminal(),
    };

    let env_filter = if env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = env::var("SPRINKLER_LOG_LEVEL")
            .ok()
            .and_then(|v| v.parse::<Level>().ok())
            .unwrap_or(Level::DEBUG);
        let level = level.as_str().to_ascii_lowercase();
        EnvFilter::new(format!("{level},hyper_util=warn,rustls=warn"))
    };

    tracing_subscriber::fmt()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(span_events)
        .with_env_filter(env_filter)
        .with_ansi(use_color)
        .compact()
        .init();
}
