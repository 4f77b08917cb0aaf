use chrono::Utc;
use habitboard_core::{build_report, payload, Config, TrmnlWebhook};

/// Full pipeline: fetch, compute, validate, deliver.
///
/// A fetch or validation failure aborts with an error; a webhook delivery
/// failure is only logged, since delivery is the terminal step and nothing
/// after it can be corrupted.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let (plugin_id, token) = config.webhook()?;
    let webhook = TrmnlWebhook::new(plugin_id, token)?;

    let service = super::open_service(&config)?;
    let report = build_report(&service, Utc::now())?;

    let payload = payload::encode(&report)?;
    let size = payload::validate(&payload)?;
    log::info!("report payload is {size} bytes");

    if let Err(e) = webhook.push(&payload) {
        log::error!("webhook delivery failed: {e}");
    }
    Ok(())
}
