use chrono::Utc;
use habitboard_core::{build_report, payload, Config};

/// Build the report and print it, no delivery. Still runs the payload
/// gate so an oversized report is caught here too.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let service = super::open_service(&config)?;

    let report = build_report(&service, Utc::now())?;
    let size = payload::validate(&payload::encode(&report)?)?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    log::info!("report payload is {size} bytes");
    Ok(())
}
