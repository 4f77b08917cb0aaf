//! Webhook payload encoding and the byte-budget gate.
//!
//! TRMNL rejects merge-variable payloads above a fixed size, so the report
//! is serialized and measured here before any delivery attempt.

use serde_json::json;

use crate::error::CoreError;
use crate::report::Report;

/// Maximum serialized payload size accepted by the webhook.
pub const PAYLOAD_LIMIT_BYTES: usize = 2048;

/// Serialize the report into the webhook envelope.
pub fn encode(report: &Report) -> Result<Vec<u8>, CoreError> {
    Ok(serde_json::to_vec(&json!({ "merge_variables": report }))?)
}

/// Gate the serialized payload on the byte budget.
///
/// Returns the payload size for logging, or `PayloadTooLarge` carrying the
/// actual size and the limit. Callers must not attempt delivery on error.
pub fn validate(payload: &[u8]) -> Result<usize, CoreError> {
    let size = payload.len();
    if size > PAYLOAD_LIMIT_BYTES {
        return Err(CoreError::PayloadTooLarge {
            size,
            limit: PAYLOAD_LIMIT_BYTES,
        });
    }
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{HabitSummary, Report};

    fn small_report() -> Report {
        Report {
            header: vec!["2024-03-04".parse().unwrap(), "2024-03-05".parse().unwrap()],
            habits: vec![HabitSummary {
                name: "Read".into(),
                is_negative: false,
                streak: 3,
                skipped: 0,
                skipped_percentage: 0.0,
                statuses: Vec::new(),
            }],
        }
    }

    #[test]
    fn encode_wraps_in_merge_variables() {
        let payload = encode(&small_report()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&payload).unwrap();
        assert_eq!(value["merge_variables"]["habits"][0]["name"], "Read");
        assert_eq!(value["merge_variables"]["header"][0], "2024-03-04");
    }

    #[test]
    fn small_payload_passes_and_reports_its_size() {
        let payload = encode(&small_report()).unwrap();
        assert_eq!(validate(&payload).unwrap(), payload.len());
    }

    #[test]
    fn oversized_payload_is_rejected_with_sizes() {
        let payload = vec![b' '; 2100];
        match validate(&payload) {
            Err(CoreError::PayloadTooLarge { size, limit }) => {
                assert_eq!(size, 2100);
                assert_eq!(limit, PAYLOAD_LIMIT_BYTES);
            }
            other => panic!("expected PayloadTooLarge, got {other:?}"),
        }
    }

    #[test]
    fn exact_limit_is_accepted() {
        let payload = vec![b' '; PAYLOAD_LIMIT_BYTES];
        assert_eq!(validate(&payload).unwrap(), PAYLOAD_LIMIT_BYTES);
    }
}
