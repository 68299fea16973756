//! The event-to-case mapping heuristic.
//!
//! Deliberately contract-generic: defaults come from the log itself and are
//! overridden only by conventionally named arguments (`user`, `step`,
//! `timestamp`). Every log yields exactly one record; an undecodable log
//! degrades to a raw-topic record instead of being dropped.

use alloy_primitives::Address;
use chrono::{DateTime, Utc};

use crate::models::logs::{DecodedEvent, DecodedValue, RawLogEntry};
use crate::models::records::CaseRecord;

/// Activity label for a log with no topics at all.
pub const UNKNOWN_ACTIVITY: &str = "unknown";

pub fn map_log(
    log: &RawLogEntry,
    decoded: Option<&DecodedEvent>,
    contract_address: Address,
    block_time: DateTime<Utc>,
) -> CaseRecord {
    let Some(decoded) = decoded else {
        // No matching definition: identify the case by the emitting address
        // and the activity by the raw signature topic.
        let activity = log
            .topics
            .first()
            .map(|topic| topic.to_string())
            .unwrap_or_else(|| UNKNOWN_ACTIVITY.to_string());
        return CaseRecord {
            case_id: log.address.to_string(),
            activity,
            timestamp: block_time,
        };
    };

    let mut case_id = contract_address.to_string();
    let mut activity = decoded.event_name.clone();
    let mut timestamp = block_time;

    if let Some(user) = decoded.arg_by_name("user") {
        case_id = user.to_string();
    }
    if let Some(step) = decoded.arg_by_name("step") {
        activity = step.to_string();
    }
    if let Some(value) = decoded.arg_by_name("timestamp") {
        // Only an integer argument overrides the block timestamp, and only
        // when it fits epoch seconds; anything else keeps the block time.
        if let DecodedValue::Uint(seconds) = value {
            if let Some(parsed) = i64::try_from(*seconds)
                .ok()
                .and_then(|seconds| DateTime::from_timestamp(seconds, 0))
            {
                timestamp = parsed;
            }
        }
    }

    CaseRecord {
        case_id,
        activity,
        timestamp,
    }
}
