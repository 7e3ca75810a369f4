use std::time::{SystemTime, UNIX_EPOCH};

use time::{OffsetDateTime, macros::format_description};
use uuid::Uuid;

use crate::DomainResult;
use crate::error::DomainError;

pub const ID_LENGTH: usize = 32;
pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;

pub fn uuid_v7_without_dashes() -> String {
    Uuid::now_v7().simple().to_string()
}

pub fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

/// Trims and checks a caller-supplied identifier. Identifiers are compared as opaque strings
/// everywhere else, so this is the only place their shape matters.
pub fn parse_id(field: &str, raw: &str) -> DomainResult<String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(DomainError::InvalidArgument(format!("{field} is required")));
    }
    let well_formed = value.len() == ID_LENGTH
        && value
            .chars()
            .all(|ch| ch.is_ascii_digit() || ('a'..='f').contains(&ch));
    if !well_formed {
        return Err(DomainError::InvalidArgument(format!(
            "invalid {field} format"
        )));
    }
    Ok(value.to_string())
}

/// Calendar day (UTC) of an epoch-ms timestamp, as `YYYY-MM-DD`.
pub fn format_ms_day(epoch_ms: i64) -> String {
    let value = OffsetDateTime::from_unix_timestamp_nanos(epoch_ms as i128 * 1_000_000)
        .unwrap_or(OffsetDateTime::UNIX_EPOCH);
    value
        .date()
        .format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| "1970-01-01".to_string())
}
