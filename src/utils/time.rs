use chrono::Utc;
use std::time::{SystemTime, UNIX_EPOCH};

pub fn current_timestamp_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}

/// Today's date as YYYY-MM-DD (UTC)
pub fn today() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Time-derived id, strictly greater than `last`
///
/// `None` once `last` is `i64::MAX`.
pub fn next_id(last: i64, now_millis: i64) -> Option<i64> {
    last.checked_add(1).map(|floor| now_millis.max(floor))
}
