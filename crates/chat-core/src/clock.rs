//! Wall clock helpers

use chrono::Utc;

/// Current time as milliseconds since the Unix epoch
#[inline]
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
