use std::time::SystemTime;
use std::time::UNIX_EPOCH;

/// return millisecond since epoch
pub(crate) fn get_now_as_u128() -> u128 {
    let now = SystemTime::now();
    let since_epoch = now.duration_since(UNIX_EPOCH).unwrap_or_default();
    since_epoch.as_millis()
}
