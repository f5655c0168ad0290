//! Environment naming and log banners.

use rand::distributions::Alphanumeric;
use rand::Rng;

/// Length of the random token in environment names.
pub const UNIQUE_ID_LEN: usize = 6;

/// A short random alphanumeric token (62^6 possibilities).
pub fn unique_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(UNIQUE_ID_LEN)
        .map(char::from)
        .collect()
}

/// `prefix` followed by a lowercased random token, e.g. `e2etest-k3x9ab`.
pub fn environment_name(prefix: &str) -> String {
    format!("{}{}", prefix, unique_id().to_lowercase())
}

/// Banner separating phases of an e2e run in the logs.
pub fn test_banner(first: &str, second: &str) -> String {
    format!("################## {} {} ##################", first, second)
}
