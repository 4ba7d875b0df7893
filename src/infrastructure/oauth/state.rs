use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;

const STATE_BYTES: usize = 24;

/// Generate a fresh, URL-safe CSRF state for one authorization round trip
pub fn generate_state() -> String {
    let mut bytes = [0u8; STATE_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Compare the state echoed by the provider with the one stored for this session
pub fn state_matches(expected: Option<&str>, received: &str) -> bool {
    matches!(expected, Some(expected) if !expected.is_empty() && expected == received)
}
