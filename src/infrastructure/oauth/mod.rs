pub mod state;
pub mod tiktok;

pub use state::{generate_state, state_matches};
pub use tiktok::TikTokOAuthClient;
