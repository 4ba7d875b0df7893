pub mod tiktok;

pub use tiktok::{check_publish_response, TikTokPublishClient};
