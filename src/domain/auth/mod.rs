pub mod service;
pub mod token;

pub use service::{TokenRefresher, TokenService, DEFAULT_REFRESH_SKEW_SECS};
pub use token::{Token, TokenResponse};
