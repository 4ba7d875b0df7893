pub mod config;
pub mod http;
pub mod oauth;
pub mod publish;
pub mod session;
