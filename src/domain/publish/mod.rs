pub mod model;
pub mod service;

pub use model::{
    build_title, CreatorInfo, PostInfo, PublishRequest, PublishResult, SourceInfo,
    DEFAULT_PRIVACY_LEVEL, DEFAULT_TITLE, MAX_TITLE_CHARS,
};
pub use service::PublishService;
