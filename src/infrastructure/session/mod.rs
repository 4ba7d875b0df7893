pub mod middleware;
pub mod store;

pub use middleware::{session_middleware, SessionLayer, SESSION_COOKIE};
pub use store::{Session, SessionData, SessionStore};
