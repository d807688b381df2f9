mod auth;

pub use auth::{LOGIN_PATH, auth};
