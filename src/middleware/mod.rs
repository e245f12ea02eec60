pub mod auth;

pub use auth::{AuthClient, require_bearer};
