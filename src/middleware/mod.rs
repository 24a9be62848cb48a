pub mod auth;

pub use auth::{require_faculty, require_user, CurrentUser};
