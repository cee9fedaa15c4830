//! Client for the external auth/nutrition API.
//!
//! ERROR HANDLING
//! ==============
//! Every failure is one [`api::ApiError`] variant; callers match on it
//! instead of sniffing status codes. A 401 signs the auth store out before
//! the error is returned, so client state follows the server's rejection.

pub mod api;
pub mod types;
pub mod validate;
