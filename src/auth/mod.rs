//! Session authentication: token codec, token sources, cookie shape, and the
//! server-side resolver used by rendered pages.

pub mod cookie;
pub mod headers;
pub mod resolver;
pub mod token;

pub use resolver::{AuthError, AuthenticatedUser, ServerAuth};
pub use token::{InvalidToken, SessionClaims, TokenCodec};

/// Login page path; guarded pages send unauthenticated visitors here.
pub const LOGIN_PATH: &str = "/login";
/// Landing path for authenticated users bounced off auth-only pages.
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Build `/login?callbackUrl=<path>` preserving the requested path.
#[must_use]
pub fn login_redirect(callback: &str) -> String {
    format!("{LOGIN_PATH}?callbackUrl={}", urlencoding::encode(callback))
}
