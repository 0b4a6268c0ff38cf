//! JWT bearer authentication
//!
//! Every `/api/v1` route sits behind [`require_auth`]. Tokens are HS256-signed
//! and must carry an `exp` claim; issuer and audience are checked when
//! configured.

pub mod jwt;
pub mod middleware;

pub use jwt::{extract_bearer_token, Claims, JwtConfig, JwtError};
pub use middleware::require_auth;
