use serde::{Deserialize, Serialize};

/// JWT payload carried by every authenticated request.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User ID.
    pub sub: i64,
    /// Expiry as a unix timestamp.
    pub exp: usize,
    /// Platform administrators bypass per-course role checks.
    pub admin: bool,
}

#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);
