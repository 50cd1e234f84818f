//! Role names carried in access-token claims.

/// The school administrator. The only role that can manage records.
pub const ROLE_ADMIN: &str = "admin";
