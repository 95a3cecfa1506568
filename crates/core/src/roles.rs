//! Well-known role name constants.
//!
//! These must match the `users.role` values the migrations default to.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MEMBER: &str = "member";
