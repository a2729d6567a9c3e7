//! API-side authorization gates.
//!
//! Two gates cover the whole surface: admin-only routes (catalog writes,
//! global order listing) and owner-or-admin reads. Domain and infra stay
//! auth-agnostic; the gates run in handlers before any store access.

use axum::http::StatusCode;

use storefront_core::UserId;

use crate::app::errors;
use crate::context::AuthContext;

/// Admin-only gate. Convention: the "admin" role grants catalog writes and
/// the global order listing.
pub fn require_admin(ctx: &AuthContext) -> Result<(), axum::response::Response> {
    if ctx.is_admin() {
        return Ok(());
    }
    Err(errors::json_error(
        StatusCode::FORBIDDEN,
        "forbidden",
        "admin role required",
    ))
}

/// Owner-or-admin gate for per-resource reads.
pub fn require_owner_or_admin(
    ctx: &AuthContext,
    owner: UserId,
) -> Result<(), axum::response::Response> {
    if ctx.user_id() == owner || ctx.is_admin() {
        return Ok(());
    }
    Err(errors::json_error(
        StatusCode::FORBIDDEN,
        "forbidden",
        "not the resource owner",
    ))
}
