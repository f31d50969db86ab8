//! Authentication extractors.
//!
//! - [`auth::AuthUser`] -- Requires a valid JWT Bearer token.
//! - [`auth::Caller`] -- Optional token; yields an anonymous or authenticated
//!   [`nps_core::authz::CallerContext`] for the policy check.

pub mod auth;
