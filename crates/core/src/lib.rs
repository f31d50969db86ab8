//! Domain logic for the organization site backend.
//!
//! Everything in this crate is free of database and HTTP concerns so the
//! listing, toggle, media and authorization rules can be unit tested in
//! isolation and shared by the `db` and `api` crates.

pub mod authz;
pub mod error;
pub mod export;
pub mod filters;
pub mod media;
pub mod pagination;
pub mod roles;
pub mod tags;
pub mod toggles;
pub mod types;
pub mod validation;
