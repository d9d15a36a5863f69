//! # Shared Types Crate
//!
//! Identifiers and per-request security types used across the Tenant-Gate
//! workspace.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every cross-crate type is defined here.
//! - **Cheap identifiers**: ids are `Arc<str>` newtypes, so cloning one on the
//!   request path never allocates.
//! - **Request confinement**: a [`SecurityContext`] is built per request by the
//!   authentication layer and only ever read by the decision engine.

pub mod entities;
pub mod errors;
pub mod security;

pub use entities::*;
pub use errors::*;
pub use security::*;
