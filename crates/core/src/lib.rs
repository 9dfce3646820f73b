//! Pure domain logic for the portfolio backend.
//!
//! This crate has zero internal dependencies so it can be used by the
//! repository layer, the API layer, and any future CLI tooling. All
//! functions here are deterministic over explicit inputs; no state
//! survives between calls.

pub mod asset_policy;
pub mod error;
pub mod ordering;
pub mod slug;
pub mod types;
pub mod validation;
