//! Distribution Service
//!
//! Compiles an ordered hierarchy of membership tiers into a CDN
//! distribution plan: per-tier trusted-signer sets derived from the
//! cumulative-access rule, path routes binding each tier's content to its
//! origin, and position-addressed origin bindings carrying access-control
//! overrides. The assembled plan is immutable and is handed to the external
//! delivery-network configuration layer for materialization.

pub mod config;
pub mod error;
pub mod models;
pub mod services;

// Public re-exports
pub use config::Config;
pub use error::{AppError, Result};
