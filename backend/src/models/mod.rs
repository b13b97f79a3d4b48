//! Database models for the Gestionale platform
//!
//! Re-exports models from the shared crate

pub use shared::models::*;
