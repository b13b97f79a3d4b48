//! Shared types and models for the Gestionale platform
//!
//! This crate contains the domain types and pure business rules shared
//! between the backend services and any other component of the system.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
