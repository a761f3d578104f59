//! Shared types and models for the Fishing Vessel Settlement Platform
//!
//! This crate contains the domain models, the pure settlement engine,
//! and validation helpers shared between the backend and other components
//! of the system.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::*;
