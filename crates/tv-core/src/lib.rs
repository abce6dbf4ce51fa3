//! twinview/crates/tv-core/src/lib.rs
//!
//! The central domain types and interface definitions for TwinView.

pub mod models;
pub mod traits;
pub mod error;

// Re-exporting for easier access in other crates
pub use models::*;
pub use traits::*;
pub use error::*;
