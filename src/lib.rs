//! Xyber Account Inspector Library
//!
//! Decodes Xyber bonding-curve program accounts and evaluates the curve.

pub mod chart;
pub mod cli;
pub mod config;
pub mod error;
pub mod report;
pub mod scan;
pub mod xyber;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
