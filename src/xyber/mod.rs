//! Xyber bonding-curve program module
//!
//! # WARNING: Protocol Instability
//! Account layouts are identified by their length only. A program upgrade
//! that adds or resizes accounts can break decoding silently.

pub mod accounts;
pub mod address;
pub mod curve;
pub mod program;

// Re-export commonly used types
pub use accounts::{decode, CurveConfigRecord, PoolStateRecord, XyberAccount};
pub use address::{decode_pubkey, encode_pubkey};
pub use curve::{
    cumulative_minted, marginal_price, sample_curve, sweep, CurveParams, CurveSample, PriceRatio,
    Quote, SmoothBondingCurve,
};
pub use program::{is_native_placeholder, NATIVE_PLACEHOLDER_MINT, XYBER_PROGRAM_ID};
