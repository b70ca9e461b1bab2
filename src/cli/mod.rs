//! CLI module

pub mod commands;

/// Log filter used when `RUST_LOG` is unset
///
/// The binary is named `xyber`, so its own events need a directive of their
/// own next to the library's.
pub const DEFAULT_LOG_FILTER: &str = "xyber_inspect=info,xyber=info";
