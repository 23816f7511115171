// Identity strings baked in at compile time

/// Crate version as reported by /version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Service name as reported by /version.
pub const NAME: &str = env!("CARGO_PKG_NAME");
