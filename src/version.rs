//! Version information, taken from Cargo metadata at build time.

/// The crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of the application
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// Get the full version string
pub fn full_version() -> String {
    format!("{} v{}", APP_NAME, VERSION)
}

/// Get a formatted version string for display
pub fn display_version() -> String {
    format!("v{}", VERSION)
}
