// Serde things.
pub use serde::Deserialize;

// Aliases.

/// The standard result for this application.
pub type AppResult<T = ()> = miette::Result<T>;
