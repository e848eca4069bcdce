//! Configuration module
//!
//! `constants` holds the fixed vocabulary of the filter grammar and hard limits;
//! `runtime` holds user preferences read from the environment.

pub mod constants;
pub mod runtime;

pub use runtime::{LoggingPreferences, RuntimeConfig};
