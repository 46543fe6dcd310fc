//! Common types and utilities for plan-relay

pub mod config;
pub mod error;
pub mod logging;
pub mod models;

pub use config::{AppCredentialsConfig, Config};
pub use error::{Error, Result};
