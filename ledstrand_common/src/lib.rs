//! ledstrand Common Library
//!
//! This crate provides the configuration record of the ledstrand MQTT LED
//! controller together with the pure definitions derived from it.
//!
//! # Module Structure
//!
//! - [`config`] - Configuration loading traits and error types
//! - [`settings`] - The validated configuration record (`LedSettings`)
//! - [`topic`] - State/command topic derivation and routing
//! - [`command`] - On/off command vocabulary and payload parsing
//! - [`curve`] - Ramp curve, channel scaling and PWM duty conversion
//! - [`consts`] - Board limits and defaults
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust,no_run
//! use ledstrand_common::prelude::*;
//! use std::path::Path;
//!
//! fn main() -> Result<(), ConfigError> {
//!     let settings = load_settings(Path::new("config/ledstrand.toml"))?;
//!     for channel in settings.channels() {
//!         println!("{} -> {}", channel.pin(), channel.command_topic());
//!     }
//!     Ok(())
//! }
//! ```

pub mod command;
pub mod config;
pub mod consts;
pub mod curve;
pub mod prelude;
pub mod settings;
pub mod topic;
