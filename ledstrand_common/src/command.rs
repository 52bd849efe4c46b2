//! On/off command vocabulary and payload parsing.
//!
//! Command topics accept the literal on/off tokens from the configuration,
//! or a numeric brightness on the 0–255 scale.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ConfigError;

/// A command payload after interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Turn on at the last commanded brightness.
    On,
    /// Turn off, remembering the brightness.
    Off,
    /// Set brightness (0 turns the channel off).
    Brightness(u8),
}

/// Payload that matched neither token nor brightness.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unrecognized command payload '{0}'")]
    Unrecognized(String),
}

fn default_on() -> String {
    "ON".to_string()
}

fn default_off() -> String {
    "OFF".to_string()
}

/// The literal tokens recognized as "on" and "off" over the message bus.
///
/// # TOML Example
///
/// ```toml
/// [commands]
/// on = "AN"
/// off = "AUS"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandVocabulary {
    #[serde(default = "default_on")]
    pub on: String,
    #[serde(default = "default_off")]
    pub off: String,
}

impl Default for CommandVocabulary {
    fn default() -> Self {
        Self {
            on: default_on(),
            off: default_off(),
        }
    }
}

impl CommandVocabulary {
    /// Tokens must be non-empty, trimmed and distinct.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, token) in [("commands.on", &self.on), ("commands.off", &self.off)] {
            if token.is_empty() {
                return Err(ConfigError::invalid(format!("{field} cannot be empty")));
            }
            if token.trim() != token {
                return Err(ConfigError::invalid(format!(
                    "{field} '{token}' has surrounding whitespace"
                )));
            }
        }
        if self.on == self.off {
            return Err(ConfigError::invalid(format!(
                "commands.on and commands.off are both '{}'",
                self.on
            )));
        }
        Ok(())
    }

    /// Interpret a command payload.
    ///
    /// Token matching is exact (case-sensitive) after trimming whitespace.
    pub fn parse(&self, payload: &str) -> Result<Command, CommandError> {
        let payload = payload.trim();
        if payload == self.on {
            return Ok(Command::On);
        }
        if payload == self.off {
            return Ok(Command::Off);
        }
        match payload.parse::<u8>() {
            Ok(value) => Ok(Command::Brightness(value)),
            Err(_) => Err(CommandError::Unrecognized(payload.to_string())),
        }
    }

    /// Payload published on a state topic.
    pub fn token(&self, on: bool) -> &str {
        if on { &self.on } else { &self.off }
    }
}
