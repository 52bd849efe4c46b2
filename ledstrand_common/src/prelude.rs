//! Prelude module for common re-exports.
//!
//! ```rust
//! use ledstrand_common::prelude::*;
//! ```

// ─── Logging ────────────────────────────────────────────────────────
pub use crate::config::LogLevel;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, SharedConfig};
pub use crate::settings::{
    BrokerConnection, ChannelConfig, LedSettings, NetworkCredentials, SettingsFile,
    TransitionParameters, load_settings, load_settings_from_str,
};

// ─── Message bus ────────────────────────────────────────────────────
pub use crate::command::{Command, CommandError, CommandVocabulary};
pub use crate::topic::{Target, TopicEntry, TopicMap};

// ─── Output ─────────────────────────────────────────────────────────
pub use crate::consts::{MAX_CHANNELS, PWM_RANGE};
pub use crate::curve::{RampCurve, normalize_brightness, to_duty};
