//! The ledstrand configuration record.
//!
//! [`SettingsFile`] is the raw form deserialized from `ledstrand.toml`: it
//! keeps the parallel `pins` / `root_scaling` lists and the untyped port
//! number exactly as written. [`SettingsFile::validate`] checks every rule at
//! once and produces [`LedSettings`], the immutable record handed by
//! reference to the rest of the system.
//!
//! Every table is optional; omitted tables and fields take the values of
//! the sample settings (two strands on GPIO12/GPIO14 under
//! `home/topic_name`).

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::command::CommandVocabulary;
use crate::config::{ConfigError, ConfigLoader, SharedConfig};
use crate::consts::{
    COMMAND_SUFFIX, DEFAULT_BROKER_PORT, MAX_CHANNELS, MAX_PIN, is_flash_pin,
};
use crate::curve::RampCurve;

// ─── Raw file form ──────────────────────────────────────────────────

/// WiFi association credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkCredentials {
    pub ssid: String,
    pub password: String,
}

impl Default for NetworkCredentials {
    fn default() -> Self {
        Self {
            ssid: "my_ssid".to_string(),
            password: "p@ssw0rd".to_string(),
        }
    }
}

/// `[mqtt]` table as written in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MqttSection {
    pub host: String,
    /// Kept wide so out-of-range values reach validation.
    pub port: i64,
    pub username: String,
    pub password: String,
}

impl Default for MqttSection {
    fn default() -> Self {
        Self {
            host: "192.168.1.10".to_string(),
            port: i64::from(DEFAULT_BROKER_PORT),
            username: "homeassistant".to_string(),
            password: "api-password".to_string(),
        }
    }
}

/// `[led]` table as written in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LedSection {
    /// GPIO numbers, one per strand.
    pub pins: Vec<i64>,
    /// Brightness ceiling per strand, positionally matched with `pins`.
    pub root_scaling: Vec<f64>,
    /// Topic prefix; strand `i` uses `<topic_base><i>` and `<topic_base><i>/set`.
    pub topic_base: String,
    /// Default fade duration in milliseconds.
    pub default_transition_ms: f64,
    /// Ramp exponent: 2.0 quadratic, 0.5 square root, 1.0 linear.
    pub ramp_coefficient: f64,
}

impl Default for LedSection {
    fn default() -> Self {
        Self {
            pins: vec![12, 14],
            root_scaling: vec![1.0, 0.5],
            topic_base: "home/topic_name".to_string(),
            default_transition_ms: 3000.0,
            ramp_coefficient: 2.0,
        }
    }
}

/// Raw configuration file.
///
/// # TOML Example
///
/// ```toml
/// [wifi]
/// ssid = "my_ssid"
/// password = "p@ssw0rd"
///
/// [mqtt]
/// host = "192.168.1.10"
/// port = 1883
/// username = "homeassistant"
/// password = "api-password"
///
/// [led]
/// pins = [12, 14]
/// root_scaling = [1, 0.5]
/// topic_base = "home/topic_name"
/// default_transition_ms = 3000.0
/// ramp_coefficient = 2.0
///
/// [commands]
/// on = "ON"
/// off = "OFF"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
    pub shared: SharedConfig,
    pub wifi: NetworkCredentials,
    pub mqtt: MqttSection,
    pub led: LedSection,
    pub commands: CommandVocabulary,
}

// ─── Validated record ───────────────────────────────────────────────

/// Message-bus broker connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerConnection {
    host: String,
    port: u16,
    username: String,
    password: String,
}

impl BrokerConnection {
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// True when the broker is accessed without credentials.
    pub fn is_anonymous(&self) -> bool {
        self.username.is_empty()
    }

    /// `host:port` form for socket addressing.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// One physical LED output strand.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelConfig {
    index: usize,
    pin: u8,
    root_scaling: f64,
    topic_base: String,
}

impl ChannelConfig {
    /// Position in the configured pin list.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn pin(&self) -> u8 {
        self.pin
    }

    /// Brightness ceiling in `[0.0, 1.0]` applied to root-topic commands.
    pub fn root_scaling(&self) -> f64 {
        self.root_scaling
    }

    pub fn topic_base(&self) -> &str {
        &self.topic_base
    }

    /// `<base><index>`
    pub fn state_topic(&self) -> String {
        format!("{}{}", self.topic_base, self.index)
    }

    /// `<base><index>/set`
    pub fn command_topic(&self) -> String {
        format!("{}{}", self.state_topic(), COMMAND_SUFFIX)
    }
}

/// Fade and curve tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionParameters {
    default_transition_ms: f64,
    ramp_coefficient: f64,
}

impl TransitionParameters {
    pub fn default_transition_ms(&self) -> f64 {
        self.default_transition_ms
    }

    pub fn ramp_coefficient(&self) -> f64 {
        self.ramp_coefficient
    }

    pub fn curve(&self) -> RampCurve {
        RampCurve::new(self.ramp_coefficient)
    }
}

/// Validated, immutable configuration record.
///
/// Only obtainable through [`SettingsFile::validate`] (or the loaders built
/// on it), so every instance satisfies all configuration rules.
#[derive(Debug, Clone, PartialEq)]
pub struct LedSettings {
    shared: SharedConfig,
    wifi: NetworkCredentials,
    broker: BrokerConnection,
    topic_base: String,
    channels: Vec<ChannelConfig>,
    transition: TransitionParameters,
    commands: CommandVocabulary,
}

impl LedSettings {
    pub fn shared(&self) -> &SharedConfig {
        &self.shared
    }

    pub fn wifi(&self) -> &NetworkCredentials {
        &self.wifi
    }

    pub fn broker(&self) -> &BrokerConnection {
        &self.broker
    }

    /// Topic prefix shared by every channel; also the root state topic.
    pub fn topic_base(&self) -> &str {
        &self.topic_base
    }

    pub fn channels(&self) -> &[ChannelConfig] {
        &self.channels
    }

    pub fn channel(&self, index: usize) -> Option<&ChannelConfig> {
        self.channels.get(index)
    }

    pub fn transition(&self) -> &TransitionParameters {
        &self.transition
    }

    pub fn commands(&self) -> &CommandVocabulary {
        &self.commands
    }
}

impl TryFrom<SettingsFile> for LedSettings {
    type Error = ConfigError;

    fn try_from(file: SettingsFile) -> Result<Self, Self::Error> {
        file.validate()
    }
}

// ─── Validation ─────────────────────────────────────────────────────

impl SettingsFile {
    /// Check every configuration rule and build the immutable record.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` for the first rule violated,
    /// naming the offending field.
    pub fn validate(self) -> Result<LedSettings, ConfigError> {
        self.shared.validate()?;
        validate_wifi(&self.wifi)?;
        let broker = validate_mqtt(self.mqtt)?;
        validate_topic_base(&self.led.topic_base)?;
        let channels = validate_channels(&self.led)?;
        let transition = validate_transition(&self.led)?;
        self.commands.validate()?;

        debug!(
            channels = channels.len(),
            broker = %broker.address(),
            "configuration validated"
        );

        Ok(LedSettings {
            shared: self.shared,
            wifi: self.wifi,
            broker,
            topic_base: self.led.topic_base,
            channels,
            transition,
            commands: self.commands,
        })
    }
}

fn validate_wifi(wifi: &NetworkCredentials) -> Result<(), ConfigError> {
    if wifi.ssid.is_empty() {
        return Err(ConfigError::invalid("wifi.ssid cannot be empty"));
    }
    if wifi.password.is_empty() {
        return Err(ConfigError::invalid("wifi.password cannot be empty"));
    }
    Ok(())
}

fn validate_mqtt(mqtt: MqttSection) -> Result<BrokerConnection, ConfigError> {
    if mqtt.host.trim().is_empty() {
        return Err(ConfigError::invalid("mqtt.host cannot be empty"));
    }
    let port = u16::try_from(mqtt.port)
        .ok()
        .filter(|port| *port != 0)
        .ok_or_else(|| {
            ConfigError::invalid(format!(
                "mqtt.port {} out of range [1, 65535]",
                mqtt.port
            ))
        })?;
    if mqtt.username.is_empty() && !mqtt.password.is_empty() {
        return Err(ConfigError::invalid(
            "mqtt.password is set but mqtt.username is empty",
        ));
    }
    Ok(BrokerConnection {
        host: mqtt.host,
        port,
        username: mqtt.username,
        password: mqtt.password,
    })
}

fn validate_topic_base(base: &str) -> Result<(), ConfigError> {
    if base.is_empty() {
        return Err(ConfigError::invalid("led.topic_base cannot be empty"));
    }
    if base.contains(['+', '#', '\0']) {
        return Err(ConfigError::invalid(format!(
            "led.topic_base '{base}' contains a wildcard or NUL character"
        )));
    }
    Ok(())
}

fn validate_channels(led: &LedSection) -> Result<Vec<ChannelConfig>, ConfigError> {
    if led.pins.len() != led.root_scaling.len() {
        return Err(ConfigError::invalid(format!(
            "led.pins has {} entries but led.root_scaling has {}",
            led.pins.len(),
            led.root_scaling.len()
        )));
    }
    if led.pins.is_empty() {
        return Err(ConfigError::invalid("led.pins cannot be empty"));
    }
    if led.pins.len() > MAX_CHANNELS {
        return Err(ConfigError::invalid(format!(
            "led.pins has {} entries, at most {MAX_CHANNELS} supported",
            led.pins.len()
        )));
    }

    let mut seen = HashSet::with_capacity(led.pins.len());
    let mut channels = Vec::with_capacity(led.pins.len());
    for (index, (&raw_pin, &root_scaling)) in led.pins.iter().zip(&led.root_scaling).enumerate() {
        let pin = u8::try_from(raw_pin)
            .ok()
            .filter(|pin| *pin <= MAX_PIN)
            .ok_or_else(|| {
                ConfigError::invalid(format!(
                    "led.pins[{index}] = {raw_pin} out of range [0, {MAX_PIN}]"
                ))
            })?;
        if is_flash_pin(pin) {
            return Err(ConfigError::invalid(format!(
                "led.pins[{index}] = {pin} is reserved for the flash bus"
            )));
        }
        if !seen.insert(pin) {
            return Err(ConfigError::invalid(format!(
                "led.pins[{index}] = {pin} is used by more than one channel"
            )));
        }
        if !root_scaling.is_finite() || !(0.0..=1.0).contains(&root_scaling) {
            return Err(ConfigError::invalid(format!(
                "led.root_scaling[{index}] = {root_scaling} out of range [0, 1]"
            )));
        }
        channels.push(ChannelConfig {
            index,
            pin,
            root_scaling,
            topic_base: led.topic_base.clone(),
        });
    }
    Ok(channels)
}

fn validate_transition(led: &LedSection) -> Result<TransitionParameters, ConfigError> {
    if !led.default_transition_ms.is_finite() || led.default_transition_ms < 0.0 {
        return Err(ConfigError::invalid(format!(
            "led.default_transition_ms = {} must be a non-negative number",
            led.default_transition_ms
        )));
    }
    if !led.ramp_coefficient.is_finite() || led.ramp_coefficient <= 0.0 {
        return Err(ConfigError::invalid(format!(
            "led.ramp_coefficient = {} must be strictly positive",
            led.ramp_coefficient
        )));
    }
    Ok(TransitionParameters {
        default_transition_ms: led.default_transition_ms,
        ramp_coefficient: led.ramp_coefficient,
    })
}

// ─── Loading Functions ──────────────────────────────────────────────

/// Load and validate settings from a TOML file.
pub fn load_settings(path: &Path) -> Result<LedSettings, ConfigError> {
    SettingsFile::load(path)?.validate()
}

/// Load and validate settings from a TOML string.
pub fn load_settings_from_str(content: &str) -> Result<LedSettings, ConfigError> {
    SettingsFile::from_toml(content)?.validate()
}
