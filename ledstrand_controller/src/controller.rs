//! Channel state, command routing and rendering.
//!
//! The controller owns one [`ChannelState`] per configured strand and borrows
//! the settings for its whole lifetime. Commands arrive as topic/payload pairs;
//! each change starts a fade from the level currently shown to the new
//! target over the configured default transition.
//!
//! Root-topic commands cap every strand at its configured root scaling;
//! commands on a strand's own topic drive it over the full range.

use ledstrand_common::command::{Command, CommandError};
use ledstrand_common::consts::BRIGHTNESS_MAX;
use ledstrand_common::curve::{RampCurve, normalize_brightness, to_duty};
use ledstrand_common::settings::LedSettings;
use ledstrand_common::topic::{Target, TopicMap};
use thiserror::Error;
use tracing::{debug, trace};

use crate::fade::Fade;

/// Message handling error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    /// Topic is not one of the command topics.
    #[error("no channel listens on topic '{0}'")]
    UnknownTopic(String),
    /// Payload not understood.
    #[error(transparent)]
    Command(#[from] CommandError),
}

/// A state message to publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publication {
    pub topic: String,
    pub payload: String,
}

/// Runtime state of one strand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelState {
    on: bool,
    brightness: u8,
    /// Pre-curve factor of the last command's ceiling, 1.0 when uncapped.
    ceiling: f64,
    fade: Fade,
}

impl Default for ChannelState {
    fn default() -> Self {
        Self {
            on: false,
            brightness: BRIGHTNESS_MAX,
            ceiling: 1.0,
            fade: Fade::settled(0.0),
        }
    }
}

impl ChannelState {
    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Last commanded brightness, kept while the strand is off.
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Normalized level the strand is heading to, ceiling included.
    pub fn target_level(&self) -> f64 {
        if self.on {
            normalize_brightness(self.brightness) * self.ceiling
        } else {
            0.0
        }
    }

    /// Normalized (pre-curve) level at `now_ms`.
    pub fn level_at(&self, now_ms: u64) -> f64 {
        self.fade.level_at(now_ms)
    }

    fn apply(&mut self, command: Command, ceiling: f64, now_ms: u64, duration_ms: f64) {
        let current = self.fade.level_at(now_ms);
        self.ceiling = ceiling;
        match command {
            Command::On => {
                self.on = true;
                if self.brightness == 0 {
                    self.brightness = BRIGHTNESS_MAX;
                }
            }
            Command::Off | Command::Brightness(0) => self.on = false,
            Command::Brightness(b) => {
                self.on = true;
                self.brightness = b;
            }
        }
        self.fade = Fade::new(current, self.target_level(), now_ms, duration_ms);
    }
}

/// Per-channel LED controller.
#[derive(Debug)]
pub struct Controller<'a> {
    settings: &'a LedSettings,
    topics: TopicMap,
    curve: RampCurve,
    channels: Vec<ChannelState>,
}

impl<'a> Controller<'a> {
    /// All channels start off with full brightness remembered.
    pub fn new(settings: &'a LedSettings) -> Self {
        Self {
            settings,
            topics: TopicMap::new(settings),
            curve: settings.transition().curve(),
            channels: vec![ChannelState::default(); settings.channels().len()],
        }
    }

    pub fn settings(&self) -> &'a LedSettings {
        self.settings
    }

    pub fn topics(&self) -> &TopicMap {
        &self.topics
    }

    pub fn channel(&self, index: usize) -> Option<&ChannelState> {
        self.channels.get(index)
    }

    /// Interpret a message and apply it.
    ///
    /// Returns the state publications for every affected channel (and the
    /// root state topic for root commands).
    pub fn handle(
        &mut self,
        topic: &str,
        payload: &str,
        now_ms: u64,
    ) -> Result<Vec<Publication>, ControllerError> {
        let target = self
            .topics
            .resolve(topic)
            .ok_or_else(|| ControllerError::UnknownTopic(topic.to_string()))?;
        let command = self.settings.commands().parse(payload)?;
        debug!(topic, ?target, ?command, now_ms, "command received");
        Ok(self.apply(target, command, now_ms))
    }

    /// Apply an already interpreted command.
    pub fn apply(&mut self, target: Target, command: Command, now_ms: u64) -> Vec<Publication> {
        let duration_ms = self.settings.transition().default_transition_ms();
        match target {
            Target::Channel(index) => {
                let Some(state) = self.channels.get_mut(index) else {
                    return Vec::new();
                };
                state.apply(command, 1.0, now_ms, duration_ms);
                self.publication(target).into_iter().collect()
            }
            Target::Root => {
                for (state, config) in self.channels.iter_mut().zip(self.settings.channels()) {
                    let ceiling = self.curve.ceiling_input(config.root_scaling());
                    state.apply(command, ceiling, now_ms, duration_ms);
                }
                let mut publications: Vec<_> = (0..self.channels.len())
                    .filter_map(|i| self.publication(Target::Channel(i)))
                    .collect();
                publications.extend(self.publication(Target::Root));
                publications
            }
        }
    }

    /// Current state of `target` as a publication. The root is "on" while
    /// any channel is on.
    pub fn publication(&self, target: Target) -> Option<Publication> {
        let on = match target {
            Target::Root => self.channels.iter().any(ChannelState::is_on),
            Target::Channel(index) => self.channels.get(index)?.is_on(),
        };
        Some(Publication {
            topic: self.topics.state_topic(target)?.to_string(),
            payload: self.settings.commands().token(on).to_string(),
        })
    }

    /// Full state of every channel followed by the root.
    pub fn state_publications(&self) -> Vec<Publication> {
        (0..self.channels.len())
            .map(Target::Channel)
            .chain(std::iter::once(Target::Root))
            .filter_map(|target| self.publication(target))
            .collect()
    }

    /// Output levels in `[0.0, 1.0]` after the ramp curve.
    pub fn levels(&self, now_ms: u64) -> Vec<f64> {
        self.channels
            .iter()
            .map(|state| self.curve.apply(state.level_at(now_ms)))
            .collect()
    }

    /// PWM duty per channel, in configured pin order.
    pub fn render(&self, now_ms: u64) -> Vec<u16> {
        let duty: Vec<u16> = self.levels(now_ms).into_iter().map(to_duty).collect();
        trace!(now_ms, ?duty, "rendered");
        duty
    }

    /// True while any fade is still running.
    pub fn is_animating(&self, now_ms: u64) -> bool {
        self.channels.iter().any(|state| !state.fade.is_done(now_ms))
    }
}
