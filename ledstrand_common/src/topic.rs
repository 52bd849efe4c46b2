//! State/command topic derivation and routing.
//!
//! For `N` channels under `topic_base` the controller subscribes to
//! `N + 1` command topics: the root `<base>/set`, addressing every strand,
//! and `<base><i>/set` for each strand `i`. State is published on the same
//! topics without the suffix.

use std::collections::HashMap;

use serde::Serialize;

use crate::consts::COMMAND_SUFFIX;
use crate::settings::LedSettings;

/// Routing result for an incoming command topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// Every channel at once.
    Root,
    /// A single channel by index.
    Channel(usize),
}

/// One row of the topic map, as printed by `ledstrand --check`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicEntry {
    /// `None` for the root entry.
    pub channel: Option<usize>,
    /// `None` for the root entry.
    pub pin: Option<u8>,
    pub state: String,
    pub command: String,
}

/// Immutable lookup table from command topics to targets.
#[derive(Debug, Clone)]
pub struct TopicMap {
    root_state: String,
    root_command: String,
    channel_state: Vec<String>,
    commands: HashMap<String, Target>,
}

impl TopicMap {
    /// Derive every topic from the validated settings.
    pub fn new(settings: &LedSettings) -> Self {
        let root_state = settings.topic_base().to_string();
        let root_command = format!("{root_state}{COMMAND_SUFFIX}");

        let mut commands = HashMap::with_capacity(settings.channels().len() + 1);
        commands.insert(root_command.clone(), Target::Root);

        let mut channel_state = Vec::with_capacity(settings.channels().len());
        for channel in settings.channels() {
            commands.insert(channel.command_topic(), Target::Channel(channel.index()));
            channel_state.push(channel.state_topic());
        }

        Self {
            root_state,
            root_command,
            channel_state,
            commands,
        }
    }

    /// Resolve an incoming topic. State topics and foreign topics yield `None`.
    pub fn resolve(&self, topic: &str) -> Option<Target> {
        self.commands.get(topic).copied()
    }

    /// Topic on which the state of `target` is published.
    pub fn state_topic(&self, target: Target) -> Option<&str> {
        match target {
            Target::Root => Some(self.root_state.as_str()),
            Target::Channel(i) => self.channel_state.get(i).map(String::as_str),
        }
    }

    /// Command topics to subscribe to, root first, then channels in order.
    pub fn subscriptions(&self) -> Vec<String> {
        let mut topics = Vec::with_capacity(self.channel_state.len() + 1);
        topics.push(self.root_command.clone());
        topics.extend(
            self.channel_state
                .iter()
                .map(|state| format!("{state}{COMMAND_SUFFIX}")),
        );
        topics
    }

    /// Full map, root first.
    pub fn entries(&self, settings: &LedSettings) -> Vec<TopicEntry> {
        let mut entries = vec![TopicEntry {
            channel: None,
            pin: None,
            state: self.root_state.clone(),
            command: self.root_command.clone(),
        }];
        entries.extend(settings.channels().iter().map(|c| TopicEntry {
            channel: Some(c.index()),
            pin: Some(c.pin()),
            state: c.state_topic(),
            command: c.command_topic(),
        }));
        entries
    }

    pub fn channel_count(&self) -> usize {
        self.channel_state.len()
    }
}
