use std::collections::{BTreeMap, HashSet};

use crate::{
    definition::ChannelDefinition,
    host::{NotificationHost, SubmissionError},
};

/// In-process notification host.
///
/// Records every submission in order and keeps the registered set keyed by
/// id. A repeated id only refreshes `name` and `description`; everything
/// else keeps the value from the first registration.
#[derive(Debug, Clone)]
pub struct MemoryHost {
    supports_channels: bool,
    fail_ids: HashSet<String>,
    submissions: Vec<ChannelDefinition>,
    channels: BTreeMap<String, ChannelDefinition>,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    /// Host with channel support.
    pub fn new() -> Self {
        Self {
            supports_channels: true,
            fail_ids: HashSet::new(),
            submissions: Vec::new(),
            channels: BTreeMap::new(),
        }
    }

    /// Host without channel support.
    pub fn unsupported() -> Self {
        Self {
            supports_channels: false,
            ..Self::new()
        }
    }

    pub fn with_channel_support(mut self, supported: bool) -> Self {
        self.supports_channels = supported;
        self
    }

    /// Reject every submission of `id`.
    pub fn fail_on(mut self, id: impl Into<String>) -> Self {
        self.fail_ids.insert(id.into());
        self
    }

    /// Every definition passed to `submit`, accepted or not.
    pub fn submissions(&self) -> &[ChannelDefinition] {
        &self.submissions
    }

    pub fn submitted_ids(&self) -> Vec<&str> {
        self.submissions.iter().map(|d| d.id.as_str()).collect()
    }

    pub fn channels(&self) -> &BTreeMap<String, ChannelDefinition> {
        &self.channels
    }

    pub fn get(&self, id: &str) -> Option<&ChannelDefinition> {
        self.channels.get(id)
    }
}

impl NotificationHost for MemoryHost {
    fn supports_channels(&self) -> bool {
        self.supports_channels
    }

    fn submit(&mut self, definition: &ChannelDefinition) -> Result<(), SubmissionError> {
        self.submissions.push(definition.clone());
        if self.fail_ids.contains(&definition.id) {
            return Err(SubmissionError::Rejected {
                reason: "injected failure".into(),
            });
        }
        merge_into(&mut self.channels, definition);
        Ok(())
    }
}

/// First registration wins, except for the user-visible strings.
fn merge_into(
    channels: &mut BTreeMap<String, ChannelDefinition>,
    definition: &ChannelDefinition,
) {
    channels
        .entry(definition.id.clone())
        .and_modify(|existing| {
            existing.name.clone_from(&definition.name);
            existing.description.clone_from(&definition.description);
        })
        .or_insert_with(|| definition.clone());
}
