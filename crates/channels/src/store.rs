use std::{collections::BTreeMap, path::PathBuf};

use {
    serde::{Deserialize, Serialize},
    tracing::debug,
};

use crate::{
    definition::ChannelDefinition,
    host::{AssetResolver, NotificationHost, SubmissionError},
};

/// A registered channel as persisted by [`JsonChannelStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredChannel {
    #[serde(flatten)]
    pub definition: ChannelDefinition,
    /// Sound URI produced by the store's resolver.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound_uri: Option<String>,
}

/// File-backed notification host at `<data_dir>/channels.json`.
///
/// Keeps registrations across processes so repeated startups can be
/// observed. Sounds are resolved before anything is written; a sound that
/// does not resolve fails that channel only.
pub struct JsonChannelStore<R> {
    path: PathBuf,
    resolver: R,
    supports_channels: bool,
}

impl<R: AssetResolver> JsonChannelStore<R> {
    pub fn new(path: PathBuf, resolver: R) -> Self {
        Self {
            path,
            resolver,
            supports_channels: true,
        }
    }

    pub fn with_channel_support(mut self, supported: bool) -> Self {
        self.supports_channels = supported;
        self
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Read the registered set. A missing file is an empty set.
    pub fn load(&self) -> Result<BTreeMap<String, StoredChannel>, SubmissionError> {
        match std::fs::read_to_string(&self.path) {
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Registered channels in id order.
    pub fn list(&self) -> Result<Vec<StoredChannel>, SubmissionError> {
        Ok(self.load()?.into_values().collect())
    }

    fn save(&self, map: &BTreeMap<String, StoredChannel>) -> Result<(), SubmissionError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(map)?;
        std::fs::write(&self.path, data)?;
        Ok(())
    }
}

impl<R: AssetResolver> NotificationHost for JsonChannelStore<R> {
    fn supports_channels(&self) -> bool {
        self.supports_channels
    }

    fn submit(&mut self, definition: &ChannelDefinition) -> Result<(), SubmissionError> {
        let sound_uri = definition
            .sound
            .as_ref()
            .map(|s| self.resolver.resolve(&s.asset))
            .transpose()?;

        let mut map = self.load()?;
        map.entry(definition.id.clone())
            .and_modify(|existing| {
                existing.definition.name.clone_from(&definition.name);
                existing
                    .definition
                    .description
                    .clone_from(&definition.description);
            })
            .or_insert_with(|| StoredChannel {
                definition: definition.clone(),
                sound_uri,
            });
        self.save(&map)?;
        debug!(channel = %definition.id, path = %self.path.display(), "channel stored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        defaults::{PAGER_CALL_CHANNEL, PAGER_STATUS_CHANNEL, pager_channels},
        host::RawResourceResolver,
        profile::{AudioRole, ChannelProfile},
        registry::{ChannelRegistry, RegisteredCount, RegistrationError},
    };

    fn store(dir: &tempfile::TempDir) -> JsonChannelStore<RawResourceResolver> {
        JsonChannelStore::new(
            dir.path().join("channels.json"),
            RawResourceResolver::new("com.squadqwat.mobile_pager_flutter"),
        )
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store(&dir).list().unwrap().is_empty());
    }

    #[test]
    fn persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let profiles = pager_channels().unwrap();

        let mut registry = ChannelRegistry::new(store(&dir));
        assert_eq!(registry.reconcile(&profiles).unwrap(), RegisteredCount(2));
        let first = std::fs::read_to_string(dir.path().join("channels.json")).unwrap();

        // a fresh process sees the same end state after another pass
        let mut registry = ChannelRegistry::new(store(&dir));
        assert_eq!(registry.reconcile(&profiles).unwrap(), RegisteredCount(2));
        let second = std::fs::read_to_string(dir.path().join("channels.json")).unwrap();
        assert_eq!(first, second);

        let stored = registry.host().load().unwrap();
        assert_eq!(
            stored[PAGER_CALL_CHANNEL].sound_uri.as_deref(),
            Some("android.resource://com.squadqwat.mobile_pager_flutter/raw/pager_ringing")
        );
        assert!(stored[PAGER_STATUS_CHANNEL].sound_uri.is_none());
    }

    #[test]
    fn unresolved_sound_fails_only_that_channel() {
        let dir = tempfile::tempdir().unwrap();
        let host = JsonChannelStore::new(
            dir.path().join("channels.json"),
            RawResourceResolver::new("com.example").with_known_assets(["chime"]),
        );
        let profiles = vec![
            ChannelProfile::builder("loud", "Loud")
                .sound("siren", AudioRole::Ringtone)
                .build()
                .unwrap(),
            ChannelProfile::builder("soft", "Soft")
                .sound("chime", AudioRole::Notification)
                .build()
                .unwrap(),
        ];

        let mut registry = ChannelRegistry::new(host);
        let err = registry.reconcile(&profiles).unwrap_err();
        assert!(matches!(err, RegistrationError::Partial { .. }));
        assert_eq!(err.failed_ids(), vec!["loud"]);
        assert!(matches!(
            err.failures()[0].error,
            SubmissionError::UnresolvedSound { .. }
        ));

        let ids: Vec<_> = registry
            .host()
            .list()
            .unwrap()
            .into_iter()
            .map(|c| c.definition.id)
            .collect();
        assert_eq!(ids, vec!["soft"]);
    }

    #[test]
    fn unsupported_store_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = ChannelRegistry::new(store(&dir).with_channel_support(false));
        assert_eq!(
            registry.reconcile(&pager_channels().unwrap()).unwrap(),
            RegisteredCount(0)
        );
        assert!(!registry.host().path().exists());
    }

    #[test]
    fn corrupt_file_fails_submission() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("channels.json"), "not json").unwrap();
        let mut registry = ChannelRegistry::new(store(&dir));
        let err = registry.reconcile(&pager_channels().unwrap()).unwrap_err();
        assert!(matches!(err, RegistrationError::Total { .. }));
        assert!(matches!(
            err.failures()[0].error,
            SubmissionError::Serialize(_)
        ));
    }
}
