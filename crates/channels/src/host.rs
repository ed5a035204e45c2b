use std::collections::HashSet;

use crate::definition::ChannelDefinition;

/// Why the host refused a single channel definition.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("sound asset '{asset}' could not be resolved")]
    UnresolvedSound { asset: String },

    #[error("host rejected channel: {reason}")]
    Rejected { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}

/// Port into the host notification subsystem.
///
/// Implementations decide what re-submitting a known id does; callers must
/// not assume an existing channel is overwritten.
pub trait NotificationHost {
    /// Whether the host supports per-channel configuration. Must be free of
    /// side effects.
    fn supports_channels(&self) -> bool;

    /// Declare one channel under `definition.id`.
    fn submit(&mut self, definition: &ChannelDefinition) -> Result<(), SubmissionError>;
}

impl<H: NotificationHost + ?Sized> NotificationHost for &mut H {
    fn supports_channels(&self) -> bool {
        (**self).supports_channels()
    }

    fn submit(&mut self, definition: &ChannelDefinition) -> Result<(), SubmissionError> {
        (**self).submit(definition)
    }
}

/// Turns a logical sound name into a URI the host can play.
pub trait AssetResolver {
    fn resolve(&self, asset: &str) -> Result<String, SubmissionError>;
}

/// Resolves sounds bundled as raw package resources:
/// `android.resource://<package>/raw/<name>`.
#[derive(Debug, Clone)]
pub struct RawResourceResolver {
    package: String,
    known: Option<HashSet<String>>,
}

impl RawResourceResolver {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            known: None,
        }
    }

    /// Only resolve names in `assets`.
    pub fn with_known_assets<I, S>(mut self, assets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known = Some(assets.into_iter().map(Into::into).collect());
        self
    }
}

impl AssetResolver for RawResourceResolver {
    fn resolve(&self, asset: &str) -> Result<String, SubmissionError> {
        let unresolved = || SubmissionError::UnresolvedSound {
            asset: asset.to_string(),
        };
        // Resource names are flat identifiers.
        let well_formed = !asset.is_empty()
            && asset
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
        if !well_formed {
            return Err(unresolved());
        }
        if let Some(known) = &self.known
            && !known.contains(asset)
        {
            return Err(unresolved());
        }
        Ok(format!("android.resource://{}/raw/{asset}", self.package))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_raw_resource_uri() {
        let r = RawResourceResolver::new("com.squadqwat.mobile_pager_flutter");
        assert_eq!(
            r.resolve("pager_ringing").unwrap(),
            "android.resource://com.squadqwat.mobile_pager_flutter/raw/pager_ringing"
        );
    }

    #[test]
    fn rejects_paths_and_bad_names() {
        let r = RawResourceResolver::new("com.example");
        for bad in ["", "raw/pager", "Pager", "pager.mp3", "../x"] {
            assert!(
                matches!(r.resolve(bad), Err(SubmissionError::UnresolvedSound { .. })),
                "{bad} should not resolve"
            );
        }
    }

    #[test]
    fn known_assets_restrict_resolution() {
        let r = RawResourceResolver::new("com.example").with_known_assets(["pager_ringing"]);
        assert!(r.resolve("pager_ringing").is_ok());
        assert!(r.resolve("missing_tone").is_err());
    }
}
