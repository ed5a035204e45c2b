use std::{collections::HashSet, fmt};

use tracing::{debug, info, warn};

use crate::{
    definition::ChannelDefinition,
    host::{NotificationHost, SubmissionError},
    profile::ChannelProfile,
};

/// Number of channels the host accepted in one reconcile pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct RegisteredCount(pub usize);

impl fmt::Display for RegisteredCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One profile the host refused.
#[derive(Debug, thiserror::Error)]
#[error("channel {id}: {error}")]
pub struct SubmissionFailure {
    pub id: String,
    #[source]
    pub error: SubmissionError,
}

#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    /// The table declares the same id twice. Nothing was submitted.
    #[error("duplicate channel id '{0}'")]
    DuplicateChannelId(String),

    /// Some channels were registered, the listed ones were not.
    #[error("{} channel(s) failed to register ({} registered)", .failures.len(), .registered)]
    Partial {
        registered: RegisteredCount,
        failures: Vec<SubmissionFailure>,
    },

    /// Every submission failed.
    #[error("all {} channel(s) failed to register", .failures.len())]
    Total { failures: Vec<SubmissionFailure> },
}

impl RegistrationError {
    /// Static-data errors abort startup; submission errors never do.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::DuplicateChannelId(_))
    }

    pub fn failures(&self) -> &[SubmissionFailure] {
        match self {
            Self::DuplicateChannelId(_) => &[],
            Self::Partial { failures, .. } | Self::Total { failures } => failures,
        }
    }

    pub fn failed_count(&self) -> usize {
        self.failures().len()
    }

    pub fn failed_ids(&self) -> Vec<&str> {
        self.failures().iter().map(|f| f.id.as_str()).collect()
    }

    /// Channels that did register despite the error.
    pub fn registered(&self) -> RegisteredCount {
        match self {
            Self::Partial { registered, .. } => *registered,
            Self::DuplicateChannelId(_) | Self::Total { .. } => RegisteredCount(0),
        }
    }
}

/// Applies a channel table to a [`NotificationHost`].
///
/// Holds no profile state: every call declares the full table again, so
/// repeating a call with the same table leaves the host unchanged.
pub struct ChannelRegistry<H> {
    host: H,
}

impl<H: NotificationHost> ChannelRegistry<H> {
    pub fn new(host: H) -> Self {
        Self { host }
    }

    pub fn supports_channels(&self) -> bool {
        self.host.supports_channels()
    }

    /// Declare every profile on the host, in order.
    ///
    /// Per-channel submission failures are collected and do not stop the
    /// pass. On a host without channel support this is a no-op returning 0.
    pub fn reconcile(
        &mut self,
        profiles: &[ChannelProfile],
    ) -> Result<RegisteredCount, RegistrationError> {
        ensure_unique_ids(profiles)?;

        if !self.supports_channels() {
            debug!(
                channels = profiles.len(),
                "host has no channel support, skipping registration"
            );
            return Ok(RegisteredCount(0));
        }

        let mut registered = 0;
        let mut failures = Vec::new();
        for profile in profiles {
            let definition = ChannelDefinition::from_profile(profile);
            match self.host.submit(&definition) {
                Ok(()) => {
                    debug!(
                        channel = %definition.id,
                        importance = ?definition.importance,
                        "channel submitted"
                    );
                    registered += 1;
                },
                Err(error) => {
                    warn!(channel = %definition.id, %error, "channel submission failed");
                    failures.push(SubmissionFailure {
                        id: definition.id,
                        error,
                    });
                },
            }
        }

        info!(
            registered,
            failed = failures.len(),
            "notification channels reconciled"
        );

        match (registered, failures.is_empty()) {
            (_, true) => Ok(RegisteredCount(registered)),
            (0, false) => Err(RegistrationError::Total { failures }),
            (n, false) => Err(RegistrationError::Partial {
                registered: RegisteredCount(n),
                failures,
            }),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }
}

fn ensure_unique_ids(profiles: &[ChannelProfile]) -> Result<(), RegistrationError> {
    let mut seen = HashSet::with_capacity(profiles.len());
    for profile in profiles {
        if !seen.insert(profile.id()) {
            return Err(RegistrationError::DuplicateChannelId(
                profile.id().to_string(),
            ));
        }
    }
    Ok(())
}
