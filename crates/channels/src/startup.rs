//! Startup glue: resolve the channel table and apply it with the
//! propagation policy hosts expect (static-data errors abort, submission
//! errors only degrade alert quality).

use {
    pager_config::{ChannelEntry, PagerConfig},
    tracing::{info, warn},
};

use crate::{
    defaults::pager_channels,
    host::NotificationHost,
    profile::{ChannelProfile, InvalidProfile},
    registry::{ChannelRegistry, RegisteredCount, RegistrationError},
};

/// Outcome of configuring channels at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupReport {
    /// Every channel was declared.
    Configured(RegisteredCount),
    /// The host has no channel support; notifications use platform defaults.
    Unsupported,
    /// Some or all channels failed; the rest were declared.
    Degraded {
        registered: RegisteredCount,
        failed_ids: Vec<String>,
    },
}

impl StartupReport {
    pub fn registered(&self) -> RegisteredCount {
        match self {
            Self::Configured(n) => *n,
            Self::Unsupported => RegisteredCount(0),
            Self::Degraded { registered, .. } => *registered,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}

/// Reconcile `profiles` once, downgrading submission failures to warnings.
///
/// Call before any code path that can post a notification on one of these
/// channels. Only `DuplicateChannelId` is returned as an error.
pub fn configure_channels<H: NotificationHost>(
    registry: &mut ChannelRegistry<H>,
    profiles: &[ChannelProfile],
) -> Result<StartupReport, RegistrationError> {
    if !registry.supports_channels() {
        // Still validates the table.
        registry.reconcile(profiles)?;
        info!("notification channels not supported by host, using platform defaults");
        return Ok(StartupReport::Unsupported);
    }

    match registry.reconcile(profiles) {
        Ok(count) => {
            info!(registered = %count, "notification channels configured");
            Ok(StartupReport::Configured(count))
        },
        Err(err) if err.is_fatal() => Err(err),
        Err(err) => {
            warn!(
                error = %err,
                failed = ?err.failed_ids(),
                "notification channels degraded"
            );
            Ok(StartupReport::Degraded {
                registered: err.registered(),
                failed_ids: err.failed_ids().into_iter().map(String::from).collect(),
            })
        },
    }
}

/// Validate a channel table from config.
pub fn profiles_from_config(entries: &[ChannelEntry]) -> Result<Vec<ChannelProfile>, InvalidProfile> {
    entries.iter().map(ChannelProfile::try_from).collect()
}

/// The table to register: the config's, or the built-in pager channels when
/// the config declares none.
pub fn resolve_table(config: &PagerConfig) -> Result<Vec<ChannelProfile>, InvalidProfile> {
    if config.has_channel_table() {
        profiles_from_config(&config.channels)
    } else {
        pager_channels()
    }
}
