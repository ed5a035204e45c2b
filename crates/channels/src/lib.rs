//! Notification channel registration.
//!
//! A fixed table of [`ChannelProfile`]s is declared on the host notification
//! subsystem once per startup through [`ChannelRegistry::reconcile`]. The host
//! is reached through the [`NotificationHost`] port, which also answers
//! whether channels are supported at all; hosts without support are skipped
//! and keep their platform defaults.

pub mod defaults;
pub mod definition;
pub mod host;
pub mod memory;
pub mod profile;
pub mod registry;
pub mod startup;
pub mod store;

pub use {
    definition::{ChannelDefinition, Importance},
    host::{AssetResolver, NotificationHost, RawResourceResolver, SubmissionError},
    memory::MemoryHost,
    profile::{AudioRole, ChannelProfile, ChannelSound, InvalidProfile, Rgb, Urgency},
    registry::{ChannelRegistry, RegisteredCount, RegistrationError, SubmissionFailure},
    startup::{StartupReport, configure_channels, resolve_table},
    store::{JsonChannelStore, StoredChannel},
};
