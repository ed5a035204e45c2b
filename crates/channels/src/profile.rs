//! Channel profiles: the immutable, validated description of one delivery
//! channel's urgency tier and alert characteristics.

use std::{fmt, str::FromStr};

use {
    pager_config::ChannelEntry,
    serde::{Deserialize, Deserializer, Serialize, Serializer},
};

/// Malformed static channel data. Always a programming or configuration
/// error, never something to retry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidProfile {
    #[error("channel id must not be empty")]
    EmptyId,

    #[error("channel {id}: vibration pattern needs at least 2 entries, got {len}")]
    VibrationTooShort { id: String, len: usize },

    #[error("channel {id}: vibration entry {index} is negative ({value}ms)")]
    NegativeVibration { id: String, index: usize, value: i64 },

    #[error("unknown urgency tier '{0}' (expected low, default or high)")]
    UnknownUrgency(String),

    #[error("unknown audio role '{0}' (expected ringtone or notification)")]
    UnknownAudioRole(String),

    #[error("invalid light color '{0}' (expected #RRGGBB or a color name)")]
    InvalidLightColor(String),

    #[error("channel {id}: sound asset name must not be empty")]
    EmptySoundAsset { id: String },

    #[error("channel {id}: audio role set without a sound")]
    AudioRoleWithoutSound { id: String },

    #[error("channel {id}: vibration entry {index} is too long ({value}ms)")]
    VibrationOutOfRange { id: String, index: usize, value: u64 },
}

/// How intrusively the platform surfaces notifications on a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Urgency {
    Low,
    #[default]
    Default,
    High,
}

impl Urgency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Default => "default",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Urgency {
    type Err = InvalidProfile;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "default" => Ok(Self::Default),
            "high" => Ok(Self::High),
            _ => Err(InvalidProfile::UnknownUrgency(s.to_string())),
        }
    }
}

/// How the host should mix a channel's sound against other audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AudioRole {
    /// Treated like an incoming call: rings over other audio.
    Ringtone,
    #[default]
    Notification,
}

impl AudioRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ringtone => "ringtone",
            Self::Notification => "notification",
        }
    }
}

impl FromStr for AudioRole {
    type Err = InvalidProfile;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ringtone" => Ok(Self::Ringtone),
            "notification" => Ok(Self::Notification),
            _ => Err(InvalidProfile::UnknownAudioRole(s.to_string())),
        }
    }
}

/// A channel sound: logical asset name plus its audio role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSound {
    pub asset: String,
    pub role: AudioRole,
}

impl ChannelSound {
    pub fn new(asset: impl Into<String>, role: AudioRole) -> Self {
        Self {
            asset: asset.into(),
            role,
        }
    }
}

/// 24-bit RGB color for the ambient/LED indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLUE: Self = Self(0x00, 0x00, 0xFF);
    pub const CYAN: Self = Self(0x00, 0xFF, 0xFF);
    pub const GREEN: Self = Self(0x00, 0xFF, 0x00);
    pub const MAGENTA: Self = Self(0xFF, 0x00, 0xFF);
    pub const RED: Self = Self(0xFF, 0x00, 0x00);
    pub const WHITE: Self = Self(0xFF, 0xFF, 0xFF);
    pub const YELLOW: Self = Self(0xFF, 0xFF, 0x00);

    /// Opaque ARGB word, the form most notification hosts take.
    pub fn to_argb(self) -> u32 {
        0xFF00_0000 | (u32::from(self.0) << 16) | (u32::from(self.1) << 8) | u32::from(self.2)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

impl FromStr for Rgb {
    type Err = InvalidProfile;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidProfile::InvalidLightColor(s.to_string());
        let trimmed = s.trim();
        if let Some(hex) = trimmed.strip_prefix('#') {
            if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
            return Ok(Self(byte(0)?, byte(2)?, byte(4)?));
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "red" => Ok(Self::RED),
            "green" => Ok(Self::GREEN),
            "blue" => Ok(Self::BLUE),
            "white" => Ok(Self::WHITE),
            "yellow" => Ok(Self::YELLOW),
            "cyan" => Ok(Self::CYAN),
            "magenta" => Ok(Self::MAGENTA),
            _ => Err(invalid()),
        }
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Vibration timings in milliseconds: `[delay, on, off, on, off, ...]`.
///
/// Empty means "use the platform default pattern".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VibrationPattern(Vec<u64>);

impl VibrationPattern {
    /// Validate a pattern for channel `id`.
    ///
    /// Entries are capped at `i64::MAX` so every pattern fits a config file.
    pub fn new(id: &str, timings: Vec<u64>) -> Result<Self, InvalidProfile> {
        if timings.len() == 1 {
            return Err(InvalidProfile::VibrationTooShort {
                id: id.to_string(),
                len: 1,
            });
        }
        if let Some((index, &value)) = timings
            .iter()
            .enumerate()
            .find(|(_, t)| i64::try_from(**t).is_err())
        {
            return Err(InvalidProfile::VibrationOutOfRange {
                id: id.to_string(),
                index,
                value,
            });
        }
        Ok(Self(timings))
    }

    /// Validate a pattern from untyped input where entries may be negative.
    pub fn from_signed(id: &str, timings: &[i64]) -> Result<Self, InvalidProfile> {
        let timings = timings
            .iter()
            .enumerate()
            .map(|(index, &value)| {
                u64::try_from(value).map_err(|_| InvalidProfile::NegativeVibration {
                    id: id.to_string(),
                    index,
                    value,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(id, timings)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn timings(&self) -> &[u64] {
        &self.0
    }

    /// Initial delay before the first pulse.
    pub fn delay_ms(&self) -> Option<u64> {
        self.0.first().copied()
    }

    /// Total vibrating time, excluding the initial delay and pauses.
    pub fn on_ms(&self) -> u64 {
        self.0.iter().skip(1).step_by(2).sum()
    }
}

/// Immutable description of one notification channel.
///
/// Built with [`ChannelProfile::builder`]; validation runs once in
/// [`ChannelProfileBuilder::build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelProfile {
    id: String,
    display_name: String,
    description: String,
    urgency: Urgency,
    vibration: VibrationPattern,
    sound: Option<ChannelSound>,
    light_color: Option<Rgb>,
    show_badge: bool,
}

impl ChannelProfile {
    pub fn builder(id: impl Into<String>, display_name: impl Into<String>) -> ChannelProfileBuilder {
        ChannelProfileBuilder {
            id: id.into(),
            display_name: display_name.into(),
            description: String::new(),
            urgency: Urgency::Default,
            vibration: Vec::new(),
            sound: None,
            light_color: None,
            show_badge: true,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn urgency(&self) -> Urgency {
        self.urgency
    }

    pub fn vibration(&self) -> &VibrationPattern {
        &self.vibration
    }

    pub fn sound(&self) -> Option<&ChannelSound> {
        self.sound.as_ref()
    }

    pub fn light_color(&self) -> Option<Rgb> {
        self.light_color
    }

    pub fn show_badge(&self) -> bool {
        self.show_badge
    }

    /// Convert back to the config representation.
    pub fn to_entry(&self) -> ChannelEntry {
        ChannelEntry {
            id: self.id.clone(),
            name: self.display_name.clone(),
            description: self.description.clone(),
            urgency: self.urgency.as_str().into(),
            vibration: self
                .vibration
                .timings()
                .iter()
                // fits: `VibrationPattern::new` rejects values above i64::MAX
                .map(|&t| i64::try_from(t).unwrap_or(i64::MAX))
                .collect(),
            sound: self.sound.as_ref().map(|s| s.asset.clone()),
            audio_role: self.sound.as_ref().map(|s| s.role.as_str().into()),
            light_color: self.light_color.map(|c| c.to_string()),
            show_badge: Some(self.show_badge),
        }
    }
}

impl TryFrom<&ChannelEntry> for ChannelProfile {
    type Error = InvalidProfile;

    fn try_from(entry: &ChannelEntry) -> Result<Self, Self::Error> {
        let urgency = if entry.urgency.trim().is_empty() {
            Urgency::Default
        } else {
            entry.urgency.parse()?
        };

        let pattern = VibrationPattern::from_signed(&entry.id, &entry.vibration)?;
        let mut builder = ChannelProfile::builder(&entry.id, &entry.name)
            .description(&entry.description)
            .urgency(urgency)
            .vibration(pattern.timings());

        let role = entry
            .audio_role
            .as_deref()
            .map(str::parse::<AudioRole>)
            .transpose()?;
        match (&entry.sound, role) {
            (Some(asset), role) => builder = builder.sound(asset, role.unwrap_or_default()),
            (None, Some(_)) => {
                return Err(InvalidProfile::AudioRoleWithoutSound {
                    id: entry.id.clone(),
                });
            },
            (None, None) => {},
        }
        if let Some(color) = &entry.light_color {
            builder = builder.light_color(color.parse()?);
        }
        if let Some(show_badge) = entry.show_badge {
            builder = builder.show_badge(show_badge);
        }
        builder.build()
    }
}

/// Builder for [`ChannelProfile`]. Nothing is validated until `build`.
#[derive(Debug, Clone)]
#[must_use]
pub struct ChannelProfileBuilder {
    id: String,
    display_name: String,
    description: String,
    urgency: Urgency,
    vibration: Vec<u64>,
    sound: Option<ChannelSound>,
    light_color: Option<Rgb>,
    show_badge: bool,
}

impl ChannelProfileBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn urgency(mut self, urgency: Urgency) -> Self {
        self.urgency = urgency;
        self
    }

    pub fn vibration(mut self, timings: impl Into<Vec<u64>>) -> Self {
        self.vibration = timings.into();
        self
    }

    pub fn sound(mut self, asset: impl Into<String>, role: AudioRole) -> Self {
        self.sound = Some(ChannelSound::new(asset, role));
        self
    }

    pub fn light_color(mut self, color: Rgb) -> Self {
        self.light_color = Some(color);
        self
    }

    pub fn show_badge(mut self, show_badge: bool) -> Self {
        self.show_badge = show_badge;
        self
    }

    pub fn build(self) -> Result<ChannelProfile, InvalidProfile> {
        if self.id.trim().is_empty() {
            return Err(InvalidProfile::EmptyId);
        }
        let vibration = VibrationPattern::new(&self.id, self.vibration)?;
        if let Some(sound) = &self.sound
            && sound.asset.trim().is_empty()
        {
            return Err(InvalidProfile::EmptySoundAsset { id: self.id });
        }
        Ok(ChannelProfile {
            id: self.id,
            display_name: self.display_name,
            description: self.description,
            urgency: self.urgency,
            vibration,
            sound: self.sound,
            light_color: self.light_color,
            show_badge: self.show_badge,
        })
    }
}
