use std::fmt;

use serde::{Deserialize, Serialize};

use crate::profile::{AudioRole, ChannelProfile, Rgb, Urgency};

/// Host importance scale. Levels follow the common mobile notification
/// manager numbering so adapters can pass them through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Importance {
    /// Shown in the shade, no sound or peek.
    Low,
    /// Makes sound, no heads-up.
    Default,
    /// Makes sound and peeks on screen.
    High,
}

impl Importance {
    pub fn level(self) -> u8 {
        match self {
            Self::Low => 2,
            Self::Default => 3,
            Self::High => 4,
        }
    }

    pub fn is_heads_up(self) -> bool {
        self == Self::High
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Default => "default",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Urgency> for Importance {
    fn from(urgency: Urgency) -> Self {
        match urgency {
            Urgency::Low => Self::Low,
            Urgency::Default => Self::Default,
            Urgency::High => Self::High,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioUsage {
    Notification,
    NotificationRingtone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Sonification,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioAttributes {
    pub usage: AudioUsage,
    pub content_type: ContentType,
}

impl From<AudioRole> for AudioAttributes {
    fn from(role: AudioRole) -> Self {
        let usage = match role {
            AudioRole::Ringtone => AudioUsage::NotificationRingtone,
            AudioRole::Notification => AudioUsage::Notification,
        };
        Self {
            usage,
            content_type: ContentType::Sonification,
        }
    }
}

/// Sound attached to a definition. `asset` is still a logical name; hosts
/// resolve it to a URI through their own [`AssetResolver`](crate::host::AssetResolver).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundAttributes {
    pub asset: String,
    pub audio: AudioAttributes,
}

/// Flattened, host-native form of a [`ChannelProfile`].
///
/// Optional attributes that are `None` mean "leave the platform default",
/// never "disable".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub importance: Importance,
    pub enable_vibration: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vibration_pattern: Option<Vec<u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound: Option<SoundAttributes>,
    pub enable_lights: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light_color: Option<Rgb>,
    pub show_badge: bool,
}

impl ChannelDefinition {
    pub fn from_profile(profile: &ChannelProfile) -> Self {
        let vibration = profile.vibration();
        Self {
            id: profile.id().to_string(),
            name: profile.display_name().to_string(),
            description: profile.description().to_string(),
            importance: profile.urgency().into(),
            enable_vibration: !vibration.is_empty(),
            vibration_pattern: (!vibration.is_empty()).then(|| vibration.timings().to_vec()),
            sound: profile.sound().map(|s| SoundAttributes {
                asset: s.asset.clone(),
                audio: s.role.into(),
            }),
            enable_lights: profile.light_color().is_some(),
            light_color: profile.light_color(),
            show_badge: profile.show_badge(),
        }
    }
}

impl From<&ChannelProfile> for ChannelDefinition {
    fn from(profile: &ChannelProfile) -> Self {
        Self::from_profile(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_urgency_to_importance() {
        assert_eq!(Importance::from(Urgency::Low), Importance::Low);
        assert_eq!(Importance::from(Urgency::Default), Importance::Default);
        assert_eq!(Importance::from(Urgency::High), Importance::High);
        assert!(Importance::High.is_heads_up());
        assert!(!Importance::Default.is_heads_up());
        assert!(Importance::Low.level() < Importance::High.level());
        assert_eq!(Importance::High.to_string(), "high");
        assert_eq!(Importance::Default.as_str(), "default");
    }

    #[test]
    fn full_profile_flattens_every_attribute() {
        let profile = ChannelProfile::builder("pager_call_channel", "Pager Calls")
            .description("Order ready")
            .urgency(Urgency::High)
            .vibration([0, 800, 400, 800])
            .sound("pager_ringing", AudioRole::Ringtone)
            .light_color(Rgb::RED)
            .build()
            .unwrap();

        let def = ChannelDefinition::from_profile(&profile);
        assert_eq!(def.id, "pager_call_channel");
        assert_eq!(def.importance, Importance::High);
        assert!(def.enable_vibration);
        assert_eq!(def.vibration_pattern.as_deref(), Some(&[0, 800, 400, 800][..]));
        let sound = def.sound.unwrap();
        assert_eq!(sound.asset, "pager_ringing");
        assert_eq!(sound.audio.usage, AudioUsage::NotificationRingtone);
        assert_eq!(sound.audio.content_type, ContentType::Sonification);
        assert!(def.enable_lights);
        assert_eq!(def.light_color, Some(Rgb::RED));
        assert!(def.show_badge);
    }

    #[test]
    fn omitted_attributes_leave_platform_defaults() {
        let profile = ChannelProfile::builder("quiet", "Quiet")
            .urgency(Urgency::Low)
            .build()
            .unwrap();
        let def = ChannelDefinition::from(&profile);
        assert!(!def.enable_vibration);
        assert!(def.vibration_pattern.is_none());
        assert!(def.sound.is_none());
        assert!(!def.enable_lights);
        assert!(def.light_color.is_none());
    }

    #[test]
    fn serializes_with_snake_case_enums() {
        let profile = ChannelProfile::builder("c", "C")
            .urgency(Urgency::High)
            .light_color(Rgb::GREEN)
            .build()
            .unwrap();
        let json = serde_json::to_value(ChannelDefinition::from(&profile)).unwrap();
        assert_eq!(json["importance"], "high");
        assert_eq!(json["light_color"], "#00FF00");
        assert!(json.get("sound").is_none());
    }
}
