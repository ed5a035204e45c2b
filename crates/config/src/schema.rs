//! Config schema types (host adapter, channel table).

use serde::{Deserialize, Serialize};

/// Package that ships the pager app's raw sound resources.
pub const DEFAULT_PACKAGE: &str = "com.squadqwat.mobile_pager_flutter";

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagerConfig {
    pub host: HostConfig,
    /// Channel table. Empty means "use the built-in pager channels".
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub channels: Vec<ChannelEntry>,
}

/// Settings for the notification host adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Whether the host exposes per-channel configuration.
    pub supports_channels: bool,

    /// Package that owns raw sound resources.
    pub package: String,

    /// Where registered channels are persisted. Defaults to
    /// `<data_dir>/channels.json`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_path: Option<String>,

    /// Sound assets bundled with the app. When set, any other sound name
    /// fails to resolve.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub known_assets: Option<Vec<String>>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            supports_channels: true,
            package: DEFAULT_PACKAGE.into(),
            store_path: None,
            known_assets: None,
        }
    }
}

/// One channel as written in a config file.
///
/// Values stay loosely typed here (`urgency` as a string, vibration as
/// signed integers) so that malformed entries surface as profile validation
/// errors naming the channel rather than as opaque parse errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelEntry {
    pub id: String,
    pub name: String,
    pub description: String,
    pub urgency: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub vibration: Vec<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub light_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_badge: Option<bool>,
}

impl PagerConfig {
    /// Whether the config overrides the built-in channel table.
    pub fn has_channel_table(&self) -> bool {
        !self.channels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let cfg: PagerConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, PagerConfig::default());
        assert!(cfg.host.supports_channels);
        assert_eq!(cfg.host.package, DEFAULT_PACKAGE);
        assert!(!cfg.has_channel_table());
    }

    #[test]
    fn parses_channel_table() {
        let raw = r#"
[host]
supports_channels = false
known_assets = ["pager_ringing"]

[[channels]]
id = "pager_call_channel"
name = "Pager Calls"
urgency = "high"
vibration = [0, 800, 400, 800]
sound = "pager_ringing"
audio_role = "ringtone"
light_color = "red"
"#;
        let cfg: PagerConfig = toml::from_str(raw).unwrap();
        assert!(!cfg.host.supports_channels);
        assert_eq!(cfg.host.known_assets.as_deref(), Some(&["pager_ringing".to_string()][..]));
        assert_eq!(cfg.channels.len(), 1);
        let entry = &cfg.channels[0];
        assert_eq!(entry.urgency, "high");
        assert_eq!(entry.vibration, vec![0, 800, 400, 800]);
        assert_eq!(entry.light_color.as_deref(), Some("red"));
        assert_eq!(entry.show_badge, None);
        assert!(entry.description.is_empty());
    }

    #[test]
    fn negative_vibration_survives_parsing() {
        let cfg: PagerConfig =
            serde_json::from_str(r#"{"channels":[{"id":"x","vibration":[0,-5]}]}"#).unwrap();
        assert_eq!(cfg.channels[0].vibration, vec![0, -5]);
    }
}
