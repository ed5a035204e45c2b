//! Built-in channel table for the pager app.

use crate::profile::{AudioRole, ChannelProfile, InvalidProfile, Rgb, Urgency};

pub const PAGER_CALL_CHANNEL: &str = "pager_call_channel";
pub const PAGER_STATUS_CHANNEL: &str = "pager_status_channel";

/// Ringtone shipped as a raw resource.
pub const PAGER_RINGING_SOUND: &str = "pager_ringing";

/// Three long pulses: 800ms on, 400ms off.
const CALL_VIBRATION: [u64; 6] = [0, 800, 400, 800, 400, 800];
const STATUS_VIBRATION: [u64; 4] = [0, 500, 250, 500];

/// The two pager channels: urgent "order ready" calls and routine status
/// updates.
pub fn pager_channels() -> Result<Vec<ChannelProfile>, InvalidProfile> {
    Ok(vec![
        ChannelProfile::builder(PAGER_CALL_CHANNEL, "Pager Calls")
            .description("High priority notifications for pager calls when your order is ready")
            .urgency(Urgency::High)
            .vibration(CALL_VIBRATION)
            .sound(PAGER_RINGING_SOUND, AudioRole::Ringtone)
            .light_color(Rgb::RED)
            .show_badge(true)
            .build()?,
        ChannelProfile::builder(PAGER_STATUS_CHANNEL, "Pager Status Updates")
            .description("Notifications for pager status changes")
            .urgency(Urgency::Default)
            .vibration(STATUS_VIBRATION)
            .build()?,
    ])
}
