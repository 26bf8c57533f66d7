//! Haptic confirmation pulses
//!
//! The engine only decides *when* a pulse is due. Delivering it (vibration
//! API, gamepad rumble, nothing at all) is up to the `HapticSink`.

use std::time::Duration;

/// Feedback emitted by a mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackPulse {
    /// Short single pulse confirming adaptive haptics were switched on
    Confirm,
    /// Longer pattern confirming a profile actually switched
    ProfileSwitch,
}

impl FeedbackPulse {
    /// Alternating on/off durations in milliseconds, starting with "on"
    pub fn pattern_ms(self) -> &'static [u64] {
        match self {
            FeedbackPulse::Confirm => &[50],
            FeedbackPulse::ProfileSwitch => &[100, 50, 100],
        }
    }

    pub fn total_duration(self) -> Duration {
        Duration::from_millis(self.pattern_ms().iter().sum())
    }
}

/// Receiver of feedback pulses
pub trait HapticSink: Send + Sync {
    fn pulse(&self, pulse: FeedbackPulse);
}

/// Sink that only records the pulse in the trace log
#[derive(Debug, Default)]
pub struct LogHaptics;

impl HapticSink for LogHaptics {
    fn pulse(&self, pulse: FeedbackPulse) {
        tracing::debug!(?pulse, pattern = ?pulse.pattern_ms(), "Haptic pulse");
    }
}

#[cfg(test)]
pub(crate) use recording::RecordingHaptics;


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_switch_is_longer_than_confirm() {
        assert!(FeedbackPulse::ProfileSwitch.total_duration() > FeedbackPulse::Confirm.total_duration());
        assert_eq!(FeedbackPulse::Confirm.pattern_ms(), &[50]);
        assert_eq!(FeedbackPulse::ProfileSwitch.pattern_ms().len(), 3);
    }
}
