use std::collections::HashSet;

use crate::hid::report::BatteryReading;

/// Low-battery levels, highest first. 5% is the critical threshold.
pub const THRESHOLDS: [u8; 4] = [30, 20, 10, 5];

pub const CRITICAL_THRESHOLD: u8 = 5;

/// Baseline used before the first reading arrives, so a freshly started
/// monitor with an already-low battery warns immediately.
const BASELINE: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Critical,
}

/// One low-battery alert. At most one is emitted per processed reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notification {
    pub threshold: u8,
    pub severity: Severity,
    pub reading: BatteryReading,
}

impl Notification {
    pub fn title(&self) -> &'static str {
        match self.severity {
            Severity::Warning => "Low Battery Warning",
            Severity::Critical => "Critical Battery Warning",
        }
    }
}

/// Per-threshold popup switches. The critical threshold cannot be disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopupSettings {
    pub popup_30: bool,
    pub popup_20: bool,
    pub popup_10: bool,
}

impl Default for PopupSettings {
    fn default() -> Self {
        Self {
            popup_30: true,
            popup_20: true,
            popup_10: true,
        }
    }
}

impl PopupSettings {
    fn is_enabled(&self, threshold: u8) -> bool {
        match threshold {
            30 => self.popup_30,
            20 => self.popup_20,
            10 => self.popup_10,
            _ => true,
        }
    }
}

/// Tracks which thresholds have already alerted so the battery can hover at
/// a level without re-notifying on every poll.
///
/// A reading at or above the previous one counts as a recharge (or replug)
/// and clears the alert history.
pub struct ThresholdNotifier {
    fired: HashSet<u8>,
    last: u8,
}

impl ThresholdNotifier {
    pub fn new() -> Self {
        Self {
            fired: HashSet::new(),
            last: BASELINE,
        }
    }

    /// Feeds one reading through the state machine.
    ///
    /// An absent mouse level leaves the state untouched. Otherwise every
    /// newly crossed threshold is marked fired; crossing the critical
    /// threshold emits a critical alert and stops scanning, while among the
    /// warning thresholds only the lowest newly crossed one whose popup is
    /// enabled alerts. Disabled thresholds are marked fired silently and do
    /// not stop the scan.
    pub fn update(
        &mut self,
        reading: &BatteryReading,
        popups: &PopupSettings,
    ) -> Option<Notification> {
        let Some(level) = reading.mouse else {
            return None;
        };

        let mut pending = None;

        if level >= self.last {
            self.fired.clear();
        } else {
            for &threshold in THRESHOLDS.iter() {
                if level > threshold || self.fired.contains(&threshold) {
                    continue;
                }

                self.fired.insert(threshold);

                if threshold == CRITICAL_THRESHOLD {
                    pending = Some((threshold, Severity::Critical));
                    break;
                }

                if popups.is_enabled(threshold) {
                    pending = Some((threshold, Severity::Warning));
                }
            }
        }

        self.last = level;

        pending.map(|(threshold, severity)| Notification {
            threshold,
            severity,
            reading: *reading,
        })
    }

    /// Severity of the worst threshold currently below water, used to tint
    /// the tray icon. `None` once a recharge has cleared the history.
    pub fn severity(&self) -> Option<Severity> {
        if self.fired.contains(&CRITICAL_THRESHOLD) {
            Some(Severity::Critical)
        } else if !self.fired.is_empty() {
            Some(Severity::Warning)
        } else {
            None
        }
    }
}

impl Default for ThresholdNotifier {
    fn default() -> Self {
        Self::new()
    }
}
