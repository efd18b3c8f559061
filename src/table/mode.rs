//! Table-wide sample encoding flags

use std::fmt;

/// Encoding of a single inserted point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Real-valued analog sample
    Real,
    /// Complex analog sample (real + imaginary)
    Complex,
    /// Four-valued logic sample
    Digital,
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Encoding::Real => "real",
            Encoding::Complex => "complex",
            Encoding::Digital => "digital",
        };
        f.write_str(name)
    }
}

/// How the table reacts to mixed encodings within one flush window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModePolicy {
    /// The last insertion decides how the whole table renders
    #[default]
    LastWriteWins,
    /// Reject any insertion whose encoding differs from the window's first one
    Strict,
}

/// Result of offering an encoding to the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeCheck {
    /// Same encoding as the window so far (or first in the window)
    Consistent,
    /// Differs from the window; the insertion still proceeds
    Mixed { window: Encoding },
    /// Strict policy refused the insertion
    Rejected { window: Encoding },
}

/// The two sticky flags, `is_digital` and `is_complex`
///
/// Both flags are driven by the most recent insertion and survive a flush.
/// The window encoding is the first encoding seen since the last flush and
/// is only used for mix detection.
#[derive(Debug, Clone, Default)]
pub struct ModeTracker {
    policy: ModePolicy,
    last: Option<Encoding>,
    window: Option<Encoding>,
    mix_reported: bool,
}

impl ModeTracker {
    pub fn new(policy: ModePolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    pub fn policy(&self) -> ModePolicy {
        self.policy
    }

    /// Check an encoding against the current window without recording it
    pub fn check(&self, encoding: Encoding) -> ModeCheck {
        match self.window {
            Some(window) if window != encoding => match self.policy {
                ModePolicy::Strict => ModeCheck::Rejected { window },
                ModePolicy::LastWriteWins => ModeCheck::Mixed { window },
            },
            _ => ModeCheck::Consistent,
        }
    }

    /// Record a stored insertion's encoding
    ///
    /// Returns the window encoding when this insertion is the first one in
    /// the window to differ from it. Dropped insertions must not be recorded.
    pub fn record(&mut self, encoding: Encoding) -> Option<Encoding> {
        self.last = Some(encoding);
        let window = *self.window.get_or_insert(encoding);
        if window == encoding || self.mix_reported {
            return None;
        }
        self.mix_reported = true;
        Some(window)
    }

    /// Start a new flush window; the sticky flags are left alone
    pub fn restart_window(&mut self) {
        self.window = None;
        self.mix_reported = false;
    }

    pub fn last(&self) -> Option<Encoding> {
        self.last
    }

    pub fn is_digital(&self) -> bool {
        self.last == Some(Encoding::Digital)
    }

    pub fn is_complex(&self) -> bool {
        self.last == Some(Encoding::Complex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_start_analog_real() {
        let tracker = ModeTracker::default();
        assert!(!tracker.is_digital());
        assert!(!tracker.is_complex());
    }

    #[test]
    fn test_last_write_wins() {
        let mut tracker = ModeTracker::new(ModePolicy::LastWriteWins);
        assert_eq!(tracker.record(Encoding::Complex), None);
        assert!(tracker.is_complex());
        assert_eq!(
            tracker.check(Encoding::Digital),
            ModeCheck::Mixed {
                window: Encoding::Complex
            }
        );
        assert_eq!(tracker.record(Encoding::Digital), Some(Encoding::Complex));
        assert!(tracker.is_digital());
        assert!(!tracker.is_complex());
        // Reported once per window
        assert_eq!(tracker.record(Encoding::Real), None);
    }

    #[test]
    fn test_check_alone_does_not_consume_the_report() {
        let mut tracker = ModeTracker::new(ModePolicy::LastWriteWins);
        tracker.record(Encoding::Real);
        for _ in 0..3 {
            assert_eq!(
                tracker.check(Encoding::Digital),
                ModeCheck::Mixed {
                    window: Encoding::Real
                }
            );
        }
        assert!(!tracker.is_digital());
        assert_eq!(tracker.record(Encoding::Digital), Some(Encoding::Real));
    }

    #[test]
    fn test_mix_reported_again_after_window_restart() {
        let mut tracker = ModeTracker::new(ModePolicy::LastWriteWins);
        tracker.record(Encoding::Real);
        assert_eq!(tracker.record(Encoding::Complex), Some(Encoding::Real));
        tracker.restart_window();
        assert_eq!(tracker.record(Encoding::Digital), None);
        assert_eq!(tracker.record(Encoding::Real), Some(Encoding::Digital));
    }

    #[test]
    fn test_strict_rejects_mix() {
        let mut tracker = ModeTracker::new(ModePolicy::Strict);
        assert_eq!(tracker.check(Encoding::Real), ModeCheck::Consistent);
        tracker.record(Encoding::Real);
        assert_eq!(tracker.check(Encoding::Real), ModeCheck::Consistent);
        assert_eq!(
            tracker.check(Encoding::Digital),
            ModeCheck::Rejected {
                window: Encoding::Real
            }
        );
    }

    #[test]
    fn test_flags_survive_window_restart() {
        let mut tracker = ModeTracker::new(ModePolicy::Strict);
        tracker.record(Encoding::Digital);
        tracker.restart_window();
        assert!(tracker.is_digital());
        assert_eq!(tracker.check(Encoding::Complex), ModeCheck::Consistent);
    }
}
