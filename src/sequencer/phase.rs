//! Onboarding phase machine — tracks where the player is in the funnel.

use serde::{Deserialize, Serialize};

/// The phases of the onboarding funnel.
///
/// Progresses linearly: Idle → Processing → PreEntry → Scanning →
/// SecurityFlagged → Verifying → Verified. There is no failure branch —
/// every timed phase advances forward unconditionally once its timer
/// elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Landing form is accepting input.
    Idle,
    /// Simulated backend work; the reward is finalized on entry.
    Processing,
    /// Reward summary shown, waiting for the player to hit enter.
    PreEntry,
    /// Cosmetic security scan after the enter click.
    Scanning,
    /// Blocking interstitial demanding verification.
    SecurityFlagged,
    /// Verification hook invoked; advancing on a timer regardless.
    Verifying,
    /// Terminal — the lobby takes over.
    Verified,
}

impl Phase {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: Phase) -> bool {
        use Phase::*;
        matches!(
            (self, target),
            (Idle, Processing)
                | (Processing, PreEntry)
                | (PreEntry, Scanning)
                | (Scanning, SecurityFlagged)
                | (SecurityFlagged, Verifying)
                | (Verifying, Verified)
        )
    }

    /// Whether this phase is terminal (the funnel is done).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Verified)
    }

    /// Get the next phase in the linear progression, if any.
    pub fn next(&self) -> Option<Phase> {
        use Phase::*;
        match self {
            Idle => Some(Processing),
            Processing => Some(PreEntry),
            PreEntry => Some(Scanning),
            Scanning => Some(SecurityFlagged),
            SecurityFlagged => Some(Verifying),
            Verifying => Some(Verified),
            Verified => None,
        }
    }

    /// Whether this phase advances by itself once a timer elapses, as
    /// opposed to waiting for player input.
    pub fn is_timed(&self) -> bool {
        matches!(self, Self::Processing | Self::Scanning | Self::Verifying)
    }
}

impl Default for Phase {
    fn default() -> Self {
        Self::Idle
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Processing => "processing",
            Self::PreEntry => "pre_entry",
            Self::Scanning => "scanning",
            Self::SecurityFlagged => "security_flagged",
            Self::Verifying => "verifying",
            Self::Verified => "verified",
        };
        write!(f, "{s}")
    }
}
