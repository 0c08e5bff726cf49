//! Report Status Value Objects
//!
//! Lifecycle of a report:
//!
//! ```text
//! PENDING ──► APPROVED ──► RESOLVED
//!    │
//!    └──────► REJECTED
//! ```
//!
//! REJECTED and RESOLVED are terminal. Removal by the owner is not a
//! status change and is allowed from any state.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// ReportStatus
// ============================================================================

/// Moderation status of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    /// Awaiting moderation; visible to the owner and admins only
    #[default]
    Pending,

    /// Accepted by a moderator; shown in the public feed
    Approved,

    /// Refused by a moderator, optionally with a reason
    Rejected,

    /// Approved and later marked as dealt with; still public
    Resolved,
}

impl ReportStatus {
    pub const ALL: [ReportStatus; 4] = [
        Self::Pending,
        Self::Approved,
        Self::Rejected,
        Self::Resolved,
    ];

    /// Get string code for storage and the API
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Resolved => "RESOLVED",
        }
    }

    /// Create from string code
    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "PENDING" => Some(Self::Pending),
            "APPROVED" => Some(Self::Approved),
            "REJECTED" => Some(Self::Rejected),
            "RESOLVED" => Some(Self::Resolved),
            _ => None,
        }
    }

    /// Position in the admin panel, lowest first
    #[inline]
    pub const fn admin_rank(&self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Approved => 1,
            Self::Resolved => 2,
            Self::Rejected => 3,
        }
    }

    /// Shown in the public feed
    #[inline]
    pub const fn is_public(&self) -> bool {
        matches!(self, Self::Approved | Self::Resolved)
    }

    /// Check if this is a terminal state (cannot transition out)
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Resolved)
    }

    /// Whether a moderator may move a report from `self` to `next`
    #[inline]
    pub const fn can_transition_to(&self, next: ReportStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Approved)
                | (Self::Pending, Self::Rejected)
                | (Self::Approved, Self::Resolved)
        )
    }

    /// Statuses a write of `self` may land on. Racing moderation
    /// decisions overwrite each other; nothing leaves RESOLVED, and only
    /// an APPROVED report becomes RESOLVED.
    pub fn write_guard(&self) -> &'static [ReportStatus] {
        const MODERATED: &[ReportStatus] = &[
            ReportStatus::Pending,
            ReportStatus::Approved,
            ReportStatus::Rejected,
        ];
        const RESOLVABLE: &[ReportStatus] = &[ReportStatus::Approved];

        match self {
            Self::Approved | Self::Rejected => MODERATED,
            Self::Resolved => RESOLVABLE,
            Self::Pending => &[],
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ============================================================================
// ModerationDecision
// ============================================================================

/// Outcome an admin may pick for a pending report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationDecision {
    Approve,
    Reject,
}

impl ModerationDecision {
    /// Accepts the target status code, `APPROVED` or `REJECTED`
    pub fn from_code(code: &str) -> Option<Self> {
        match ReportStatus::from_code(code.trim())? {
            ReportStatus::Approved => Some(Self::Approve),
            ReportStatus::Rejected => Some(Self::Reject),
            _ => None,
        }
    }

    pub const fn target(&self) -> ReportStatus {
        match self {
            Self::Approve => ReportStatus::Approved,
            Self::Reject => ReportStatus::Rejected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_guard() {
        assert_eq!(
            ReportStatus::Resolved.write_guard().to_vec(),
            vec![ReportStatus::Approved]
        );
        assert!(!ReportStatus::Approved
            .write_guard()
            .contains(&ReportStatus::Resolved));
        assert!(ReportStatus::Rejected
            .write_guard()
            .contains(&ReportStatus::Approved));
        assert!(ReportStatus::Pending.write_guard().is_empty());
    }

    #[test]
    fn test_code_roundtrip() {
        for status in ReportStatus::ALL {
            assert_eq!(ReportStatus::from_code(status.code()), Some(status));
        }
        assert_eq!(ReportStatus::from_code("pending"), None);
    }

    #[test]
    fn test_transitions() {
        use ReportStatus::*;

        let allowed = [(Pending, Approved), (Pending, Rejected), (Approved, Resolved)];
        for from in ReportStatus::ALL {
            for to in ReportStatus::ALL {
                assert_eq!(
                    from.can_transition_to(to),
                    allowed.contains(&(from, to)),
                    "{from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn test_admin_rank_is_not_alphabetical() {
        let mut statuses = ReportStatus::ALL.to_vec();
        statuses.sort_by_key(|s| s.admin_rank());
        assert_eq!(
            statuses,
            vec![
                ReportStatus::Pending,
                ReportStatus::Approved,
                ReportStatus::Resolved,
                ReportStatus::Rejected,
            ]
        );
    }

    #[test]
    fn test_public_statuses() {
        assert!(ReportStatus::Approved.is_public());
        assert!(ReportStatus::Resolved.is_public());
        assert!(!ReportStatus::Pending.is_public());
        assert!(!ReportStatus::Rejected.is_public());
    }

    #[test]
    fn test_decision_only_accepts_moderation_targets() {
        assert_eq!(
            ModerationDecision::from_code("APPROVED"),
            Some(ModerationDecision::Approve)
        );
        assert_eq!(
            ModerationDecision::from_code(" REJECTED "),
            Some(ModerationDecision::Reject)
        );
        assert_eq!(ModerationDecision::from_code("RESOLVED"), None);
        assert_eq!(ModerationDecision::from_code("PENDING"), None);
        assert_eq!(ModerationDecision::from_code("nope"), None);
    }

    #[test]
    fn test_serde_uses_codes() {
        let json = serde_json::to_string(&ReportStatus::Resolved).unwrap();
        assert_eq!(json, "\"RESOLVED\"");
    }
}
