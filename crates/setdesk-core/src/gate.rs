use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::ActionStatus;

// ---------------------------------------------------------------------------
// ExecMode
// ---------------------------------------------------------------------------

/// Whether a trigger targets one setting or many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecMode {
    Single,
    Bulk,
}

impl ExecMode {
    /// `Single` iff exactly one target was submitted.
    pub fn for_batch(len: usize) -> Self {
        if len == 1 {
            ExecMode::Single
        } else {
            ExecMode::Bulk
        }
    }
}

impl fmt::Display for ExecMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExecMode::Single => "single",
            ExecMode::Bulk => "bulk",
        })
    }
}

// ---------------------------------------------------------------------------
// Gate
// ---------------------------------------------------------------------------

const SINGLE_EXECUTABLE: &[ActionStatus] = &[
    ActionStatus::Pending,
    ActionStatus::InProgress,
    ActionStatus::Done,
    ActionStatus::Error,
];

/// Bulk runs never re-execute completed actions.
const BULK_EXECUTABLE: &[ActionStatus] = &[
    ActionStatus::Pending,
    ActionStatus::InProgress,
    ActionStatus::Error,
];

/// Can an action in `status` run under `mode`?
pub fn may_execute(status: ActionStatus, mode: ExecMode) -> bool {
    match mode {
        ExecMode::Single => SINGLE_EXECUTABLE.contains(&status),
        ExecMode::Bulk => BULK_EXECUTABLE.contains(&status),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ActionStatus; 5] = [
        ActionStatus::NotApplicable,
        ActionStatus::Pending,
        ActionStatus::InProgress,
        ActionStatus::Done,
        ActionStatus::Error,
    ];

    #[test]
    fn done_only_reruns_in_single_mode() {
        assert!(may_execute(ActionStatus::Done, ExecMode::Single));
        assert!(!may_execute(ActionStatus::Done, ExecMode::Bulk));
    }

    #[test]
    fn not_applicable_never_runs() {
        assert!(!may_execute(ActionStatus::NotApplicable, ExecMode::Single));
        assert!(!may_execute(ActionStatus::NotApplicable, ExecMode::Bulk));
    }

    #[test]
    fn retryable_statuses_run_in_both_modes() {
        for status in [ActionStatus::Pending, ActionStatus::InProgress, ActionStatus::Error] {
            assert!(may_execute(status, ExecMode::Single), "{status}");
            assert!(may_execute(status, ExecMode::Bulk), "{status}");
        }
    }

    #[test]
    fn single_allows_everything_but_not_applicable() {
        for status in ALL {
            assert_eq!(
                may_execute(status, ExecMode::Single),
                status != ActionStatus::NotApplicable
            );
        }
    }

    #[test]
    fn mode_follows_batch_size() {
        assert_eq!(ExecMode::for_batch(1), ExecMode::Single);
        assert_eq!(ExecMode::for_batch(0), ExecMode::Bulk);
        assert_eq!(ExecMode::for_batch(3), ExecMode::Bulk);
    }
}
