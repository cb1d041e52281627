//! Per-setting quick action records and their regeneration.
//!
//! A setting always carries exactly one [`QuickAction`] per [`ActionKind`].
//! Internally the collection is a map keyed by kind; on the wire it is a
//! list in catalog order.
//!
//! The requester and request time are held together in one
//! [`Requested`] value, so a record can never have one without the other.
//! All mutation goes through the `begin` / `succeed` / `fail` / `note`
//! methods.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::active_kinds;
use crate::types::{ActionKind, ActionStatus, OnboardingType};

// ---------------------------------------------------------------------------
// Requested
// ---------------------------------------------------------------------------

/// Who last triggered an action, and when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requested {
    pub by: String,
    pub at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// QuickAction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "QuickActionWire", into = "QuickActionWire")]
pub struct QuickAction {
    action: ActionKind,
    status: ActionStatus,
    requested: Option<Requested>,
    error_message: Option<String>,
}

impl QuickAction {
    /// A record that has never been triggered.
    pub fn untouched(action: ActionKind, status: ActionStatus) -> Self {
        Self {
            action,
            status,
            requested: None,
            error_message: None,
        }
    }

    /// Rebuild a record from history. Status is derived, never carried.
    fn carried(action: ActionKind, active: bool, previous: Option<&QuickAction>) -> Self {
        let requested = previous.and_then(|p| p.requested.clone());
        let error_message = previous.and_then(|p| p.error_message.clone());

        let status = if !active {
            ActionStatus::NotApplicable
        } else {
            match (&requested, &error_message) {
                (Some(_), Some(_)) => ActionStatus::Error,
                (Some(_), None) => ActionStatus::Done,
                (None, _) => ActionStatus::Pending,
            }
        };

        Self {
            action,
            status,
            requested,
            error_message,
        }
    }

    pub fn action(&self) -> ActionKind {
        self.action
    }

    pub fn status(&self) -> ActionStatus {
        self.status
    }

    pub fn requested(&self) -> Option<&Requested> {
        self.requested.as_ref()
    }

    pub fn requested_by(&self) -> Option<&str> {
        self.requested.as_ref().map(|r| r.by.as_str())
    }

    pub fn requested_at(&self) -> Option<DateTime<Utc>> {
        self.requested.as_ref().map(|r| r.at)
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Start an attempt: record the actor and time, move to in-progress,
    /// clear the previous error.
    pub fn begin(&mut self, actor: impl Into<String>, at: DateTime<Utc>) {
        self.requested = Some(Requested {
            by: actor.into(),
            at,
        });
        self.status = ActionStatus::InProgress;
        self.error_message = None;
    }

    pub fn succeed(&mut self) {
        self.status = ActionStatus::Done;
        self.error_message = None;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = ActionStatus::Error;
        self.error_message = Some(message.into());
    }

    /// Attach a diagnostic without touching status or requester.
    pub fn note(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
    }

    /// Mark the kind inactive for its setting, keeping history so a later
    /// reactivation can restore the derived status.
    pub(crate) fn deactivate(&mut self) {
        self.status = ActionStatus::NotApplicable;
    }
}

/// Storage and API shape of a [`QuickAction`].
///
/// Empty strings count as absent, and a half-present requester pair is
/// dropped entirely on the way in. A record claiming to have run without a
/// requester is loaded as `pending`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct QuickActionWire {
    action: ActionKind,
    status: ActionStatus,
    #[serde(default)]
    requested_by: Option<String>,
    #[serde(default)]
    requested_at: Option<DateTime<Utc>>,
    #[serde(default)]
    error_message: Option<String>,
}

impl From<QuickActionWire> for QuickAction {
    fn from(w: QuickActionWire) -> Self {
        let by = w.requested_by.filter(|s| !s.is_empty());
        let requested = match (by, w.requested_at) {
            (Some(by), Some(at)) => Some(Requested { by, at }),
            _ => None,
        };
        let status = match w.status {
            ActionStatus::Done | ActionStatus::InProgress | ActionStatus::Error
                if requested.is_none() =>
            {
                ActionStatus::Pending
            }
            status => status,
        };
        Self {
            action: w.action,
            status,
            requested,
            error_message: w.error_message.filter(|s| !s.is_empty()),
        }
    }
}

impl From<QuickAction> for QuickActionWire {
    fn from(q: QuickAction) -> Self {
        let (requested_by, requested_at) = match q.requested {
            Some(r) => (Some(r.by), Some(r.at)),
            None => (None, None),
        };
        Self {
            action: q.action,
            status: q.status,
            requested_by,
            requested_at,
            error_message: q.error_message,
        }
    }
}

// ---------------------------------------------------------------------------
// QuickActions
// ---------------------------------------------------------------------------

/// The complete quick action set of one setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<QuickAction>", into = "Vec<QuickAction>")]
pub struct QuickActions {
    by_kind: BTreeMap<ActionKind, QuickAction>,
}

impl QuickActions {
    /// Fresh set for a newly created setting.
    pub fn generate(onboarding: OnboardingType, os: &str) -> Self {
        Self::regenerate(onboarding, os, None)
    }

    /// Recompute every status for the given classification, keeping the
    /// requester, time and error of each kind from `previous`.
    pub fn regenerate(
        onboarding: OnboardingType,
        os: &str,
        previous: Option<&QuickActions>,
    ) -> Self {
        let active = active_kinds(onboarding, os);
        let by_kind = ActionKind::all()
            .iter()
            .map(|&kind| {
                let prev = previous.map(|p| p.get(kind));
                (kind, QuickAction::carried(kind, active.contains(&kind), prev))
            })
            .collect();
        Self { by_kind }
    }

    pub fn get(&self, kind: ActionKind) -> &QuickAction {
        // by_kind is total over the catalog; see `From<Vec<QuickAction>>`.
        &self.by_kind[&kind]
    }

    pub fn get_mut(&mut self, kind: ActionKind) -> &mut QuickAction {
        self.by_kind
            .entry(kind)
            .or_insert_with(|| QuickAction::untouched(kind, ActionStatus::NotApplicable))
    }

    /// Overwrite the record of `action.action()`.
    pub fn replace(&mut self, action: QuickAction) {
        self.by_kind.insert(action.action, action);
    }

    /// Records in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &QuickAction> {
        self.by_kind.values()
    }

    pub fn into_vec(self) -> Vec<QuickAction> {
        self.by_kind.into_values().collect()
    }
}

impl From<Vec<QuickAction>> for QuickActions {
    fn from(list: Vec<QuickAction>) -> Self {
        let mut by_kind: BTreeMap<ActionKind, QuickAction> =
            list.into_iter().map(|q| (q.action, q)).collect();
        for &kind in ActionKind::all() {
            by_kind
                .entry(kind)
                .or_insert_with(|| QuickAction::untouched(kind, ActionStatus::NotApplicable));
        }
        Self { by_kind }
    }
}

impl From<QuickActions> for Vec<QuickAction> {
    fn from(q: QuickActions) -> Self {
        q.into_vec()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
