//! Runs quick actions against external collaborators.
//!
//! One attempt on one setting goes through these steps:
//!
//! 1. Load the setting. A missing setting is skipped and not counted.
//! 2. Ask the gate. On denial nothing external happens; a not-applicable
//!    record gets a diagnostic note.
//! 3. `begin` the record and persist it, so a crash mid-call leaves a
//!    visible in-progress record.
//! 4. Perform the kind's single external effect.
//! 5. `succeed` or `fail` the record and persist it on both paths. If that
//!    write fails the attempt is reported failed, matching the store.
//!
//! Attempts on the same `(setting, kind)` pair are serialized by an
//! in-process lock, and every persist rewrites only that one record
//! through [`RecordStore::update_quick_action`]. That write goes through
//! the same atomic path as setting patches, so a kind deactivated mid-run
//! stays `not-applicable`.

use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::collab::{CollabError, IdentityProvider, Messenger, OktaGroups, PasswordSource};
use crate::employee::Employee;
use crate::gate::{may_execute, ExecMode};
use crate::notice::Notice;
use crate::quick_action::QuickAction;
use crate::setting::Setting;
use crate::store::RecordStore;
use crate::types::{ActionKind, ActionStatus};

/// Diagnostic stored on a not-applicable record that was triggered anyway.
pub const NOT_APPLICABLE_NOTE: &str = "Action not applicable for this setting";

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No such setting.
    Skipped,
    /// The gate refused; no external call was made.
    Denied {
        user_name: String,
        status: ActionStatus,
    },
    Succeeded {
        user_name: String,
    },
    Failed {
        user_name: String,
        error: String,
    },
}

/// Aggregate result of [`Executor::execute_many`]. `failed` holds the user
/// names of denied and failed settings in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    pub failed: Vec<String>,
    pub failed_count: usize,
    pub success_count: usize,
}

// ---------------------------------------------------------------------------
// Record locks
// ---------------------------------------------------------------------------

#[derive(Default)]
struct RecordLocks {
    inner: Mutex<HashMap<(String, ActionKind), Arc<Mutex<()>>>>,
}

impl RecordLocks {
    fn for_record(&self, id: &str, kind: ActionKind) -> Arc<Mutex<()>> {
        let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        map.entry((id.to_string(), kind)).or_default().clone()
    }

    /// Drop the entry once no attempt holds it.
    fn release(&self, id: &str, kind: ActionKind) {
        let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let key = (id.to_string(), kind);
        if map.get(&key).is_some_and(|l| Arc::strong_count(l) == 1) {
            map.remove(&key);
        }
    }
}

// ---------------------------------------------------------------------------
// Executor
// ---------------------------------------------------------------------------

pub struct Executor {
    store: Arc<dyn RecordStore>,
    identity: Arc<dyn IdentityProvider>,
    messenger: Arc<dyn Messenger>,
    passwords: Arc<dyn PasswordSource>,
    groups: OktaGroups,
    locks: RecordLocks,
}

impl Executor {
    pub fn new(
        store: Arc<dyn RecordStore>,
        identity: Arc<dyn IdentityProvider>,
        messenger: Arc<dyn Messenger>,
        passwords: Arc<dyn PasswordSource>,
        groups: OktaGroups,
    ) -> Self {
        Self {
            store,
            identity,
            messenger,
            passwords,
            groups,
            locks: RecordLocks::default(),
        }
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Run `kind` on every id. Mode is single iff exactly one id was given.
    /// One id's failure never stops the rest.
    pub fn execute_many(&self, ids: &[String], kind: ActionKind, actor: &str) -> BatchOutcome {
        let mode = ExecMode::for_batch(ids.len());
        let mut batch = BatchOutcome::default();

        for id in ids {
            match self.execute(id, kind, actor, mode) {
                Outcome::Skipped => {}
                Outcome::Succeeded { .. } => batch.success_count += 1,
                Outcome::Denied { user_name, .. } | Outcome::Failed { user_name, .. } => {
                    batch.failed.push(user_name);
                }
            }
        }
        batch.failed_count = batch.failed.len();

        tracing::info!(
            kind = %kind,
            %mode,
            requested = ids.len(),
            success = batch.success_count,
            failed = batch.failed_count,
            "quick action batch finished"
        );
        batch
    }

    /// Run `kind` on one setting. Never returns an error; every failure is
    /// captured in the outcome and on the stored record.
    pub fn execute(&self, id: &str, kind: ActionKind, actor: &str, mode: ExecMode) -> Outcome {
        let lock = self.locks.for_record(id, kind);
        let outcome = {
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            self.attempt(id, kind, actor, mode)
        };
        drop(lock);
        self.locks.release(id, kind);
        outcome
    }

    fn attempt(&self, id: &str, kind: ActionKind, actor: &str, mode: ExecMode) -> Outcome {
        let setting = match self.store.get_setting(id) {
            Ok(Some(s)) => s,
            Ok(None) => {
                tracing::debug!(setting_id = %id, kind = %kind, "setting not found, skipped");
                return Outcome::Skipped;
            }
            Err(e) => {
                tracing::error!(setting_id = %id, kind = %kind, error = %e, "failed to load setting");
                return Outcome::Failed {
                    user_name: id.to_string(),
                    error: e.to_string(),
                };
            }
        };
        let user_name = setting.user_name.clone();
        let mut record = setting.quick_actions.get(kind).clone();

        // Gate
        let status = record.status();
        if !may_execute(status, mode) {
            if status == ActionStatus::NotApplicable {
                record.note(NOT_APPLICABLE_NOTE);
                // Diagnostic only; the attempt is denied either way.
                let _ = self.try_persist(id, &record);
            }
            tracing::info!(setting_id = %id, kind = %kind, %status, %mode, "quick action denied");
            return Outcome::Denied { user_name, status };
        }

        // Visible in-progress state before any external call
        record.begin(actor, Utc::now());
        if let Err(e) = self.try_persist(id, &record) {
            return Outcome::Failed {
                user_name,
                error: e,
            };
        }

        let result = self.perform(kind, &setting);
        match &result {
            Ok(()) => record.succeed(),
            Err(e) => record.fail(e.0.clone()),
        }
        if let Err(e) = self.try_persist(id, &record) {
            return Outcome::Failed {
                user_name,
                error: e,
            };
        }

        match result {
            Ok(()) => {
                tracing::info!(setting_id = %id, kind = %kind, actor, "quick action done");
                Outcome::Succeeded { user_name }
            }
            Err(e) => {
                tracing::warn!(setting_id = %id, kind = %kind, actor, error = %e, "quick action failed");
                Outcome::Failed {
                    user_name,
                    error: e.0,
                }
            }
        }
    }

    /// The kind's external effect. Group and account kinds touch only the
    /// identity provider; notice kinds touch only the messenger.
    fn perform(&self, kind: ActionKind, setting: &Setting) -> Result<(), CollabError> {
        let employee = self.employee_for(setting)?;

        match kind {
            ActionKind::OktaSetting => {
                let user_id = employee.okta_id().map_err(CollabError)?;
                self.identity
                    .add_to_group(&self.groups.all_setting, user_id)?;
                self.identity
                    .reset_password(user_id, &self.passwords.current_password())
            }
            ActionKind::WinSetting => {
                let user_id = employee.okta_id().map_err(CollabError)?;
                self.identity
                    .add_to_group(&self.groups.win_setting, user_id)
            }
            ActionKind::O365Intune => {
                let user_id = employee.okta_id().map_err(CollabError)?;
                self.identity
                    .add_to_group(&self.groups.o365_intune, user_id)
            }
            ActionKind::OktaActivate => {
                let user_id = employee.okta_id().map_err(CollabError)?;
                self.identity.activate(user_id)
            }
            ActionKind::PasswordNotice => {
                let handle = employee.slack_handle().map_err(CollabError)?;
                let notice =
                    Notice::password_notice(&employee.name, &self.passwords.current_password());
                self.messenger.send_direct_message(handle, &notice)
            }
            ActionKind::PickupNotice => {
                let handle = employee.slack_handle().map_err(CollabError)?;
                self.messenger
                    .send_direct_message(handle, &Notice::pickup_notice())?;
                self.messenger
                    .send_direct_message(handle, &Notice::pickup_button())
            }
        }
    }

    fn employee_for(&self, setting: &Setting) -> Result<Employee, CollabError> {
        match self.store.get_employee(&setting.user_email) {
            Ok(Some(e)) => Ok(e),
            Ok(None) => Err(CollabError::new("User not found")),
            Err(e) => Err(CollabError(e.to_string())),
        }
    }

    fn try_persist(&self, id: &str, record: &QuickAction) -> Result<(), String> {
        match self.store.update_quick_action(id, record) {
            Ok(true) => Ok(()),
            Ok(false) => Err(format!("setting {id} disappeared during execution")),
            Err(e) => Err(e.to_string()),
        }
        .inspect_err(|e| {
            tracing::error!(setting_id = %id, kind = %record.action(), error = %e, "failed to persist quick action");
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
