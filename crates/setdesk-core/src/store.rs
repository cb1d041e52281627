//! Record storage for settings, employees and inventory computers.
//!
//! [`RecordStore`] is object safe and shared as `Arc<dyn RecordStore>`.
//! Two backends: [`MemoryStore`] for tests and development, and
//! [`crate::db::RedbStore`] for a local embedded database.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::computer::Computer;
use crate::employee::Employee;
use crate::error::{Result, SetdeskError};
use crate::quick_action::QuickAction;
use crate::setting::Setting;

pub trait RecordStore: Send + Sync {
    // === Settings ===

    fn get_setting(&self, id: &str) -> Result<Option<Setting>>;

    /// Insert or replace a setting by id.
    fn put_setting(&self, setting: &Setting) -> Result<()>;

    /// All settings, oldest first.
    fn list_settings(&self) -> Result<Vec<Setting>>;

    /// Returns `false` if no such setting existed.
    fn delete_setting(&self, id: &str) -> Result<bool>;

    /// Read, modify and write back the setting `id` as one atomic step.
    /// Returns `false` (without calling `f`) if the setting does not exist.
    ///
    /// Every change to a stored setting's quick actions goes through here,
    /// so regeneration and action runs never overwrite each other.
    fn modify_setting(&self, id: &str, f: &mut dyn FnMut(&mut Setting)) -> Result<bool>;

    /// Replace the one quick action of kind `action.action()` inside the
    /// setting `id`, leaving every other field as stored. A kind that is
    /// inactive for the stored classification stays `not-applicable`.
    /// Returns `false` if the setting does not exist.
    fn update_quick_action(&self, id: &str, action: &QuickAction) -> Result<bool> {
        self.modify_setting(id, &mut |setting| {
            setting.record_quick_action(action.clone())
        })
    }

    // === Employees ===

    fn get_employee(&self, email: &str) -> Result<Option<Employee>>;

    fn put_employee(&self, employee: &Employee) -> Result<()>;

    fn list_employees(&self) -> Result<Vec<Employee>>;

    // === Computers ===

    fn get_computer(&self, serial: &str) -> Result<Option<Computer>>;

    fn put_computer(&self, computer: &Computer) -> Result<()>;

    fn list_computers(&self) -> Result<Vec<Computer>>;
}

fn poisoned<T>(e: std::sync::PoisonError<T>) -> SetdeskError {
    SetdeskError::Store(format!("lock poisoned: {e}"))
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryStore {
    settings: RwLock<HashMap<String, Setting>>,
    employees: RwLock<HashMap<String, Employee>>,
    computers: RwLock<HashMap<String, Computer>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn get_setting(&self, id: &str) -> Result<Option<Setting>> {
        let guard = self.settings.read().map_err(poisoned)?;
        Ok(guard.get(id).cloned())
    }

    fn put_setting(&self, setting: &Setting) -> Result<()> {
        let mut guard = self.settings.write().map_err(poisoned)?;
        guard.insert(setting.id.clone(), setting.clone());
        Ok(())
    }

    fn list_settings(&self) -> Result<Vec<Setting>> {
        let guard = self.settings.read().map_err(poisoned)?;
        let mut all: Vec<Setting> = guard.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(all)
    }

    fn delete_setting(&self, id: &str) -> Result<bool> {
        let mut guard = self.settings.write().map_err(poisoned)?;
        Ok(guard.remove(id).is_some())
    }

    fn modify_setting(&self, id: &str, f: &mut dyn FnMut(&mut Setting)) -> Result<bool> {
        let mut guard = self.settings.write().map_err(poisoned)?;
        match guard.get_mut(id) {
            Some(setting) => {
                f(setting);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn get_employee(&self, email: &str) -> Result<Option<Employee>> {
        let guard = self.employees.read().map_err(poisoned)?;
        Ok(guard.get(email).cloned())
    }

    fn put_employee(&self, employee: &Employee) -> Result<()> {
        let mut guard = self.employees.write().map_err(poisoned)?;
        guard.insert(employee.email.clone(), employee.clone());
        Ok(())
    }

    fn list_employees(&self) -> Result<Vec<Employee>> {
        let guard = self.employees.read().map_err(poisoned)?;
        let mut all: Vec<Employee> = guard.values().cloned().collect();
        all.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(all)
    }

    fn get_computer(&self, serial: &str) -> Result<Option<Computer>> {
        let guard = self.computers.read().map_err(poisoned)?;
        Ok(guard.get(serial).cloned())
    }

    fn put_computer(&self, computer: &Computer) -> Result<()> {
        let mut guard = self.computers.write().map_err(poisoned)?;
        guard.insert(computer.serial.clone(), computer.clone());
        Ok(())
    }

    fn list_computers(&self) -> Result<Vec<Computer>> {
        let guard = self.computers.read().map_err(poisoned)?;
        let mut all: Vec<Computer> = guard.values().cloned().collect();
        all.sort_by(|a, b| a.serial.cmp(&b.serial));
        Ok(all)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
