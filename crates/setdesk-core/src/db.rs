//! Persistent [`RecordStore`] backed by redb.
//!
//! # Table design
//!
//! One table per record type, each keyed by the record's natural key and
//! holding the JSON-encoded record:
//! ```text
//! settings   id     -> Setting
//! employees  email  -> Employee
//! computers  serial -> Computer
//! ```
//!
//! [`RecordStore::modify_setting`] reads, modifies and rewrites a setting
//! inside one write transaction. Quick-action writes and bulk patches both
//! go through it, so they never overwrite each other.

use std::path::Path;

use redb::{Database, ReadableTable, TableDefinition};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::computer::Computer;
use crate::employee::Employee;
use crate::error::{Result, SetdeskError};
use crate::setting::Setting;
use crate::store::RecordStore;

// ---------------------------------------------------------------------------
// Table definitions
// ---------------------------------------------------------------------------

const SETTINGS: TableDefinition<&str, &[u8]> = TableDefinition::new("settings");
const EMPLOYEES: TableDefinition<&str, &[u8]> = TableDefinition::new("employees");
const COMPUTERS: TableDefinition<&str, &[u8]> = TableDefinition::new("computers");

fn db_err(e: impl std::fmt::Display) -> SetdeskError {
    SetdeskError::Store(e.to_string())
}

// ---------------------------------------------------------------------------
// RedbStore
// ---------------------------------------------------------------------------

pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Open or create the database at `path`, creating all tables.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let db = Database::create(path).map_err(db_err)?;
        let wt = db.begin_write().map_err(db_err)?;
        for table in [SETTINGS, EMPLOYEES, COMPUTERS] {
            wt.open_table(table).map_err(db_err)?;
        }
        wt.commit().map_err(db_err)?;
        Ok(Self { db })
    }

    fn get<T: DeserializeOwned>(
        &self,
        table: TableDefinition<&str, &[u8]>,
        key: &str,
    ) -> Result<Option<T>> {
        let rt = self.db.begin_read().map_err(db_err)?;
        let table = rt.open_table(table).map_err(db_err)?;
        match table.get(key).map_err(db_err)? {
            Some(v) => Ok(Some(serde_json::from_slice(v.value())?)),
            None => Ok(None),
        }
    }

    fn put<T: Serialize>(
        &self,
        table: TableDefinition<&str, &[u8]>,
        key: &str,
        record: &T,
    ) -> Result<()> {
        let value = serde_json::to_vec(record)?;
        let wt = self.db.begin_write().map_err(db_err)?;
        {
            let mut table = wt.open_table(table).map_err(db_err)?;
            table.insert(key, value.as_slice()).map_err(db_err)?;
        }
        wt.commit().map_err(db_err)?;
        Ok(())
    }

    fn list<T: DeserializeOwned>(&self, table: TableDefinition<&str, &[u8]>) -> Result<Vec<T>> {
        let rt = self.db.begin_read().map_err(db_err)?;
        let table = rt.open_table(table).map_err(db_err)?;

        let mut result = Vec::new();
        for entry in table.iter().map_err(db_err)? {
            let (_, v) = entry.map_err(db_err)?;
            result.push(serde_json::from_slice(v.value())?);
        }
        Ok(result)
    }
}

impl RecordStore for RedbStore {
    fn get_setting(&self, id: &str) -> Result<Option<Setting>> {
        self.get(SETTINGS, id)
    }

    fn put_setting(&self, setting: &Setting) -> Result<()> {
        self.put(SETTINGS, &setting.id, setting)
    }

    fn list_settings(&self) -> Result<Vec<Setting>> {
        let mut all: Vec<Setting> = self.list(SETTINGS)?;
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(all)
    }

    fn delete_setting(&self, id: &str) -> Result<bool> {
        let wt = self.db.begin_write().map_err(db_err)?;
        let existed = {
            let mut table = wt.open_table(SETTINGS).map_err(db_err)?;
            let removed = table.remove(id).map_err(db_err)?;
            removed.is_some()
        };
        wt.commit().map_err(db_err)?;
        Ok(existed)
    }

    fn modify_setting(&self, id: &str, f: &mut dyn FnMut(&mut Setting)) -> Result<bool> {
        let wt = self.db.begin_write().map_err(db_err)?;
        {
            let mut table = wt.open_table(SETTINGS).map_err(db_err)?;
            let current = match table.get(id).map_err(db_err)? {
                Some(v) => v.value().to_vec(),
                None => return Ok(false),
            };
            let mut setting: Setting = serde_json::from_slice(&current)?;
            f(&mut setting);
            let value = serde_json::to_vec(&setting)?;
            table.insert(id, value.as_slice()).map_err(db_err)?;
        }
        wt.commit().map_err(db_err)?;
        Ok(true)
    }

    fn get_employee(&self, email: &str) -> Result<Option<Employee>> {
        self.get(EMPLOYEES, email)
    }

    fn put_employee(&self, employee: &Employee) -> Result<()> {
        self.put(EMPLOYEES, &employee.email, employee)
    }

    fn list_employees(&self) -> Result<Vec<Employee>> {
        self.list(EMPLOYEES)
    }

    fn get_computer(&self, serial: &str) -> Result<Option<Computer>> {
        self.get(COMPUTERS, serial)
    }

    fn put_computer(&self, computer: &Computer) -> Result<()> {
        self.put(COMPUTERS, &computer.serial, computer)
    }

    fn list_computers(&self) -> Result<Vec<Computer>> {
        self.list(COMPUTERS)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
