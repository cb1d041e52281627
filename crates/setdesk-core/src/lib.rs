//! Onboarding quick-action workflow engine.
//!
//! A [`Setting`] is one device being prepared for one user. Each setting
//! carries one [`QuickAction`] per [`ActionKind`]; which kinds apply is
//! decided by [`catalog::active_kinds`], whether one may run is decided by
//! [`gate::may_execute`], and [`Executor`] runs them against the
//! collaborators in [`collab`].

pub mod catalog;
pub mod collab;
pub mod computer;
pub mod config;
pub mod db;
pub mod employee;
pub mod error;
pub mod executor;
pub mod gate;
pub mod notice;
pub mod password;
pub mod quick_action;
pub mod setting;
pub mod store;
pub mod sync;
pub mod types;

#[cfg(any(test, feature = "testkit"))]
pub mod testing;

pub use error::{Result, SetdeskError};
pub use executor::{BatchOutcome, Executor, Outcome};
pub use quick_action::{QuickAction, QuickActions};
pub use setting::Setting;
pub use store::{MemoryStore, RecordStore};
pub use types::{ActionKind, ActionStatus, OnboardingType};
