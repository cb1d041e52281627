pub mod action;
pub mod catalog;
pub mod config;
pub mod import;
pub mod serve;
pub mod setting;
pub mod sync;
