//! Core domain types and logic.

pub mod transaction;
pub mod ledger;
pub mod registry;
pub mod command;
pub mod report;
pub mod config_validation;
pub mod error;
