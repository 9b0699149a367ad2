//! Feature modules
//!
//! - interact: the interact-with-contracts wizard and its state machine
//! - dashboard: token totals and balance scanning

pub mod dashboard;
pub mod interact;
