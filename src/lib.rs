//! Contract interaction wizard for a wallet front-end
//!
//! The [`modules::interact`] state machine owns one session's record and
//! talks to the outside world only through the collaborator traits in
//! [`store`] and [`infrastructure`].

pub mod config;
pub mod core;
pub mod domain;
pub mod infrastructure;
pub mod modules;
pub mod store;
