//! Runtime infrastructure - Tokio task helpers

mod debounce;

pub use debounce::Debouncer;
