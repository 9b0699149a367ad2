//! Cross-cutting pieces: errors, translation and navigation

pub mod error;
pub mod i18n;
pub mod navigation;

pub use error::{InteractError, InteractResult, ValidationError};
pub use i18n::{Catalog, Translator};
pub use navigation::{Navigator, Route};
