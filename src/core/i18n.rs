//! Translation lookup for user-facing strings

use std::collections::BTreeMap;

/// Never fails: unknown keys come back unchanged
pub trait Translator: Send + Sync {
    fn translate(&self, key: &str) -> String;
}

const ENGLISH: &[(&str, &str)] = &[
    ("INTERACT_WITH_CONTRACTS", "Interact with Contracts"),
    ("CONFIRM_TRANSACTION", "Confirm Transaction"),
    ("SIGN_WRITE_TRANSACTION", "Sign write transaction"),
    ("INTERACTION_RECEIPT", "Interaction Receipt"),
    ("CUSTOM_CONTRACT_TITLE", "Custom"),
    ("INTERACT_ERROR_MISSING_DATA", "Please enter a contract address, a name and an ABI."),
    ("INTERACT_ERROR_INVALID_ADDRESS", "Please enter a valid contract address."),
    ("INTERACT_ERROR_INVALID_ABI", "The ABI is not valid JSON."),
    ("INTERACT_ERROR_DUPLICATE_NAME", "A contract with this name already exists."),
    ("INTERACT_ERROR_NO_ACCOUNT", "Please select an account."),
];

/// In-memory string table
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: BTreeMap<String, String>,
}

impl Catalog {
    pub fn english() -> Self {
        Self {
            entries: ENGLISH
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }
}

impl Translator for Catalog {
    fn translate(&self, key: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}
