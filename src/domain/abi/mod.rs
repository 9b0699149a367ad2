//! ABI text handling and function call encoding
//!
//! ABI text is kept as the user typed it (or as the explorer returned it);
//! it is only parsed when the interaction form is generated or a call is
//! submitted.

mod codec;

use alloy_json_abi::{Function, JsonAbi, StateMutability};
use anyhow::{Context, Result};

pub use codec::{AbiFunctionCall, DecodedArg};

/// True when `text` is syntactically valid JSON
pub fn is_valid_abi_json(text: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(text).is_ok()
}

/// Parse ABI text into a structured ABI
pub fn parse_abi(text: &str) -> Result<JsonAbi> {
    serde_json::from_str::<JsonAbi>(text).context("Failed to parse contract ABI")
}

pub fn is_read_only(function: &Function) -> bool {
    matches!(
        function.state_mutability,
        StateMutability::View | StateMutability::Pure
    )
}

/// Functions that can be queried with a plain call, sorted by name
pub fn read_functions(abi: &JsonAbi) -> Vec<&Function> {
    abi.functions().filter(|f| is_read_only(f)).collect()
}

/// Functions that need a signed transaction, sorted by name
pub fn write_functions(abi: &JsonAbi) -> Vec<&Function> {
    abi.functions().filter(|f| !is_read_only(f)).collect()
}

#[cfg(test)]
pub(crate) const ERC20_ABI: &str = r#"[
    {"type":"function","name":"balanceOf","stateMutability":"view",
     "inputs":[{"name":"owner","type":"address"}],
     "outputs":[{"name":"","type":"uint256"}]},
    {"type":"function","name":"symbol","stateMutability":"view",
     "inputs":[],"outputs":[{"name":"","type":"string"}]},
    {"type":"function","name":"transfer","stateMutability":"nonpayable",
     "inputs":[{"name":"to","type":"address"},{"name":"amount","type":"uint256"}],
     "outputs":[{"name":"","type":"bool"}]}
]"#;
