//! Address and ENS name validation (EIP-55)

use alloy_primitives::Address;

/// Canonical all-zero address, used when a name resolves to nothing
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Check a `0x`-prefixed hex address. Mixed-case input must carry a valid
/// EIP-55 checksum; all-lower and all-upper payloads are accepted as is.
pub fn is_valid_address(text: &str) -> bool {
    let Some(payload) = text.strip_prefix("0x") else {
        return false;
    };
    if payload.len() != 40 || !payload.chars().all(|c| c.is_ascii_hexdigit()) {
        return false;
    }

    if payload == payload.to_ascii_lowercase() || payload == payload.to_ascii_uppercase() {
        return true;
    }

    text.parse::<Address>().is_ok_and(|address| address.to_checksum(None) == text)
}

/// Check a human readable name such as `vitalik.eth`
pub fn is_valid_domain(text: &str) -> bool {
    let name = text.trim().to_ascii_lowercase();
    if name.is_empty() || name.len() > 253 {
        return false;
    }

    let labels: Vec<&str> = name.split('.').collect();
    let Some((tld, rest)) = labels.split_last() else {
        return false;
    };
    if rest.is_empty() {
        return false;
    }

    tld.len() >= 2
        && tld.chars().all(|c| c.is_ascii_alphabetic())
        && rest.iter().all(|l| is_valid_label(l))
}

/// Parse an address string once it passes validation
pub fn parse_address(text: &str) -> Option<Address> {
    if !is_valid_address(text) {
        return None;
    }
    text.parse::<Address>().ok()
}

fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}
