//! Cache key construction (spec §4.2): `mcp:<namespace>:<identifier>`.
//! Identifiers for `embeddings`/`search` are truncated SHA-256 of the input.

use recall_core::constants::CACHE_KEY_PREFIX;
use sha2::{Digest, Sha256};

/// Truncated (16 byte / 32 hex char) SHA-256 identifier for a cache input.
pub fn hash_identifier(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    hex::encode(&digest[..16])
}

/// Build a namespaced key: `mcp:<namespace>:<identifier>`.
pub fn namespaced_key(namespace: &str, identifier: &str) -> String {
    format!("{CACHE_KEY_PREFIX}:{namespace}:{identifier}")
}

/// Prefix shared by every key in a namespace, used for bulk invalidation.
pub fn namespace_prefix(namespace: &str) -> String {
    format!("{CACHE_KEY_PREFIX}:{namespace}:")
}

mod hex {
    pub fn encode(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_input_hashes_identically() {
        assert_eq!(hash_identifier("hello"), hash_identifier("hello"));
    }

    #[test]
    fn namespaced_key_has_expected_shape() {
        assert_eq!(namespaced_key("search", "abc"), "mcp:search:abc");
    }
}
