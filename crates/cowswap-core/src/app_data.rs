//! App-data document hashing.
//!
//! Orders carry the keccak-256 hash of a small JSON metadata document.
//! The hash is over the exact canonical byte sequence: compact encoding
//! (no whitespace), `version` before `metadata`, and metadata keys in
//! sorted order. Both sides must produce the identical byte sequence for
//! the embedded hash to match.

use alloy_primitives::{keccak256, B256};
use serde::{Deserialize, Serialize};

use crate::Result;

/// Default app-data document version.
pub const DEFAULT_APP_DATA_VERSION: &str = "0.9.0";

/// The out-of-band metadata document whose hash is embedded in the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppData {
    pub version: String,
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl Default for AppData {
    fn default() -> Self {
        Self {
            version: DEFAULT_APP_DATA_VERSION.to_string(),
            metadata: serde_json::Map::new(),
        }
    }
}

impl AppData {
    /// The canonical JSON byte sequence that gets hashed.
    pub fn canonical_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// The `appData` field value: keccak-256 of the canonical JSON.
    pub fn hash(&self) -> Result<B256> {
        Ok(keccak256(self.canonical_json()?.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_json_compact_and_ordered() {
        assert_eq!(
            AppData::default().canonical_json().unwrap(),
            r#"{"version":"0.9.0","metadata":{}}"#
        );
    }

    #[test]
    fn test_default_hash_known_value() {
        assert_eq!(
            AppData::default().hash().unwrap(),
            "c990bae86208bfdfba8879b64ab68da5905e8bb97aa3da5c701ec1183317a6f6"
                .parse::<B256>()
                .unwrap()
        );
    }

    #[test]
    fn test_metadata_keys_sorted() {
        let mut app_data = AppData::default();
        app_data
            .metadata
            .insert("b".to_string(), serde_json::Value::from(2));
        app_data
            .metadata
            .insert("a".to_string(), serde_json::Value::from(1));

        assert_eq!(
            app_data.canonical_json().unwrap(),
            r#"{"version":"0.9.0","metadata":{"a":1,"b":2}}"#
        );
    }

    #[test]
    fn test_metadata_changes_hash() {
        let default_hash = AppData::default().hash().unwrap();

        let mut tagged = AppData::default();
        tagged
            .metadata
            .insert("referrer".to_string(), serde_json::Value::from("0x00"));

        assert_ne!(default_hash, tagged.hash().unwrap());
    }
}
