//! EIP-712 domain separator.
//!
//! The domain binds a signature to a protocol deployment so it cannot be
//! replayed against a different contract, chain, or version.

use std::collections::BTreeMap;

use alloy_primitives::{Address, B256, U256};

use crate::typed_data::{FieldDef, TypeRegistry, Value};
use crate::Result;

/// Schema name of the domain type.
pub const DOMAIN_TYPE_NAME: &str = "EIP712Domain";

/// GPv2 settlement contract address (same on every supported chain).
pub const SETTLEMENT_CONTRACT: &str = "0x9008D19f58AAbD9eD0D60971565AA8510560ab41";

/// Chain ID for the Sepolia testnet.
pub const SEPOLIA_CHAIN_ID: u64 = 11155111;

/// EIP-712 domain with the five recognized fields, all optional.
///
/// The `EIP712Domain` schema is synthesized from exactly the fields that
/// are present: an omitted field is excluded from both the schema and the
/// value, not encoded as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Eip712Domain {
    pub name: Option<String>,
    pub version: Option<String>,
    pub chain_id: Option<U256>,
    pub verifying_contract: Option<Address>,
    pub salt: Option<B256>,
}

impl Eip712Domain {
    /// Create the common four-field domain (no salt).
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        chain_id: u64,
        verifying_contract: Address,
    ) -> Self {
        Self {
            name: Some(name.into()),
            version: Some(version.into()),
            chain_id: Some(U256::from(chain_id)),
            verifying_contract: Some(verifying_contract),
            salt: None,
        }
    }

    /// Create the Gnosis Protocol v2 domain for a settlement deployment.
    pub fn gnosis_protocol(chain_id: u64, verifying_contract: Address) -> Self {
        Self::new("Gnosis Protocol", "v2", chain_id, verifying_contract)
    }

    /// The synthesized field list, in the canonical field order.
    pub fn fields(&self) -> Vec<FieldDef> {
        let mut fields = Vec::with_capacity(5);
        if self.name.is_some() {
            fields.push(FieldDef::new("name", "string"));
        }
        if self.version.is_some() {
            fields.push(FieldDef::new("version", "string"));
        }
        if self.chain_id.is_some() {
            fields.push(FieldDef::new("chainId", "uint256"));
        }
        if self.verifying_contract.is_some() {
            fields.push(FieldDef::new("verifyingContract", "address"));
        }
        if self.salt.is_some() {
            fields.push(FieldDef::new("salt", "bytes32"));
        }
        fields
    }

    /// The domain as a value map matching [`Self::fields`].
    pub fn to_value(&self) -> Value {
        let mut map = BTreeMap::new();
        if let Some(name) = &self.name {
            map.insert("name".to_string(), Value::from(name.clone()));
        }
        if let Some(version) = &self.version {
            map.insert("version".to_string(), Value::from(version.clone()));
        }
        if let Some(chain_id) = self.chain_id {
            map.insert("chainId".to_string(), Value::from(chain_id));
        }
        if let Some(contract) = self.verifying_contract {
            map.insert("verifyingContract".to_string(), Value::from(contract));
        }
        if let Some(salt) = self.salt {
            map.insert("salt".to_string(), Value::from(salt));
        }
        Value::Struct(map)
    }

    /// Compute the domain separator hash.
    pub fn separator(&self) -> Result<B256> {
        let mut registry = TypeRegistry::new();
        registry.register(DOMAIN_TYPE_NAME, self.fields());
        registry.hash_struct(DOMAIN_TYPE_NAME, &self.to_value())
    }
}
