//! Struct hashing and the final typed-data digest.

use alloy_primitives::{keccak256, B256};
use alloy_sol_types::SolValue;

use super::registry::TypeRegistry;
use super::value::Value;
use crate::{Error, Result};

/// Fixed two-byte prefix identifying typed structured data framing.
pub const EIP712_PREFIX: [u8; 2] = [0x19, 0x01];

impl TypeRegistry {
    /// `keccak256(encodeType(name))`.
    pub fn type_hash(&self, name: &str) -> Result<B256> {
        Ok(keccak256(self.encode_type(name)?.as_bytes()))
    }

    /// Compute `keccak256(typeHash || encodeData)` for a struct value.
    ///
    /// Field order comes from the registered schema, never from the value
    /// map, so identical `(type, value, schema)` inputs always produce an
    /// identical hash. Fields present in the value but absent from the
    /// schema are ignored; schema fields missing from the value fail with
    /// `MissingField`.
    pub fn hash_struct(&self, name: &str, value: &Value) -> Result<B256> {
        let map = value.as_struct().ok_or_else(|| Error::TypeMismatch {
            field_type: name.to_string(),
        })?;
        let fields = self.resolve(name)?;

        let mut encoded = Vec::with_capacity(32 * (fields.len() + 1));
        encoded.extend_from_slice(self.type_hash(name)?.as_slice());
        for field in fields {
            let field_value =
                map.get(field.name.as_str())
                    .ok_or_else(|| Error::MissingField {
                        type_name: name.to_string(),
                        field: field.name.clone(),
                    })?;
            encoded.extend_from_slice(
                self.encode_value(&field.field_type, field_value)?.as_slice(),
            );
        }
        Ok(keccak256(&encoded))
    }
}

/// Compose the final signing digest:
/// `keccak256(0x19 || 0x01 || domainSeparator || structHash)`.
pub fn typed_data_digest(domain_separator: B256, struct_hash: B256) -> B256 {
    let data = (EIP712_PREFIX, domain_separator, struct_hash).abi_encode_packed();
    keccak256(&data)
}
