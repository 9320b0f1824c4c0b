//! Dynamic values for schema-driven encoding.
//!
//! Schemas are runtime data here, so message values are carried in a
//! dynamic enum rather than compile-time struct definitions. The declared
//! schema, not the value variant, is authoritative for how a value is
//! encoded.

use std::collections::BTreeMap;

use alloy_primitives::{Address, B256, I256, U256};

/// A dynamically typed field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Address(Address),
    Bool(bool),
    Uint(U256),
    Int(I256),
    String(String),
    /// Dynamic byte sequence (`bytes`).
    Bytes(Vec<u8>),
    /// Fixed-size byte sequence (`bytesN`); length is validated against the
    /// declared type at encoding time.
    FixedBytes(Vec<u8>),
    Array(Vec<Value>),
    Struct(BTreeMap<String, Value>),
}

impl Value {
    /// View this value as a struct field map.
    pub fn as_struct(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Struct(map) => Some(map),
            _ => None,
        }
    }
}

impl From<Address> for Value {
    fn from(value: Address) -> Self {
        Value::Address(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<U256> for Value {
    fn from(value: U256) -> Self {
        Value::Uint(value)
    }
}

impl From<I256> for Value {
    fn from(value: I256) -> Self {
        Value::Int(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Uint(U256::from(value))
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Uint(U256::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<B256> for Value {
    fn from(value: B256) -> Self {
        Value::FixedBytes(value.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_b256_is_fixed_bytes() {
        let value = Value::from(B256::repeat_byte(0xab));
        match value {
            Value::FixedBytes(bytes) => assert_eq!(bytes.len(), 32),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_as_struct() {
        let mut map = BTreeMap::new();
        map.insert("flag".to_string(), Value::Bool(true));
        let value = Value::Struct(map);

        assert!(value.as_struct().is_some());
        assert!(Value::Bool(false).as_struct().is_none());
    }
}
