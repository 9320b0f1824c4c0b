//! Type schema registry for EIP-712 structured data.
//!
//! Schemas are fixed inputs built once before signing begins, not
//! runtime-discovered. Field order is significant: it determines both the
//! canonical type signature and the byte layout of the encoded data.

use std::collections::BTreeMap;

use crate::{Error, Result};

/// A single field of a structured type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Field name as it appears in the type signature.
    pub name: String,
    /// Field type: a primitive type name (`address`, `bool`, `string`,
    /// `bytes`, `bytesN`, `uintN`, `intN`), a registered struct type name,
    /// or an array suffix (`T[]` / `T[k]`) of any of these.
    pub field_type: String,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
        }
    }
}

/// Registry mapping type names to their ordered field lists.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: BTreeMap<String, Vec<FieldDef>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type with its ordered field list.
    ///
    /// Registering the same name again replaces the previous definition.
    pub fn register(&mut self, name: impl Into<String>, fields: Vec<FieldDef>) {
        self.types.insert(name.into(), fields);
    }

    /// Look up the ordered field list for a type.
    pub fn resolve(&self, name: &str) -> Result<&[FieldDef]> {
        self.types
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::UnknownType {
                name: name.to_string(),
            })
    }

    /// Whether a struct type with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }
}
