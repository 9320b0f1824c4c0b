//! Canonical type signatures and field-value encoding.
//!
//! Implements the EIP-712 `encodeType` / `encodeData` rules: every field
//! encodes to exactly 32 bytes, dynamic data is hashed in place, and
//! nested structs contribute their struct hash rather than an inline
//! encoding.

use std::collections::BTreeSet;

use alloy_primitives::{keccak256, B256, I256};

use super::registry::TypeRegistry;
use super::value::Value;
use crate::{Error, Result};

/// A parsed field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldType<'a> {
    Address,
    Bool,
    String,
    Bytes,
    /// `bytesN`, N in 1..=32.
    FixedBytes(usize),
    /// `uintN`, N in 8..=256 step 8.
    Uint(usize),
    /// `intN`, N in 8..=256 step 8.
    Int(usize),
    /// `T[]` or `T[k]`.
    Array { elem: &'a str, len: Option<usize> },
    /// A registered struct type.
    Struct(&'a str),
}

/// Parse a field type name against the registry.
///
/// Anything that is neither a recognized primitive nor a registered struct
/// type is an `UnknownType` error, including malformed widths such as
/// `uint7` or `bytes33`.
pub(crate) fn parse_field_type<'a>(
    registry: &TypeRegistry,
    raw: &'a str,
) -> Result<FieldType<'a>> {
    if let Some(stripped) = raw.strip_suffix(']') {
        let open = stripped.rfind('[').ok_or_else(|| unknown(raw))?;
        let elem = &stripped[..open];
        let inner = &stripped[open + 1..];
        let len = if inner.is_empty() {
            None
        } else {
            Some(inner.parse::<usize>().map_err(|_| unknown(raw))?)
        };
        if elem.is_empty() {
            return Err(unknown(raw));
        }
        return Ok(FieldType::Array { elem, len });
    }

    match raw {
        "address" => return Ok(FieldType::Address),
        "bool" => return Ok(FieldType::Bool),
        "string" => return Ok(FieldType::String),
        "bytes" => return Ok(FieldType::Bytes),
        _ => {}
    }

    // A "bytes"/"uint"/"int" prefix followed by digits is always a width;
    // a malformed width is an error, never a struct-name lookup.
    if let Some(width) = numeric_suffix(raw, "bytes") {
        let n = width.parse::<usize>().map_err(|_| unknown(raw))?;
        if !(1..=32).contains(&n) {
            return Err(unknown(raw));
        }
        return Ok(FieldType::FixedBytes(n));
    }
    if let Some(width) = numeric_suffix(raw, "uint") {
        return Ok(FieldType::Uint(parse_int_width(raw, width)?));
    }
    if let Some(width) = numeric_suffix(raw, "int") {
        return Ok(FieldType::Int(parse_int_width(raw, width)?));
    }

    if registry.contains(raw) {
        return Ok(FieldType::Struct(raw));
    }
    Err(unknown(raw))
}

fn numeric_suffix<'a>(raw: &'a str, prefix: &str) -> Option<&'a str> {
    let suffix = raw.strip_prefix(prefix)?;
    if !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()) {
        Some(suffix)
    } else {
        None
    }
}

fn parse_int_width(raw: &str, width: &str) -> Result<usize> {
    let bits = width.parse::<usize>().map_err(|_| unknown(raw))?;
    if bits == 0 || bits > 256 || bits % 8 != 0 {
        return Err(unknown(raw));
    }
    Ok(bits)
}

fn unknown(name: &str) -> Error {
    Error::UnknownType {
        name: name.to_string(),
    }
}

fn mismatch(field_type: &str) -> Error {
    Error::TypeMismatch {
        field_type: field_type.to_string(),
    }
}

impl TypeRegistry {
    /// The single-type signature: `"Name(type1 name1,type2 name2,...)"`.
    pub fn type_signature(&self, name: &str) -> Result<String> {
        let fields = self.resolve(name)?;
        let mut signature = String::from(name);
        signature.push('(');
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                signature.push(',');
            }
            signature.push_str(&field.field_type);
            signature.push(' ');
            signature.push_str(&field.name);
        }
        signature.push(')');
        Ok(signature)
    }

    /// The canonical encoded type: the primary type's signature first,
    /// followed by the signature of every transitively referenced struct
    /// type, referenced types ordered lexicographically by name and each
    /// included exactly once.
    pub fn encode_type(&self, name: &str) -> Result<String> {
        let mut referenced = BTreeSet::new();
        self.collect_referenced(name, &mut referenced)?;
        referenced.remove(name);

        let mut encoded = self.type_signature(name)?;
        for dep in &referenced {
            encoded.push_str(&self.type_signature(dep)?);
        }
        Ok(encoded)
    }

    /// Collect struct types referenced by `name`'s fields, transitively.
    /// The visited set doubles as recursion protection for types that
    /// reference each other (or themselves through an array).
    fn collect_referenced(&self, name: &str, seen: &mut BTreeSet<String>) -> Result<()> {
        for field in self.resolve(name)? {
            let mut base = field.field_type.as_str();
            while let Some(stripped) = base.strip_suffix(']') {
                match stripped.rfind('[') {
                    Some(open) => base = &stripped[..open],
                    None => break,
                }
            }
            if self.contains(base) && seen.insert(base.to_string()) {
                self.collect_referenced(base, seen)?;
            }
        }
        Ok(())
    }

    /// Encode a single field value into its 32-byte word.
    pub fn encode_value(&self, field_type: &str, value: &Value) -> Result<B256> {
        match parse_field_type(self, field_type)? {
            FieldType::Address => match value {
                Value::Address(addr) => Ok(B256::left_padding_from(addr.as_slice())),
                _ => Err(mismatch(field_type)),
            },
            FieldType::Bool => match value {
                Value::Bool(b) => Ok(B256::with_last_byte(*b as u8)),
                _ => Err(mismatch(field_type)),
            },
            FieldType::Uint(bits) => match value {
                Value::Uint(v) => {
                    if v.bit_len() > bits {
                        return Err(Error::OutOfRange {
                            field_type: field_type.to_string(),
                            value: v.to_string(),
                        });
                    }
                    Ok(B256::from(*v))
                }
                _ => Err(mismatch(field_type)),
            },
            FieldType::Int(bits) => match value {
                Value::Int(v) => {
                    // A value fits in `bits` iff the arithmetic shift by
                    // bits-1 leaves only the sign.
                    if bits < 256 {
                        let sign = v.asr(bits - 1);
                        if sign != I256::ZERO && sign != I256::MINUS_ONE {
                            return Err(Error::OutOfRange {
                                field_type: field_type.to_string(),
                                value: v.to_string(),
                            });
                        }
                    }
                    Ok(B256::from(v.into_raw()))
                }
                _ => Err(mismatch(field_type)),
            },
            FieldType::FixedBytes(n) => match value {
                Value::FixedBytes(bytes) => {
                    if bytes.len() != n {
                        return Err(Error::LengthMismatch {
                            field_type: field_type.to_string(),
                            expected: n,
                            actual: bytes.len(),
                        });
                    }
                    Ok(B256::right_padding_from(bytes))
                }
                _ => Err(mismatch(field_type)),
            },
            FieldType::Bytes => match value {
                Value::Bytes(bytes) => Ok(keccak256(bytes)),
                _ => Err(mismatch(field_type)),
            },
            FieldType::String => match value {
                Value::String(s) => Ok(keccak256(s.as_bytes())),
                _ => Err(mismatch(field_type)),
            },
            FieldType::Array { elem, len } => match value {
                Value::Array(items) => {
                    if let Some(expected) = len {
                        if items.len() != expected {
                            return Err(Error::LengthMismatch {
                                field_type: field_type.to_string(),
                                expected,
                                actual: items.len(),
                            });
                        }
                    }
                    let mut encoded = Vec::with_capacity(32 * items.len());
                    for item in items {
                        encoded.extend_from_slice(self.encode_value(elem, item)?.as_slice());
                    }
                    Ok(keccak256(&encoded))
                }
                _ => Err(mismatch(field_type)),
            },
            FieldType::Struct(struct_name) => self.hash_struct(struct_name, value),
        }
    }
}
