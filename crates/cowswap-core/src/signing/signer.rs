//! ECDSA order signing.
//!
//! Wraps a secp256k1 private key together with the domain and the order
//! schema. Signing is deterministic (RFC-6979 nonces), so the same order,
//! domain, scheme, and key always produce the same bytes.

use alloy_primitives::{Address, B256};
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use std::str::FromStr;

use super::domain::Eip712Domain;
use super::scheme::SigningScheme;
use crate::order::{OrderData, ORDER_TYPE_NAME};
use crate::typed_data::{typed_data_digest, TypeRegistry};
use crate::{Error, Result};

/// Recovery-indicator offset. The orderbook expects Electrum-style 27/28
/// values for EOA signatures, not raw 0/1 parity.
pub const V_OFFSET: u8 = 27;

/// A 65-byte recoverable signature: `r || s || v`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub r: B256,
    pub s: B256,
    pub v: u8,
}

impl Signature {
    /// Serialize as the 65-byte wire layout.
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut bytes = [0u8; 65];
        bytes[..32].copy_from_slice(self.r.as_slice());
        bytes[32..64].copy_from_slice(self.s.as_slice());
        bytes[64] = self.v;
        bytes
    }

    /// Hex-encode with the `0x` prefix the orderbook expects.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }

    /// Recover the signing address from the payload that was signed.
    pub fn recover(&self, signing_payload: B256) -> Result<Address> {
        let parity = match self.v.checked_sub(V_OFFSET) {
            Some(0) => false,
            Some(1) => true,
            _ => {
                return Err(Error::Signing {
                    message: format!("unexpected recovery indicator: {}", self.v),
                })
            }
        };
        let signature =
            alloy_primitives::Signature::new(self.r.into(), self.s.into(), parity);
        signature
            .recover_address_from_prehash(&signing_payload)
            .map_err(|e| Error::Signing {
                message: format!("recovery failed: {e}"),
            })
    }
}

/// Signs orders for one domain with one key.
#[derive(Clone)]
pub struct OrderSigner {
    signer: PrivateKeySigner,
    domain: Eip712Domain,
    registry: TypeRegistry,
}

impl OrderSigner {
    /// Create a signer for a domain. The order schema is registered once
    /// here; schemas are fixed for the signer's lifetime.
    pub fn new(signer: PrivateKeySigner, domain: Eip712Domain) -> Self {
        let mut registry = TypeRegistry::new();
        registry.register(ORDER_TYPE_NAME, OrderData::schema());
        Self {
            signer,
            domain,
            registry,
        }
    }

    /// Create a signer from a hex-encoded private key.
    pub fn from_private_key(key: &str, domain: Eip712Domain) -> Result<Self> {
        let signer = PrivateKeySigner::from_str(key).map_err(|e| Error::InvalidKey {
            message: e.to_string(),
        })?;
        Ok(Self::new(signer, domain))
    }

    /// The signer's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// The domain this signer binds orders to.
    pub fn domain(&self) -> &Eip712Domain {
        &self.domain
    }

    /// Compute the typed-data digest for an order:
    /// `keccak256(0x19 || 0x01 || domainSeparator || hashStruct(order))`.
    pub fn order_digest(&self, order: &OrderData) -> Result<B256> {
        let domain_separator = self.domain.separator()?;
        let struct_hash = self
            .registry
            .hash_struct(ORDER_TYPE_NAME, &order.to_value())?;
        Ok(typed_data_digest(domain_separator, struct_hash))
    }

    /// Sign an order under the given scheme.
    pub async fn sign_order(
        &self,
        order: &OrderData,
        scheme: SigningScheme,
    ) -> Result<Signature> {
        let digest = self.order_digest(order)?;
        self.sign_digest(digest, scheme).await
    }

    /// Apply the scheme's wrap to a digest and sign the result.
    pub async fn sign_digest(
        &self,
        digest: B256,
        scheme: SigningScheme,
    ) -> Result<Signature> {
        let payload = scheme.signing_payload(digest);
        let signature = self
            .signer
            .sign_hash(&payload)
            .await
            .map_err(|e| Error::Signing {
                message: e.to_string(),
            })?;

        Ok(Signature {
            r: B256::from(signature.r()),
            s: B256::from(signature.s()),
            v: V_OFFSET + signature.v() as u8,
        })
    }
}

impl std::fmt::Debug for OrderSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderSigner")
            .field("address", &format!("{:?}", self.address()))
            .field("domain", &self.domain)
            .finish()
    }
}
