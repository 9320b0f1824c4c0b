//! Signing schemes understood by the orderbook.
//!
//! The scheme tag travels with the order so the verifier applies the same
//! wrap when recomputing the signed hash.

use alloy_primitives::{keccak256, B256};
use alloy_sol_types::SolValue;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::Error;

/// ASCII prefix asserting that a 32-byte payload follows.
pub const ETH_SIGN_PREFIX: &[u8; 28] = b"\x19Ethereum Signed Message:\n32";

/// How the typed-data digest is wrapped before ECDSA signing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SigningScheme {
    /// Sign the typed-data digest directly.
    #[default]
    Eip712,
    /// Wrap the digest in the signed-message prefix first.
    EthSign,
}

impl SigningScheme {
    /// The 32-byte value handed to the ECDSA signer for a given digest.
    pub fn signing_payload(&self, digest: B256) -> B256 {
        match self {
            SigningScheme::Eip712 => digest,
            SigningScheme::EthSign => {
                keccak256((*ETH_SIGN_PREFIX, digest).abi_encode_packed())
            }
        }
    }
}

impl FromStr for SigningScheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eip712" => Ok(SigningScheme::Eip712),
            "ethsign" => Ok(SigningScheme::EthSign),
            other => Err(Error::Config {
                message: format!("unknown signing scheme: {other}"),
            }),
        }
    }
}
