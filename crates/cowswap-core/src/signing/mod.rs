//! Order signing: domain separation, scheme wrapping, and ECDSA.
//!
//! ```text
//! OrderData ──► typed-data digest ──► SigningScheme wrap ──► ECDSA ──► Signature
//!                    │
//!            Eip712Domain::separator
//! ```
//!
//! The signer is the only component holding key material; everything
//! upstream of it is a pure function of its inputs.

pub mod domain;
pub mod scheme;
pub mod signer;

pub use domain::{Eip712Domain, DOMAIN_TYPE_NAME, SEPOLIA_CHAIN_ID, SETTLEMENT_CONTRACT};
pub use scheme::{SigningScheme, ETH_SIGN_PREFIX};
pub use signer::{OrderSigner, Signature, V_OFFSET};
