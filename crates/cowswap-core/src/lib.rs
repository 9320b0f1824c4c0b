//! CoW Protocol order signing core.
//!
//! Everything needed to turn trade parameters into an accepted order:
//! schema-driven EIP-712 typed-data hashing, domain separation, scheme
//! wrapping, deterministic ECDSA signing, and the orderbook API client,
//! sequenced by a single-attempt pipeline.
//!
//! The hashing and signing layers are pure functions of their inputs; the
//! only I/O lives in [`api`] and is orchestrated by [`pipeline`].

pub mod api;
pub mod app_data;
pub mod config;
pub mod error;
pub mod order;
pub mod pipeline;
pub mod signing;
pub mod typed_data;

pub use error::{Error, Result};
