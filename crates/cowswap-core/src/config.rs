//! Configuration loaded from the environment.

use std::env;

use alloy_primitives::{Address, U256};

use crate::order::OrderKind;
use crate::signing::{SigningScheme, SEPOLIA_CHAIN_ID, SETTLEMENT_CONTRACT};
use crate::{Error, Result};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub wallet: WalletConfig,
    pub orderbook: OrderbookConfig,
    pub order: OrderConfig,
}

#[derive(Debug, Clone)]
pub struct WalletConfig {
    /// Hex-encoded secp256k1 private key.
    pub private_key: String,
}

#[derive(Debug, Clone)]
pub struct OrderbookConfig {
    /// Orderbook API base URL; the client's default is used when unset.
    pub api_url: Option<String>,
    pub chain_id: u64,
    pub settlement_contract: Address,
}

#[derive(Debug, Clone)]
pub struct OrderConfig {
    pub sell_token: Address,
    pub buy_token: Address,
    /// Receiver of the buy tokens; the signer's address when unset.
    pub receiver: Option<Address>,
    /// Sell amount before the fee, in atoms.
    pub sell_amount: U256,
    pub kind: OrderKind,
    pub partially_fillable: bool,
    /// Requested signing scheme, passed through to the quote request.
    pub signing_scheme: Option<SigningScheme>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            wallet: WalletConfig {
                private_key: require("PRIVATE_KEY")?,
            },
            orderbook: OrderbookConfig {
                api_url: env::var("COW_API_URL").ok(),
                chain_id: env::var("CHAIN_ID")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(SEPOLIA_CHAIN_ID),
                settlement_contract: parse_var(
                    "SETTLEMENT_CONTRACT",
                    env::var("SETTLEMENT_CONTRACT")
                        .unwrap_or_else(|_| SETTLEMENT_CONTRACT.to_string()),
                )?,
            },
            order: OrderConfig {
                sell_token: parse_var("SELL_TOKEN", require("SELL_TOKEN")?)?,
                buy_token: parse_var("BUY_TOKEN", require("BUY_TOKEN")?)?,
                receiver: match env::var("RECEIVER") {
                    Ok(raw) => Some(parse_var("RECEIVER", raw)?),
                    Err(_) => None,
                },
                sell_amount: parse_var("SELL_AMOUNT", require("SELL_AMOUNT")?)?,
                kind: match env::var("ORDER_KIND") {
                    Ok(raw) => raw.parse()?,
                    Err(_) => OrderKind::Sell,
                },
                partially_fillable: env::var("PARTIALLY_FILLABLE")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(false),
                signing_scheme: match env::var("SIGNING_SCHEME") {
                    Ok(raw) => Some(raw.parse()?),
                    Err(_) => None,
                },
            },
        })
    }

    /// Configuration for testing (with defaults).
    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            wallet: WalletConfig {
                private_key: "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
                    .to_string(),
            },
            orderbook: OrderbookConfig {
                api_url: None,
                chain_id: SEPOLIA_CHAIN_ID,
                settlement_contract: SETTLEMENT_CONTRACT.parse().unwrap(),
            },
            order: OrderConfig {
                sell_token: "0xfff9976782d46cc05630d1f6ebab18b2324d6b14".parse().unwrap(),
                buy_token: "0x0625afb445c3b6b7b929342a04a22599fd5dbb59".parse().unwrap(),
                receiver: None,
                sell_amount: U256::from(100_000_000_000_000_000u64),
                kind: OrderKind::Sell,
                partially_fillable: false,
                signing_scheme: None,
            },
        }
    }
}

fn require(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config {
        message: format!("{name} environment variable not set"),
    })
}

fn parse_var<T>(name: &str, raw: String) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e| Error::Config {
        message: format!("invalid {name} {raw:?}: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_config() {
        let config = Config::test_config();
        assert_eq!(config.orderbook.chain_id, SEPOLIA_CHAIN_ID);
        assert_eq!(config.order.kind, OrderKind::Sell);
        assert!(!config.order.partially_fillable);
    }

    #[test]
    fn test_parse_var_reports_name() {
        let err = parse_var::<Address>("SELL_TOKEN", "nonsense".to_string()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("SELL_TOKEN"));
        assert!(message.contains("nonsense"));
    }
}
