//! GPv2 order model.
//!
//! Defines the order record that gets hashed and signed, along with the
//! protocol's tag enums. The `kind` and balance-location fields are fixed
//! protocol constants: the keccak-256 hashes of short ASCII tags, exactly
//! as the settlement contract defines them.

use std::collections::BTreeMap;
use std::str::FromStr;

use alloy_primitives::{keccak256, Address, B256, U256};
use serde::{Deserialize, Serialize};

use crate::api::orderbook::Quote;
use crate::typed_data::{FieldDef, Value};
use crate::{Error, Result};

/// Schema name of the order type.
pub const ORDER_TYPE_NAME: &str = "Order";

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    Sell,
    Buy,
}

impl OrderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderKind::Sell => "sell",
            OrderKind::Buy => "buy",
        }
    }

    /// The `bytes32` discriminant used in the order hash.
    pub fn hash(&self) -> B256 {
        keccak256(self.as_str().as_bytes())
    }
}

impl FromStr for OrderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sell" => Ok(OrderKind::Sell),
            "buy" => Ok(OrderKind::Buy),
            other => Err(Error::Config {
                message: format!("unknown order kind: {other}"),
            }),
        }
    }
}

/// Where a trade's token balance is drawn from or deposited to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceSource {
    #[default]
    Erc20,
    External,
    Internal,
}

impl BalanceSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            BalanceSource::Erc20 => "erc20",
            BalanceSource::External => "external",
            BalanceSource::Internal => "internal",
        }
    }

    /// The `bytes32` discriminant used in the order hash.
    pub fn hash(&self) -> B256 {
        keccak256(self.as_str().as_bytes())
    }
}

/// A fully specified order, ready for hashing and signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderData {
    /// Token being sold.
    pub sell_token: Address,
    /// Token being bought.
    pub buy_token: Address,
    /// Sell amount in atoms.
    pub sell_amount: U256,
    /// Buy amount in atoms.
    pub buy_amount: U256,
    /// Expiry as a unix timestamp.
    pub valid_to: u32,
    /// Hash of the canonical app-data document.
    pub app_data: B256,
    /// Fee amount in sell-token atoms.
    pub fee_amount: U256,
    /// Trade direction.
    pub kind: OrderKind,
    /// Whether the order may be filled in parts.
    pub partially_fillable: bool,
    /// Balance location for the sell side.
    pub sell_token_balance: BalanceSource,
    /// Balance location for the buy side.
    pub buy_token_balance: BalanceSource,
    /// Address receiving the buy tokens.
    pub receiver: Address,
}

impl OrderData {
    /// The `Order` schema, in the declared field order the settlement
    /// contract hashes.
    pub fn schema() -> Vec<FieldDef> {
        vec![
            FieldDef::new("sellToken", "address"),
            FieldDef::new("buyToken", "address"),
            FieldDef::new("sellAmount", "uint256"),
            FieldDef::new("buyAmount", "uint256"),
            FieldDef::new("validTo", "uint32"),
            FieldDef::new("appData", "bytes32"),
            FieldDef::new("feeAmount", "uint256"),
            FieldDef::new("kind", "bytes32"),
            FieldDef::new("partiallyFillable", "bool"),
            FieldDef::new("sellTokenBalance", "bytes32"),
            FieldDef::new("buyTokenBalance", "bytes32"),
            FieldDef::new("receiver", "address"),
        ]
    }

    /// Build an order from a quote, binding the app-data hash and the
    /// receiver. Amounts are taken from the quote verbatim.
    pub fn from_quote(quote: &Quote, receiver: Address, app_data: B256) -> Result<Self> {
        Ok(Self {
            sell_token: quote.sell_token,
            buy_token: quote.buy_token,
            sell_amount: parse_amount("sellAmount", &quote.sell_amount)?,
            buy_amount: parse_amount("buyAmount", &quote.buy_amount)?,
            valid_to: quote.valid_to,
            app_data,
            fee_amount: parse_amount("feeAmount", &quote.fee_amount)?,
            kind: quote.kind,
            partially_fillable: quote.partially_fillable,
            sell_token_balance: quote.sell_token_balance,
            buy_token_balance: quote.buy_token_balance,
            receiver,
        })
    }

    /// The order as a value map matching [`Self::schema`].
    pub fn to_value(&self) -> Value {
        let mut map = BTreeMap::new();
        map.insert("sellToken".to_string(), Value::from(self.sell_token));
        map.insert("buyToken".to_string(), Value::from(self.buy_token));
        map.insert("sellAmount".to_string(), Value::from(self.sell_amount));
        map.insert("buyAmount".to_string(), Value::from(self.buy_amount));
        map.insert("validTo".to_string(), Value::from(self.valid_to));
        map.insert("appData".to_string(), Value::from(self.app_data));
        map.insert("feeAmount".to_string(), Value::from(self.fee_amount));
        map.insert("kind".to_string(), Value::from(self.kind.hash()));
        map.insert(
            "partiallyFillable".to_string(),
            Value::from(self.partially_fillable),
        );
        map.insert(
            "sellTokenBalance".to_string(),
            Value::from(self.sell_token_balance.hash()),
        );
        map.insert(
            "buyTokenBalance".to_string(),
            Value::from(self.buy_token_balance.hash()),
        );
        map.insert("receiver".to_string(), Value::from(self.receiver));
        Value::Struct(map)
    }
}

fn parse_amount(field: &str, raw: &str) -> Result<U256> {
    U256::from_str_radix(raw, 10)
        .map_err(|e| Error::InvalidQuote(format!("{field} {raw:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typed_data::TypeRegistry;

    #[test]
    fn test_kind_hashes() {
        assert_eq!(
            OrderKind::Sell.hash(),
            "f3b277728b3fee749481eb3e0b3b48980dbbab78658fc419025cb16eee346775"
                .parse::<B256>()
                .unwrap()
        );
        assert_eq!(
            OrderKind::Buy.hash(),
            "6ed88e868af0a1983e3886d5f3e95a2fafbd6c3450bc229e27342283dc429ccc"
                .parse::<B256>()
                .unwrap()
        );
    }

    #[test]
    fn test_balance_source_hashes() {
        assert_eq!(
            BalanceSource::Erc20.hash(),
            "5a28e9363bb942b639270062aa6bb295f434bcdfc42c97267bf003f272060dc9"
                .parse::<B256>()
                .unwrap()
        );
        assert_eq!(
            BalanceSource::External.hash(),
            "abee3b73373acd583a130924aad6dc38cfdc44ba0555ba94ce2ff63980ea0632"
                .parse::<B256>()
                .unwrap()
        );
        assert_eq!(
            BalanceSource::Internal.hash(),
            "4ac99ace14ee0a5ef932dc609df0943ab7ac16b7583634612f8dc35a4289a6ce"
                .parse::<B256>()
                .unwrap()
        );
    }

    #[test]
    fn test_order_type_hash() {
        // keccak256 of the canonical Order type signature, as pinned by the
        // settlement contract.
        let mut registry = TypeRegistry::new();
        registry.register(ORDER_TYPE_NAME, OrderData::schema());
        assert_eq!(
            registry.type_hash(ORDER_TYPE_NAME).unwrap(),
            "a1da117a5203df6aa19b5264ef4636a9f580d8f0ad18bde0c05c3d6f52bee2bc"
                .parse::<B256>()
                .unwrap()
        );
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&OrderKind::Sell).unwrap(), r#""sell""#);
        assert_eq!(
            serde_json::to_string(&BalanceSource::Erc20).unwrap(),
            r#""erc20""#
        );
        assert_eq!(
            serde_json::from_str::<BalanceSource>(r#""internal""#).unwrap(),
            BalanceSource::Internal
        );
    }

    #[test]
    fn test_order_kind_from_str() {
        assert_eq!("sell".parse::<OrderKind>().unwrap(), OrderKind::Sell);
        assert_eq!("buy".parse::<OrderKind>().unwrap(), OrderKind::Buy);
        assert!("hold".parse::<OrderKind>().is_err());
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        let err = parse_amount("sellAmount", "not-a-number").unwrap_err();
        assert!(matches!(err, Error::InvalidQuote(_)));
    }
}
