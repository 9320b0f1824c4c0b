//! CoW orderbook API client.
//!
//! Two calls: quote a trade, submit a signed order. Both are single
//! attempts with no automatic retry; a failed call surfaces immediately
//! with the response status and body preserved.

use std::time::Duration;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::order::{BalanceSource, OrderData, OrderKind};
use crate::signing::{Signature, SigningScheme};
use crate::{Error, Result};

/// Identifier assigned to an accepted order.
pub type OrderUid = String;

/// Client for the orderbook's quote and order-submission endpoints.
pub struct OrderbookClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl OrderbookClient {
    /// Default orderbook API base URL (Sepolia).
    pub const DEFAULT_BASE_URL: &'static str = "https://api.cow.fi/sepolia/api/v1";

    pub fn new(base_url: Option<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client");
        Self {
            base_url: base_url.unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string()),
            http_client,
        }
    }

    /// Request trade terms for an order of the given size.
    pub async fn get_quote(&self, request: &QuoteRequest) -> Result<QuoteResponse> {
        let url = format!("{}/quote", self.base_url);
        debug!(url = %url, sell_token = %request.sell_token, "Requesting quote");

        let response = self.http_client.post(&url).json(request).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Rejected { status, body });
        }

        let quote: QuoteResponse = response.json().await?;
        info!(
            sell_amount = %quote.quote.sell_amount,
            buy_amount = %quote.quote.buy_amount,
            valid_to = quote.quote.valid_to,
            "Quote received"
        );
        Ok(quote)
    }

    /// Submit a signed order. Returns the order UID on acceptance.
    pub async fn submit_order(&self, order: &OrderSubmission) -> Result<OrderUid> {
        let url = format!("{}/orders", self.base_url);
        debug!(url = %url, "Submitting order");

        let response = self.http_client.post(&url).json(order).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Rejected { status, body });
        }

        // The orderbook returns the UID as a bare JSON string.
        let uid: OrderUid = response.json().await?;
        info!(uid = %uid, "Order accepted");
        Ok(uid)
    }
}

impl std::fmt::Debug for OrderbookClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderbookClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Body for `POST /quote`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub sell_token: Address,
    pub buy_token: Address,
    pub receiver: Address,
    pub from: Address,
    pub kind: OrderKind,
    /// Sell amount before the fee is deducted, in atoms.
    pub sell_amount_before_fee: String,
    pub partially_fillable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signing_scheme: Option<SigningScheme>,
}

/// Response from `POST /quote`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub quote: Quote,
    pub from: Address,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub expiration: Option<String>,
}

/// Trade terms supplied by the quote service. Consumed purely as a source
/// of order field values plus the echoed signing scheme.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub sell_token: Address,
    pub buy_token: Address,
    #[serde(default)]
    pub receiver: Option<Address>,
    /// Amounts in atoms, as decimal strings.
    pub sell_amount: String,
    pub buy_amount: String,
    pub valid_to: u32,
    #[serde(default)]
    pub app_data: Option<String>,
    pub fee_amount: String,
    pub kind: OrderKind,
    pub partially_fillable: bool,
    #[serde(default)]
    pub sell_token_balance: BalanceSource,
    #[serde(default)]
    pub buy_token_balance: BalanceSource,
    #[serde(default)]
    pub signing_scheme: SigningScheme,
}

/// Body for `POST /orders`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSubmission {
    pub sell_token: Address,
    pub buy_token: Address,
    pub receiver: Address,
    pub sell_amount: String,
    pub buy_amount: String,
    pub valid_to: u32,
    /// Hash of the canonical app-data document, `0x`-prefixed.
    pub app_data: String,
    pub fee_amount: String,
    pub kind: OrderKind,
    pub partially_fillable: bool,
    pub sell_token_balance: BalanceSource,
    pub buy_token_balance: BalanceSource,
    pub signing_scheme: SigningScheme,
    /// 65-byte signature, hex-encoded with the `0x` prefix.
    pub signature: String,
    pub from: Address,
}

impl OrderSubmission {
    /// Assemble the submission payload from a signed order.
    pub fn new(
        order: &OrderData,
        scheme: SigningScheme,
        signature: &Signature,
        from: Address,
    ) -> Self {
        Self {
            sell_token: order.sell_token,
            buy_token: order.buy_token,
            receiver: order.receiver,
            sell_amount: order.sell_amount.to_string(),
            buy_amount: order.buy_amount.to_string(),
            valid_to: order.valid_to,
            app_data: format!("{}", order.app_data),
            fee_amount: order.fee_amount.to_string(),
            kind: order.kind,
            partially_fillable: order.partially_fillable,
            sell_token_balance: order.sell_token_balance,
            buy_token_balance: order.buy_token_balance,
            signing_scheme: scheme,
            signature: signature.to_hex(),
            from,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{B256, U256};

    #[test]
    fn test_quote_request_wire_format() {
        let addr: Address = "0x2f8A528EB0De3b43fD9Eb6f23D55C8D95fb7AF98".parse().unwrap();
        let request = QuoteRequest {
            sell_token: "0xfff9976782d46cc05630d1f6ebab18b2324d6b14".parse().unwrap(),
            buy_token: "0x0625afb445c3b6b7b929342a04a22599fd5dbb59".parse().unwrap(),
            receiver: addr,
            from: addr,
            kind: OrderKind::Sell,
            sell_amount_before_fee: "100000000000000000".to_string(),
            partially_fillable: true,
            signing_scheme: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["kind"], "sell");
        assert_eq!(json["sellAmountBeforeFee"], "100000000000000000");
        assert_eq!(json["partiallyFillable"], true);
        // Absent optional scheme is omitted entirely.
        assert!(json.get("signingScheme").is_none());
    }

    #[test]
    fn test_quote_response_parsing() {
        let body = r#"{
            "quote": {
                "sellToken": "0xfff9976782d46cc05630d1f6ebab18b2324d6b14",
                "buyToken": "0x0625afb445c3b6b7b929342a04a22599fd5dbb59",
                "receiver": "0x2f8a528eb0de3b43fd9eb6f23d55c8d95fb7af98",
                "sellAmount": "473107794665489160",
                "buyAmount": "164428962043613737416",
                "validTo": 1746436866,
                "appData": "0x0000000000000000000000000000000000000000000000000000000000000000",
                "feeAmount": "0",
                "kind": "sell",
                "partiallyFillable": false,
                "sellTokenBalance": "erc20",
                "buyTokenBalance": "erc20",
                "signingScheme": "ethsign"
            },
            "from": "0x2f8a528eb0de3b43fd9eb6f23d55c8d95fb7af98",
            "expiration": "2025-05-05T10:01:06.000Z",
            "id": 123
        }"#;

        let response: QuoteResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.quote.sell_amount, "473107794665489160");
        assert_eq!(response.quote.valid_to, 1746436866);
        assert_eq!(response.quote.kind, OrderKind::Sell);
        assert_eq!(response.quote.signing_scheme, SigningScheme::EthSign);
        assert_eq!(response.quote.sell_token_balance, BalanceSource::Erc20);
    }

    #[test]
    fn test_quote_response_defaults() {
        // Balance locations and scheme may be absent; they default.
        let body = r#"{
            "quote": {
                "sellToken": "0xfff9976782d46cc05630d1f6ebab18b2324d6b14",
                "buyToken": "0x0625afb445c3b6b7b929342a04a22599fd5dbb59",
                "sellAmount": "1",
                "buyAmount": "2",
                "validTo": 0,
                "feeAmount": "0",
                "kind": "buy",
                "partiallyFillable": true
            },
            "from": "0x2f8a528eb0de3b43fd9eb6f23d55c8d95fb7af98"
        }"#;

        let response: QuoteResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.quote.sell_token_balance, BalanceSource::Erc20);
        assert_eq!(response.quote.signing_scheme, SigningScheme::Eip712);
        assert!(response.quote.receiver.is_none());
    }

    #[test]
    fn test_order_submission_wire_format() {
        let order = OrderData {
            sell_token: "0xfff9976782d46cc05630d1f6ebab18b2324d6b14".parse().unwrap(),
            buy_token: "0x0625afb445c3b6b7b929342a04a22599fd5dbb59".parse().unwrap(),
            sell_amount: U256::from(473107794665489160u64),
            buy_amount: U256::from(164428962043613737416u128),
            valid_to: 1746436866,
            app_data: B256::ZERO,
            fee_amount: U256::ZERO,
            kind: OrderKind::Sell,
            partially_fillable: false,
            sell_token_balance: BalanceSource::Erc20,
            buy_token_balance: BalanceSource::Erc20,
            receiver: "0x2f8A528EB0De3b43fD9Eb6f23D55C8D95fb7AF98".parse().unwrap(),
        };
        let signature = Signature {
            r: B256::repeat_byte(0x11),
            s: B256::repeat_byte(0x22),
            v: 27,
        };

        let submission = OrderSubmission::new(
            &order,
            SigningScheme::EthSign,
            &signature,
            "0x2f8A528EB0De3b43fD9Eb6f23D55C8D95fb7AF98".parse().unwrap(),
        );
        let json = serde_json::to_value(&submission).unwrap();

        assert_eq!(json["sellAmount"], "473107794665489160");
        assert_eq!(json["buyAmount"], "164428962043613737416");
        assert_eq!(json["signingScheme"], "ethsign");
        assert_eq!(json["sellTokenBalance"], "erc20");
        let sig = json["signature"].as_str().unwrap();
        assert!(sig.starts_with("0x"));
        assert_eq!(sig.len(), 132);
        let app_data = json["appData"].as_str().unwrap();
        assert!(app_data.starts_with("0x"));
        assert_eq!(app_data.len(), 66);
    }
}
