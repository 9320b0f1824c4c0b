//! Order placement pipeline.
//!
//! A linear state machine with a single attempt per step:
//!
//! ```text
//! QuoteRequested → QuoteReceived → OrderBuilt → DigestComputed
//!     → Signed → Submitted → {Accepted | Rejected}
//! ```
//!
//! There is no retry anywhere; a failed step aborts the invocation and
//! reports the stage that was reached together with the triggering error.
//! The two network calls are the only points that block on I/O.

use alloy_primitives::{Address, B256, U256};
use tracing::info;

use crate::api::{OrderSubmission, OrderbookClient, QuoteRequest};
use crate::app_data::AppData;
use crate::order::{OrderData, OrderKind};
use crate::signing::{OrderSigner, Signature, SigningScheme};
use crate::Error;

/// The pipeline stage that had been reached when an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    QuoteRequested,
    QuoteReceived,
    OrderBuilt,
    DigestComputed,
    Signed,
    Submitted,
}

/// A pipeline failure: the stage reached plus the error that stopped it.
#[derive(Debug, thiserror::Error)]
#[error("order pipeline aborted at {stage:?}: {source}")]
pub struct PipelineError {
    pub stage: PipelineStage,
    #[source]
    pub source: Error,
}

/// Caller-supplied parameters for one order placement.
#[derive(Debug, Clone)]
pub struct OrderParameters {
    pub sell_token: Address,
    pub buy_token: Address,
    /// Receiver of the buy tokens; defaults to the signer's address.
    pub receiver: Option<Address>,
    /// Sell amount before the fee is deducted, in atoms.
    pub sell_amount_before_fee: U256,
    pub kind: OrderKind,
    pub partially_fillable: bool,
    /// Requested signing scheme; the quote's echoed scheme is what gets
    /// used for signing.
    pub signing_scheme: Option<SigningScheme>,
    pub app_data: AppData,
}

/// Result of a successful placement.
#[derive(Debug, Clone)]
pub struct OrderPlacement {
    pub uid: String,
    pub order: OrderData,
    pub signing_scheme: SigningScheme,
    pub signature: Signature,
    pub digest: B256,
}

/// Sequences quote → build → hash → sign → submit.
#[derive(Debug)]
pub struct OrderPipeline {
    client: OrderbookClient,
    signer: OrderSigner,
}

impl OrderPipeline {
    pub fn new(client: OrderbookClient, signer: OrderSigner) -> Self {
        Self { client, signer }
    }

    /// Place one order. Every step is a single attempt.
    pub async fn place_order(
        &self,
        params: &OrderParameters,
    ) -> Result<OrderPlacement, PipelineError> {
        let from = self.signer.address();
        let receiver = params.receiver.unwrap_or(from);

        let quote_request = Self::quote_request(params, from, receiver);
        info!(
            sell_token = %quote_request.sell_token,
            buy_token = %quote_request.buy_token,
            sell_amount_before_fee = %quote_request.sell_amount_before_fee,
            kind = ?params.kind,
            "Requesting quote"
        );
        let quote_response = self
            .client
            .get_quote(&quote_request)
            .await
            .map_err(|e| at(PipelineStage::QuoteRequested, e))?;
        let quote = &quote_response.quote;
        let scheme = quote.signing_scheme;

        let app_data_hash = params
            .app_data
            .hash()
            .map_err(|e| at(PipelineStage::QuoteReceived, e))?;
        let order = OrderData::from_quote(quote, receiver, app_data_hash)
            .map_err(|e| at(PipelineStage::QuoteReceived, e))?;
        info!(
            sell_amount = %order.sell_amount,
            buy_amount = %order.buy_amount,
            valid_to = order.valid_to,
            scheme = ?scheme,
            "Order built"
        );

        let digest = self
            .signer
            .order_digest(&order)
            .map_err(|e| at(PipelineStage::OrderBuilt, e))?;
        info!(digest = %digest, "Digest computed");

        let signature = self
            .signer
            .sign_digest(digest, scheme)
            .await
            .map_err(|e| at(PipelineStage::DigestComputed, e))?;
        info!(signature = %signature.to_hex(), "Order signed");

        let submission = OrderSubmission::new(&order, scheme, &signature, from);
        let uid = match self.client.submit_order(&submission).await {
            Ok(uid) => uid,
            // A response arrived and the service said no: the submission
            // itself completed, terminally rejected.
            Err(e @ Error::Rejected { .. }) => return Err(at(PipelineStage::Submitted, e)),
            Err(e) => return Err(at(PipelineStage::Signed, e)),
        };

        Ok(OrderPlacement {
            uid,
            order,
            signing_scheme: scheme,
            signature,
            digest,
        })
    }

    fn quote_request(
        params: &OrderParameters,
        from: Address,
        receiver: Address,
    ) -> QuoteRequest {
        QuoteRequest {
            sell_token: params.sell_token,
            buy_token: params.buy_token,
            receiver,
            from,
            kind: params.kind,
            sell_amount_before_fee: params.sell_amount_before_fee.to_string(),
            partially_fillable: params.partially_fillable,
            signing_scheme: params.signing_scheme,
        }
    }
}

fn at(stage: PipelineStage, source: Error) -> PipelineError {
    PipelineError { stage, source }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_params() -> OrderParameters {
        OrderParameters {
            sell_token: "0xfff9976782d46cc05630d1f6ebab18b2324d6b14".parse().unwrap(),
            buy_token: "0x0625afb445c3b6b7b929342a04a22599fd5dbb59".parse().unwrap(),
            receiver: None,
            sell_amount_before_fee: U256::from(100_000_000_000_000_000u64),
            kind: OrderKind::Sell,
            partially_fillable: true,
            signing_scheme: Some(SigningScheme::EthSign),
            app_data: AppData::default(),
        }
    }

    #[test]
    fn test_quote_request_mapping() {
        let params = test_params();
        let from: Address = "0x2f8A528EB0De3b43fD9Eb6f23D55C8D95fb7AF98".parse().unwrap();

        let request = OrderPipeline::quote_request(&params, from, from);

        assert_eq!(request.sell_token, params.sell_token);
        assert_eq!(request.from, from);
        assert_eq!(request.receiver, from);
        assert_eq!(request.sell_amount_before_fee, "100000000000000000");
        assert_eq!(request.signing_scheme, Some(SigningScheme::EthSign));
    }

    #[test]
    fn test_pipeline_error_reports_stage() {
        let err = at(
            PipelineStage::QuoteRequested,
            Error::Rejected {
                status: 400,
                body: "SellAmountDoesNotCoverFee".to_string(),
            },
        );

        let message = err.to_string();
        assert!(message.contains("QuoteRequested"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
