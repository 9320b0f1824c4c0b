//! CoW Protocol order bot.
//!
//! Quotes, signs, and submits a single limit order using parameters from
//! the environment.

use anyhow::Result;
use cowswap_core::api::OrderbookClient;
use cowswap_core::config::Config;
use cowswap_core::pipeline::{OrderParameters, OrderPipeline};
use cowswap_core::signing::{Eip712Domain, OrderSigner};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "order_bot=info,cowswap_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CoW order bot");

    let config = Config::from_env()?;

    let domain = Eip712Domain::gnosis_protocol(
        config.orderbook.chain_id,
        config.orderbook.settlement_contract,
    );
    let signer = OrderSigner::from_private_key(&config.wallet.private_key, domain)?;
    info!(address = %signer.address(), chain_id = config.orderbook.chain_id, "Wallet loaded");

    let client = OrderbookClient::new(config.orderbook.api_url.clone());
    let pipeline = OrderPipeline::new(client, signer);

    let params = OrderParameters {
        sell_token: config.order.sell_token,
        buy_token: config.order.buy_token,
        receiver: config.order.receiver,
        sell_amount_before_fee: config.order.sell_amount,
        kind: config.order.kind,
        partially_fillable: config.order.partially_fillable,
        signing_scheme: config.order.signing_scheme,
        app_data: Default::default(),
    };

    match pipeline.place_order(&params).await {
        Ok(placement) => {
            info!(
                uid = %placement.uid,
                digest = %placement.digest,
                scheme = ?placement.signing_scheme,
                "Order placed"
            );
            Ok(())
        }
        Err(e) => {
            error!(stage = ?e.stage, error = %e.source, "Order placement failed");
            Err(e.into())
        }
    }
}
