//! External HTTP collaborators.

pub mod orderbook;

pub use orderbook::{
    OrderSubmission, OrderUid, OrderbookClient, Quote, QuoteRequest, QuoteResponse,
};
