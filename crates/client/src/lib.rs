//! Client SDK for sealed-bid auctions.
//!
//! This crate provides a high-level API for:
//! - Preparing bids: picking a nonce and computing the commitment
//! - Talking to the mock chain over JSON-RPC
//! - Querying auction state

pub mod bid;
pub mod query;

pub use bid::{check_commitment, create_bid, generate_nonce, BidBuilder, BidError, PreparedBid};
pub use query::AuctionRpcClient;
