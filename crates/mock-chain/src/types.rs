//! RPC-compatible types for the mock chain.
//!
//! These types are JSON-serializable views of the core auction types.

use std::collections::BTreeMap;

use auction_module::phase::{next_transition, phase_at};
use auction_types::{Auction, Bid, Phase};
use serde::{Deserialize, Serialize};

/// Clock info response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeInfo {
    pub timestamp: u64,
}

/// Parameters for creating an auction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitAuctionParams {
    pub asset: String,
    /// Bidding window length in seconds
    pub bid_duration: u64,
    /// Reveal window length in seconds
    pub reveal_duration: u64,
}

/// Parameters for placing a bid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceBidParams {
    pub asset: String,
    pub client_id: String,
    /// Lowercase hex SHA-256 commitment (64 chars)
    pub bid_hash: String,
}

/// Parameters for placing an ask.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceAskParams {
    pub asset: String,
    pub client_id: String,
    pub amount: u64,
}

/// Parameters for revealing a bid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealBidParams {
    pub asset: String,
    pub client_id: String,
    pub bid_value: u64,
    pub nonce: String,
}

/// Bid for RPC responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidRpc {
    pub client_id: String,
    pub bid_hash: String,
    pub revealed: bool,
    pub bid_value: Option<u64>,
    pub nonce: Option<String>,
}

impl From<&Bid> for BidRpc {
    fn from(b: &Bid) -> Self {
        Self {
            client_id: b.client_id.clone(),
            bid_hash: b.bid_hash.clone(),
            revealed: b.revealed,
            bid_value: b.bid_value,
            nonce: b.nonce.clone(),
        }
    }
}

/// Auction for RPC responses, evaluated at the chain's current time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuctionRpc {
    pub asset: String,
    pub phase: Phase,
    pub start_time: u64,
    pub bid_end: u64,
    pub reveal_end: u64,
    pub next_transition: Option<u64>,
    pub bids: Vec<BidRpc>,
    pub asks: BTreeMap<String, u64>,
    pub awarded: bool,
    pub winner: Option<String>,
}

impl AuctionRpc {
    pub fn from_auction(a: &Auction, now: u64) -> Self {
        Self {
            asset: a.asset.clone(),
            phase: phase_at(now, a),
            start_time: a.start_time,
            bid_end: a.bid_end,
            reveal_end: a.reveal_end,
            next_transition: next_transition(now, a),
            bids: a.bids.values().map(BidRpc::from).collect(),
            asks: a.asks.clone(),
            awarded: a.awarded,
            winner: a.winner.clone(),
        }
    }
}

/// Award result for RPC responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwardRpc {
    pub asset: String,
    pub winner: Option<String>,
    pub awarded_at: u64,
}

/// Award status for RPC responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WinnerRpc {
    pub asset: String,
    pub awarded: bool,
    pub winner: Option<String>,
}
