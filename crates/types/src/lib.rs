//! Core type definitions for sealed-bid commit-reveal auctions.
//!
//! This crate provides the shared data structures used across the auction system:
//! the `Auction` aggregate stored in the ledger, the per-client `Bid` commitments
//! it owns, and the `Phase` an auction is in at a given instant.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// =========================
// IDENTIFIERS
// =========================

/// Opaque bidder / asker identifier.
pub type ClientId = String;

/// Opaque asset identifier; doubles as the ledger key of its auction.
pub type AssetId = String;

/// Seconds since the Unix epoch.
pub type Timestamp = u64;

// =========================
// PHASES
// =========================

/// Time-gated phase of an auction.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// `now <= bid_end`: commitments are accepted
    Bidding,
    /// `bid_end < now <= reveal_end`: openings are accepted
    Reveal,
    /// `now > reveal_end`: the auction can be awarded
    Closed,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Bidding => "bidding",
            Phase::Reveal => "reveal",
            Phase::Closed => "closed",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =========================
// AUCTION TYPES
// =========================

/// A committed bid, optionally opened.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct Bid {
    pub client_id: ClientId,

    /// Lowercase hex SHA-256 commitment supplied at placement time.
    pub bid_hash: String,

    /// Revealed bid value; `None` until a successful reveal.
    pub bid_value: Option<u64>,

    /// Revealed nonce; `None` until a successful reveal.
    pub nonce: Option<String>,

    pub revealed: bool,
}

impl Bid {
    /// Create an unrevealed bid holding only its commitment.
    pub fn committed(client_id: impl Into<ClientId>, bid_hash: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            bid_hash: bid_hash.into(),
            bid_value: None,
            nonce: None,
            revealed: false,
        }
    }

    /// Record the opening of this bid.
    pub fn reveal(&mut self, bid_value: u64, nonce: impl Into<String>) {
        self.bid_value = Some(bid_value);
        self.nonce = Some(nonce.into());
        self.revealed = true;
    }

    /// The revealed value, if this bid has been opened.
    pub fn revealed_value(&self) -> Option<u64> {
        if self.revealed {
            self.bid_value
        } else {
            None
        }
    }
}

/// Auction aggregate: one per asset, stored under the asset key.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct Auction {
    pub asset: AssetId,

    /// Bids keyed by client; one per client, last placement wins.
    pub bids: BTreeMap<ClientId, Bid>,

    /// Asking prices keyed by client; last write wins.
    pub asks: BTreeMap<ClientId, u64>,

    // Timing
    pub start_time: Timestamp,
    pub bid_end: Timestamp,
    pub reveal_end: Timestamp,

    // Outcome
    pub awarded: bool,
    pub winner: Option<ClientId>,
}

impl Auction {
    /// Create an empty auction with the given schedule.
    pub fn new(
        asset: impl Into<AssetId>,
        start_time: Timestamp,
        bid_end: Timestamp,
        reveal_end: Timestamp,
    ) -> Self {
        Self {
            asset: asset.into(),
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            start_time,
            bid_end,
            reveal_end,
            awarded: false,
            winner: None,
        }
    }

    /// Get a client's bid.
    pub fn get_bid(&self, client_id: &str) -> Option<&Bid> {
        self.bids.get(client_id)
    }

    /// Get a client's mutable bid.
    pub fn get_bid_mut(&mut self, client_id: &str) -> Option<&mut Bid> {
        self.bids.get_mut(client_id)
    }

    /// Insert or replace a client's commitment.
    pub fn place_bid(&mut self, client_id: impl Into<ClientId>, bid_hash: impl Into<String>) {
        let bid = Bid::committed(client_id, bid_hash);
        self.bids.insert(bid.client_id.clone(), bid);
    }

    /// Insert or replace a client's asking price.
    pub fn place_ask(&mut self, client_id: impl Into<ClientId>, amount: u64) {
        self.asks.insert(client_id.into(), amount);
    }

    /// Get a client's asking price.
    pub fn get_ask(&self, client_id: &str) -> Option<u64> {
        self.asks.get(client_id).copied()
    }

    /// Revealed bids as `(client, value)`, in client order.
    pub fn revealed_bids(&self) -> Vec<(&str, u64)> {
        self.bids
            .iter()
            .filter_map(|(client, bid)| bid.revealed_value().map(|v| (client.as_str(), v)))
            .collect()
    }
}
