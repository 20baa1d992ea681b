//! Query handlers for the auction module.
//!
//! These functions provide read-only access to auction state.

use std::collections::BTreeMap;

use auction_types::{Auction, Bid, ClientId, Phase, Timestamp};
use serde::{Deserialize, Serialize};

use crate::handlers::{CallContext, HandlerResult};
use crate::phase::{next_transition, phase_at};
use crate::state::{AuctionStore, Ledger};

/// Query request types.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuctionQuery {
    /// Get the full auction aggregate.
    GetAuction { asset: String },

    /// Get a specific bid.
    GetBid { asset: String, client_id: ClientId },

    /// Get all asks for an auction.
    GetAsks { asset: String },

    /// Get a specific ask.
    GetAsk { asset: String, client_id: ClientId },

    /// Get the auction's current phase.
    GetPhase { asset: String },

    /// Get the award status.
    GetWinner { asset: String },
}

/// Query response types.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuctionQueryResponse {
    /// Auction details.
    Auction(Option<Auction>),

    /// Single bid.
    Bid(Option<Bid>),

    /// Asks for an auction (`None` if the auction does not exist).
    Asks(Option<BTreeMap<ClientId, u64>>),

    /// Single ask.
    Ask(Option<u64>),

    /// Current phase.
    Phase(Option<Phase>),

    /// Award status.
    Winner {
        awarded: bool,
        winner: Option<ClientId>,
    },
}

/// Handle a query.
///
/// Missing auctions are reported as empty responses rather than errors; only
/// ledger and codec failures surface as `Err`.
pub fn handle_query<L: Ledger>(
    store: &AuctionStore<L>,
    ctx: &CallContext,
    query: AuctionQuery,
) -> HandlerResult<AuctionQueryResponse> {
    let response = match query {
        AuctionQuery::GetAuction { asset } => {
            AuctionQueryResponse::Auction(store.get_auction(&asset)?)
        }

        AuctionQuery::GetBid { asset, client_id } => {
            let bid = store
                .get_auction(&asset)?
                .and_then(|mut a| a.bids.remove(&client_id));
            AuctionQueryResponse::Bid(bid)
        }

        AuctionQuery::GetAsks { asset } => {
            AuctionQueryResponse::Asks(store.get_auction(&asset)?.map(|a| a.asks))
        }

        AuctionQuery::GetAsk { asset, client_id } => {
            let ask = store
                .get_auction(&asset)?
                .and_then(|a| a.get_ask(&client_id));
            AuctionQueryResponse::Ask(ask)
        }

        AuctionQuery::GetPhase { asset } => {
            let phase = store
                .get_auction(&asset)?
                .map(|a| phase_at(ctx.timestamp, &a));
            AuctionQueryResponse::Phase(phase)
        }

        AuctionQuery::GetWinner { asset } => {
            let (awarded, winner) = store
                .get_auction(&asset)?
                .map(|a| (a.awarded, a.winner))
                .unwrap_or((false, None));
            AuctionQueryResponse::Winner { awarded, winner }
        }
    };

    Ok(response)
}

/// Summary of an auction for listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionSummary {
    pub asset: String,
    pub phase: Phase,
    pub start_time: Timestamp,
    pub bid_end: Timestamp,
    pub reveal_end: Timestamp,
    pub next_transition: Option<Timestamp>,
    pub num_bids: usize,
    pub num_revealed: usize,
    pub num_asks: usize,
    pub awarded: bool,
    pub winner: Option<ClientId>,
}

impl AuctionSummary {
    /// Create summary from an auction at time `now`.
    pub fn from_auction(auction: &Auction, now: Timestamp) -> Self {
        Self {
            asset: auction.asset.clone(),
            phase: phase_at(now, auction),
            start_time: auction.start_time,
            bid_end: auction.bid_end,
            reveal_end: auction.reveal_end,
            next_transition: next_transition(now, auction),
            num_bids: auction.bids.len(),
            num_revealed: auction.bids.values().filter(|b| b.revealed).count(),
            num_asks: auction.asks.len(),
            awarded: auction.awarded,
            winner: auction.winner.clone(),
        }
    }
}

/// Get an auction summary, if the auction exists.
pub fn get_auction_summary<L: Ledger>(
    store: &AuctionStore<L>,
    ctx: &CallContext,
    asset: &str,
) -> HandlerResult<Option<AuctionSummary>> {
    Ok(store
        .get_auction(asset)?
        .map(|a| AuctionSummary::from_auction(&a, ctx.timestamp)))
}
