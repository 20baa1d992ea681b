//! Call message types for the auction module.

use auction_types::{Auction, ClientId};
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::handlers::{self, CallContext, HandlerResult};
use crate::state::{AuctionStore, Ledger};

/// Call messages for the auction module.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub enum AuctionCall {
    /// Open a new auction for an asset, starting now.
    InitAuction {
        asset: String,
        bid_duration: u64,
        reveal_duration: u64,
    },

    /// Commit to a bid during the bidding phase.
    PlaceBid {
        asset: String,
        client_id: ClientId,
        bid_hash: String,
    },

    /// Record an asking price (any phase).
    PlaceAsk {
        asset: String,
        client_id: ClientId,
        amount: u64,
    },

    /// Open a committed bid during the reveal phase.
    RevealBid {
        asset: String,
        client_id: ClientId,
        bid_value: u64,
        nonce: String,
    },

    /// Pick the winner once the reveal phase is over.
    AwardSlot { asset: String },
}

impl AuctionCall {
    /// Asset the call targets.
    pub fn asset(&self) -> &str {
        match self {
            AuctionCall::InitAuction { asset, .. }
            | AuctionCall::PlaceBid { asset, .. }
            | AuctionCall::PlaceAsk { asset, .. }
            | AuctionCall::RevealBid { asset, .. }
            | AuctionCall::AwardSlot { asset } => asset,
        }
    }

    /// Operation name, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            AuctionCall::InitAuction { .. } => "InitAuction",
            AuctionCall::PlaceBid { .. } => "PlaceBid",
            AuctionCall::PlaceAsk { .. } => "PlaceAsk",
            AuctionCall::RevealBid { .. } => "RevealBid",
            AuctionCall::AwardSlot { .. } => "AwardSlot",
        }
    }
}

/// Successful outcome of a dispatched call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallOutcome {
    /// A new auction was created.
    Initialized(Auction),
    /// The call was applied.
    Accepted,
    /// The auction was awarded to the given client (or to nobody).
    Awarded(Option<ClientId>),
}

/// Route a call message to its handler.
pub fn dispatch<L: Ledger>(
    store: &mut AuctionStore<L>,
    ctx: &CallContext,
    call: AuctionCall,
) -> HandlerResult<CallOutcome> {
    debug!(
        call = call.name(),
        asset = call.asset(),
        timestamp = ctx.timestamp,
        "Dispatching call"
    );

    match call {
        AuctionCall::InitAuction {
            asset,
            bid_duration,
            reveal_duration,
        } => handlers::handle_init_auction(store, ctx, &asset, bid_duration, reveal_duration)
            .map(CallOutcome::Initialized),

        AuctionCall::PlaceBid {
            asset,
            client_id,
            bid_hash,
        } => handlers::handle_place_bid(store, ctx, &asset, &client_id, &bid_hash)
            .map(|()| CallOutcome::Accepted),

        AuctionCall::PlaceAsk {
            asset,
            client_id,
            amount,
        } => handlers::handle_place_ask(store, ctx, &asset, &client_id, amount)
            .map(|()| CallOutcome::Accepted),

        AuctionCall::RevealBid {
            asset,
            client_id,
            bid_value,
            nonce,
        } => handlers::handle_reveal_bid(store, ctx, &asset, &client_id, bid_value, &nonce)
            .map(|()| CallOutcome::Accepted),

        AuctionCall::AwardSlot { asset } => {
            handlers::handle_award_slot(store, ctx, &asset).map(CallOutcome::Awarded)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuctionError;
    use crate::state::MemoryLedger;
    use auction_crypto::commit;

    #[test]
    fn test_call_borsh_round_trip() {
        let call = AuctionCall::RevealBid {
            asset: "X".to_string(),
            client_id: "c1".to_string(),
            bid_value: 100,
            nonce: "n1".to_string(),
        };
        let bytes = borsh::to_vec(&call).unwrap();
        assert_eq!(borsh::from_slice::<AuctionCall>(&bytes).unwrap(), call);
        assert_eq!(call.asset(), "X");
        assert_eq!(call.name(), "RevealBid");
    }

    #[test]
    fn test_dispatch_lifecycle() {
        let mut store = AuctionStore::with_defaults(MemoryLedger::new());
        let calls = [
            (0, AuctionCall::InitAuction {
                asset: "X".into(),
                bid_duration: 5,
                reveal_duration: 5,
            }),
            (1, AuctionCall::PlaceBid {
                asset: "X".into(),
                client_id: "c1".into(),
                bid_hash: commit(100, "n1"),
            }),
            (6, AuctionCall::RevealBid {
                asset: "X".into(),
                client_id: "c1".into(),
                bid_value: 100,
                nonce: "n1".into(),
            }),
        ];
        for (t, call) in calls {
            dispatch(&mut store, &CallContext::at(t), call).unwrap();
        }

        let outcome = dispatch(
            &mut store,
            &CallContext::at(11),
            AuctionCall::AwardSlot { asset: "X".into() },
        );
        assert_eq!(outcome, Ok(CallOutcome::Awarded(Some("c1".to_string()))));
    }

    #[test]
    fn test_dispatch_propagates_errors() {
        let mut store = AuctionStore::with_defaults(MemoryLedger::new());
        let outcome = dispatch(
            &mut store,
            &CallContext::at(0),
            AuctionCall::PlaceAsk {
                asset: "missing".into(),
                client_id: "c1".into(),
                amount: 3,
            },
        );
        assert_eq!(outcome, Err(AuctionError::NotFound("missing".to_string())));
    }
}
