//! Call handlers for the auction module.
//!
//! Each handler loads one auction through the [`AuctionStore`], checks the
//! phase for the call's timestamp, validates every precondition, and only
//! then writes the updated aggregate back. A failed call leaves the ledger
//! untouched.

use auction_types::{Auction, ClientId, Phase, Timestamp};
use tracing::{debug, info, warn};

use crate::error::AuctionError;
use crate::phase::phase_at;
use crate::selection::compute_winner;
use crate::state::{AuctionStore, Ledger};

/// Context provided by the runtime for each call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallContext {
    /// Current timestamp (seconds since epoch)
    pub timestamp: Timestamp,
}

impl CallContext {
    pub fn at(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }
}

/// Result type for handlers.
pub type HandlerResult<T> = Result<T, AuctionError>;

fn require_phase(auction: &Auction, ctx: &CallContext, expected: Phase) -> HandlerResult<()> {
    let got = phase_at(ctx.timestamp, auction);
    if got != expected {
        debug!(
            asset = %auction.asset,
            timestamp = ctx.timestamp,
            %expected,
            %got,
            "Call rejected outside its phase"
        );
        return Err(AuctionError::WrongPhase { expected, got });
    }
    Ok(())
}

/// Handle InitAuction call.
pub fn handle_init_auction<L: Ledger>(
    store: &mut AuctionStore<L>,
    ctx: &CallContext,
    asset: &str,
    bid_duration: u64,
    reveal_duration: u64,
) -> HandlerResult<Auction> {
    if asset.is_empty() {
        return Err(AuctionError::InvalidAsset);
    }

    // Validate timing
    let config = store.config();
    if bid_duration > config.max_bid_duration || reveal_duration > config.max_reveal_duration {
        return Err(AuctionError::InvalidTiming);
    }
    let start_time = ctx.timestamp;
    let bid_end = start_time
        .checked_add(bid_duration)
        .ok_or(AuctionError::InvalidTiming)?;
    let reveal_end = bid_end
        .checked_add(reveal_duration)
        .ok_or(AuctionError::InvalidTiming)?;

    if store.contains_auction(asset)? {
        return Err(AuctionError::AlreadyExists(asset.to_string()));
    }

    let auction = Auction::new(asset, start_time, bid_end, reveal_end);
    store.put_auction(&auction)?;

    info!(asset, start_time, bid_end, reveal_end, "Auction initialized");
    Ok(auction)
}

/// Handle PlaceBid call.
pub fn handle_place_bid<L: Ledger>(
    store: &mut AuctionStore<L>,
    ctx: &CallContext,
    asset: &str,
    client_id: &str,
    bid_hash: &str,
) -> HandlerResult<()> {
    let mut auction = store.load_auction(asset)?;

    // Check bidding period
    require_phase(&auction, ctx, Phase::Bidding)?;

    let replaced = auction.bids.contains_key(client_id);
    auction.place_bid(client_id, bid_hash);
    store.put_auction(&auction)?;

    info!(asset, client_id, replaced, "Bid placed");
    Ok(())
}

/// Handle PlaceAsk call.
///
/// Asks are not phase-gated: they can be placed or updated at any time,
/// including after the auction is awarded.
pub fn handle_place_ask<L: Ledger>(
    store: &mut AuctionStore<L>,
    _ctx: &CallContext,
    asset: &str,
    client_id: &str,
    amount: u64,
) -> HandlerResult<()> {
    let mut auction = store.load_auction(asset)?;

    auction.place_ask(client_id, amount);
    store.put_auction(&auction)?;

    info!(asset, client_id, amount, "Ask placed");
    Ok(())
}

/// Handle RevealBid call.
pub fn handle_reveal_bid<L: Ledger>(
    store: &mut AuctionStore<L>,
    ctx: &CallContext,
    asset: &str,
    client_id: &str,
    bid_value: u64,
    nonce: &str,
) -> HandlerResult<()> {
    let mut auction = store.load_auction(asset)?;

    // Check reveal period
    require_phase(&auction, ctx, Phase::Reveal)?;

    let bid = auction
        .get_bid_mut(client_id)
        .ok_or_else(|| AuctionError::NoBidFound(client_id.to_string()))?;

    if !auction_crypto::verify(bid_value, nonce, &bid.bid_hash) {
        warn!(asset, client_id, "Reveal does not match commitment");
        return Err(AuctionError::HashMismatch);
    }

    bid.reveal(bid_value, nonce);
    store.put_auction(&auction)?;

    info!(asset, client_id, bid_value, "Bid revealed");
    Ok(())
}

/// Handle AwardSlot call.
///
/// Returns the winning client, or `None` if no bid was revealed. Either way
/// the auction is marked awarded and can never be awarded again.
pub fn handle_award_slot<L: Ledger>(
    store: &mut AuctionStore<L>,
    ctx: &CallContext,
    asset: &str,
) -> HandlerResult<Option<ClientId>> {
    let mut auction = store.load_auction(asset)?;

    // Check reveal window is over
    require_phase(&auction, ctx, Phase::Closed)?;

    // Check not already awarded
    if auction.awarded {
        return Err(AuctionError::AlreadyAwarded);
    }

    let winning = compute_winner(&auction);
    auction.winner = winning.as_ref().map(|w| w.client_id.clone());
    auction.awarded = true;
    store.put_auction(&auction)?;

    match &winning {
        Some(w) => info!(
            asset,
            winner = %w.client_id,
            value = w.value,
            num_revealed = w.num_revealed,
            "Auction awarded"
        ),
        None => info!(asset, "Auction awarded without a revealed bid"),
    }
    Ok(auction.winner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::state::MemoryLedger;
    use auction_crypto::commit;

    const T0: Timestamp = 1_700_000_000;

    fn setup() -> AuctionStore<MemoryLedger> {
        let mut store = AuctionStore::with_defaults(MemoryLedger::new());
        handle_init_auction(&mut store, &CallContext::at(T0), "SLOT001", 5, 5).unwrap();
        store
    }

    #[test]
    fn test_init_auction() {
        let store = setup();
        let auction = store.load_auction("SLOT001").unwrap();

        assert_eq!(auction.start_time, T0);
        assert_eq!(auction.bid_end, T0 + 5);
        assert_eq!(auction.reveal_end, T0 + 10);
        assert!(auction.bids.is_empty());
        assert!(auction.asks.is_empty());
        assert!(!auction.awarded);
        assert_eq!(auction.winner, None);
    }

    #[test]
    fn test_init_auction_twice_rejected() {
        let mut store = setup();
        let before = store.ledger().clone();

        let result = handle_init_auction(&mut store, &CallContext::at(T0 + 100), "SLOT001", 1, 1);
        assert_eq!(result, Err(AuctionError::AlreadyExists("SLOT001".to_string())));
        assert_eq!(store.ledger(), &before);
    }

    #[test]
    fn test_init_auction_invalid_timing() {
        let mut store = AuctionStore::with_defaults(MemoryLedger::new());

        let overflow = handle_init_auction(&mut store, &CallContext::at(u64::MAX - 1), "A", 1, 1);
        assert_eq!(overflow, Err(AuctionError::InvalidTiming));

        let config = EngineConfig {
            max_bid_duration: 60,
            ..Default::default()
        };
        let mut store = AuctionStore::new(MemoryLedger::new(), config);
        let too_long = handle_init_auction(&mut store, &CallContext::at(T0), "A", 61, 1);
        assert_eq!(too_long, Err(AuctionError::InvalidTiming));
        assert!(store.ledger().is_empty());
    }

    #[test]
    fn test_init_auction_long_windows_uncapped_by_default() {
        let mut store = AuctionStore::with_defaults(MemoryLedger::new());
        let days_31 = 31 * 24 * 3600;

        let auction =
            handle_init_auction(&mut store, &CallContext::at(0), "X", days_31, 5).unwrap();
        assert_eq!(auction.bid_end, days_31);
        assert_eq!(auction.reveal_end, days_31 + 5);

        let auction = handle_init_auction(&mut store, &CallContext::at(T0), "Y", 5, 400 * 24 * 3600)
            .unwrap();
        assert_eq!(auction.reveal_end, T0 + 5 + 400 * 24 * 3600);
    }

    #[test]
    fn test_init_auction_empty_asset() {
        let mut store = AuctionStore::with_defaults(MemoryLedger::new());
        let result = handle_init_auction(&mut store, &CallContext::at(T0), "", 5, 5);
        assert_eq!(result, Err(AuctionError::InvalidAsset));
    }

    #[test]
    fn test_place_bid_success() {
        let mut store = setup();
        let hash = commit(100, "n1");

        handle_place_bid(&mut store, &CallContext::at(T0 + 1), "SLOT001", "c1", &hash).unwrap();

        let auction = store.load_auction("SLOT001").unwrap();
        let bid = auction.get_bid("c1").unwrap();
        assert_eq!(bid.bid_hash, hash);
        assert!(!bid.revealed);
    }

    #[test]
    fn test_place_bid_at_bid_end_accepted() {
        let mut store = setup();
        let result = handle_place_bid(
            &mut store,
            &CallContext::at(T0 + 5),
            "SLOT001",
            "c1",
            &commit(1, "n"),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_place_bid_after_end() {
        let mut store = setup();
        let ctx = CallContext::at(T0 + 6);

        let result = handle_place_bid(&mut store, &ctx, "SLOT001", "c1", &commit(1, "n"));
        assert_eq!(
            result,
            Err(AuctionError::WrongPhase {
                expected: Phase::Bidding,
                got: Phase::Reveal
            })
        );
    }

    #[test]
    fn test_place_bid_after_end_with_prior_bid() {
        let mut store = setup();
        handle_place_bid(&mut store, &CallContext::at(T0), "SLOT001", "c1", &commit(1, "n")).unwrap();

        let result = handle_place_bid(
            &mut store,
            &CallContext::at(T0 + 20),
            "SLOT001",
            "c1",
            &commit(2, "n"),
        );
        assert!(matches!(result, Err(AuctionError::WrongPhase { .. })));
        assert_eq!(
            store.load_auction("SLOT001").unwrap().get_bid("c1").unwrap().bid_hash,
            commit(1, "n")
        );
    }

    #[test]
    fn test_place_bid_malformed_hash() {
        let mut store = setup();
        handle_place_bid(&mut store, &CallContext::at(T0), "SLOT001", "c1", "deadbeef").unwrap();
        assert_eq!(
            store.load_auction("SLOT001").unwrap().get_bid("c1").unwrap().bid_hash,
            "deadbeef"
        );

        // Stored verbatim; no opening can match it
        let result = handle_reveal_bid(&mut store, &CallContext::at(T0 + 6), "SLOT001", "c1", 1, "n");
        assert_eq!(result, Err(AuctionError::HashMismatch));
    }

    #[test]
    fn test_place_bid_missing_auction() {
        let mut store = setup();
        let result = handle_place_bid(&mut store, &CallContext::at(T0), "NOPE", "c1", &commit(1, "n"));
        assert_eq!(result, Err(AuctionError::NotFound("NOPE".to_string())));
    }

    #[test]
    fn test_reveal_bid_success() {
        let mut store = setup();
        handle_place_bid(&mut store, &CallContext::at(T0 + 1), "SLOT001", "c1", &commit(100, "n1"))
            .unwrap();

        handle_reveal_bid(&mut store, &CallContext::at(T0 + 6), "SLOT001", "c1", 100, "n1").unwrap();

        let bid = store.load_auction("SLOT001").unwrap().bids["c1"].clone();
        assert!(bid.revealed);
        assert_eq!(bid.bid_value, Some(100));
        assert_eq!(bid.nonce.as_deref(), Some("n1"));
    }

    #[test]
    fn test_reveal_bid_during_bidding() {
        let mut store = setup();
        handle_place_bid(&mut store, &CallContext::at(T0), "SLOT001", "c1", &commit(100, "n1")).unwrap();

        let result = handle_reveal_bid(&mut store, &CallContext::at(T0 + 5), "SLOT001", "c1", 100, "n1");
        assert_eq!(
            result,
            Err(AuctionError::WrongPhase {
                expected: Phase::Reveal,
                got: Phase::Bidding
            })
        );
    }

    #[test]
    fn test_reveal_bid_after_reveal_end() {
        let mut store = setup();
        handle_place_bid(&mut store, &CallContext::at(T0), "SLOT001", "c1", &commit(100, "n1")).unwrap();

        let result =
            handle_reveal_bid(&mut store, &CallContext::at(T0 + 11), "SLOT001", "c1", 100, "n1");
        assert!(matches!(
            result,
            Err(AuctionError::WrongPhase {
                got: Phase::Closed,
                ..
            })
        ));
    }

    #[test]
    fn test_reveal_bid_no_bid() {
        let mut store = setup();
        let result = handle_reveal_bid(&mut store, &CallContext::at(T0 + 6), "SLOT001", "c9", 1, "n");
        assert_eq!(result, Err(AuctionError::NoBidFound("c9".to_string())));
    }

    #[test]
    fn test_reveal_bid_hash_mismatch_leaves_bid_unrevealed() {
        let mut store = setup();
        handle_place_bid(&mut store, &CallContext::at(T0), "SLOT001", "c1", &commit(100, "n1")).unwrap();
        let before = store.ledger().clone();

        let wrong_nonce =
            handle_reveal_bid(&mut store, &CallContext::at(T0 + 6), "SLOT001", "c1", 100, "n2");
        let wrong_value =
            handle_reveal_bid(&mut store, &CallContext::at(T0 + 6), "SLOT001", "c1", 99, "n1");

        assert_eq!(wrong_nonce, Err(AuctionError::HashMismatch));
        assert_eq!(wrong_value, Err(AuctionError::HashMismatch));
        assert_eq!(store.ledger(), &before);
        assert!(!store.load_auction("SLOT001").unwrap().bids["c1"].revealed);
    }

    #[test]
    fn test_reveal_twice_is_noop() {
        let mut store = setup();
        handle_place_bid(&mut store, &CallContext::at(T0), "SLOT001", "c1", &commit(7, "s")).unwrap();
        handle_reveal_bid(&mut store, &CallContext::at(T0 + 6), "SLOT001", "c1", 7, "s").unwrap();
        let first = store.load_auction("SLOT001").unwrap();

        handle_reveal_bid(&mut store, &CallContext::at(T0 + 7), "SLOT001", "c1", 7, "s").unwrap();
        assert_eq!(store.load_auction("SLOT001").unwrap(), first);
    }

    #[test]
    fn test_award_slot_before_close() {
        let mut store = setup();
        let result = handle_award_slot(&mut store, &CallContext::at(T0 + 10), "SLOT001");
        assert_eq!(
            result,
            Err(AuctionError::WrongPhase {
                expected: Phase::Closed,
                got: Phase::Reveal
            })
        );
    }

    #[test]
    fn test_award_slot_no_reveals() {
        let mut store = setup();
        handle_place_bid(&mut store, &CallContext::at(T0), "SLOT001", "c1", &commit(5, "n")).unwrap();

        let winner = handle_award_slot(&mut store, &CallContext::at(T0 + 11), "SLOT001").unwrap();
        assert_eq!(winner, None);

        let auction = store.load_auction("SLOT001").unwrap();
        assert!(auction.awarded);
        assert_eq!(auction.winner, None);
    }

    #[test]
    fn test_award_slot_twice() {
        let mut store = setup();
        handle_place_bid(&mut store, &CallContext::at(T0), "SLOT001", "c1", &commit(5, "n")).unwrap();
        handle_reveal_bid(&mut store, &CallContext::at(T0 + 6), "SLOT001", "c1", 5, "n").unwrap();

        let first = handle_award_slot(&mut store, &CallContext::at(T0 + 11), "SLOT001").unwrap();
        assert_eq!(first.as_deref(), Some("c1"));

        let second = handle_award_slot(&mut store, &CallContext::at(T0 + 50), "SLOT001");
        assert_eq!(second, Err(AuctionError::AlreadyAwarded));
        assert_eq!(
            store.load_auction("SLOT001").unwrap().winner.as_deref(),
            Some("c1")
        );
    }

    #[test]
    fn test_place_ask_any_phase() {
        let mut store = setup();
        for (offset, amount) in [(0, 10), (6, 20), (11, 30)] {
            handle_place_ask(&mut store, &CallContext::at(T0 + offset), "SLOT001", "c1", amount)
                .unwrap();
        }
        handle_award_slot(&mut store, &CallContext::at(T0 + 12), "SLOT001").unwrap();
        handle_place_ask(&mut store, &CallContext::at(T0 + 13), "SLOT001", "c2", 40).unwrap();

        let auction = store.load_auction("SLOT001").unwrap();
        assert_eq!(auction.get_ask("c1"), Some(30));
        assert_eq!(auction.get_ask("c2"), Some(40));
        assert!(auction.awarded);
        assert_eq!(auction.winner, None);
    }

    #[test]
    fn test_place_ask_missing_auction() {
        let mut store = setup();
        let result = handle_place_ask(&mut store, &CallContext::at(T0), "NOPE", "c1", 1);
        assert_eq!(result, Err(AuctionError::NotFound("NOPE".to_string())));
    }
}
