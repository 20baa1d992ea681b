//! End-to-end integration tests for the sealed-bid auction engine.
//!
//! These tests exercise the full auction lifecycle against an in-memory
//! ledger, with synthetic timestamps instead of real waiting:
//! 1. Auction creation
//! 2. Commitment submission
//! 3. Reveal
//! 4. Award

use auction_client::{create_bid, BidBuilder};
use auction_crypto::commit;
use auction_module::handlers::{
    handle_award_slot, handle_init_auction, handle_place_ask, handle_place_bid, handle_reveal_bid,
};
use auction_module::{
    dispatch, AuctionCall, AuctionError, AuctionStore, CallContext, CallOutcome, EngineConfig,
    Ledger, LedgerError, MemoryLedger,
};
use auction_types::{Auction, Phase};

use rand::rngs::OsRng;

const T0: u64 = 1_700_000_000;

fn at(offset: u64) -> CallContext {
    CallContext::at(T0 + offset)
}

fn new_store() -> AuctionStore<MemoryLedger> {
    AuctionStore::with_defaults(MemoryLedger::new())
}

/// Test the complete auction flow.
#[test]
fn test_full_auction_flow() {
    let mut store = new_store();

    // ========================================
    // Phase 1: Create auction
    // ========================================

    handle_init_auction(&mut store, &at(0), "X", 5, 5).unwrap();

    // ========================================
    // Phase 2: Bidding
    // ========================================

    handle_place_bid(&mut store, &at(1), "X", "c1", &commit(100, "n1")).unwrap();
    handle_place_ask(&mut store, &at(1), "X", "c1", 500).unwrap();

    // ========================================
    // Phase 3: Reveal
    // ========================================

    handle_reveal_bid(&mut store, &at(6), "X", "c1", 100, "n1").unwrap();

    // ========================================
    // Phase 4: Award
    // ========================================

    let winner = handle_award_slot(&mut store, &at(11), "X").unwrap();
    assert_eq!(winner.as_deref(), Some("c1"));

    let auction = store.load_auction("X").unwrap();
    assert!(auction.awarded);
    assert_eq!(auction.winner.as_deref(), Some("c1"));
    assert_eq!(auction.get_ask("c1"), Some(500));
}

/// Competing bidders, one of which never reveals.
#[test]
fn test_highest_revealed_bid_wins() {
    let mut store = new_store();
    handle_init_auction(&mut store, &at(0), "SLOT", 10, 10).unwrap();

    let bids = [("alice", 300u64), ("bob", 450), ("carol", 900)];
    let prepared: Vec<_> = bids
        .iter()
        .map(|(client, value)| (*client, create_bid(*value, &mut OsRng)))
        .collect();

    for (client, bid) in &prepared {
        handle_place_bid(&mut store, &at(2), "SLOT", client, &bid.bid_hash).unwrap();
    }

    // carol committed the highest value but never opens it
    for (client, bid) in prepared.iter().filter(|(c, _)| *c != "carol") {
        handle_reveal_bid(&mut store, &at(15), "SLOT", client, bid.bid_value, &bid.nonce).unwrap();
    }

    let winner = handle_award_slot(&mut store, &at(21), "SLOT").unwrap();
    assert_eq!(winner.as_deref(), Some("bob"));
}

/// Equal maximal bids resolve to the smallest client id, whatever the order
/// of placement or reveal.
#[test]
fn test_tie_break_is_deterministic() {
    let orders: [[&str; 3]; 3] = [
        ["c2", "c1", "c3"],
        ["c3", "c2", "c1"],
        ["c1", "c3", "c2"],
    ];

    for order in orders {
        let mut store = new_store();
        handle_init_auction(&mut store, &at(0), "TIE", 5, 5).unwrap();

        for client in order {
            let value = if client == "c1" { 10 } else { 50 };
            let nonce = format!("nonce-{client}");
            handle_place_bid(&mut store, &at(1), "TIE", client, &commit(value, &nonce)).unwrap();
        }
        for client in order.iter().rev() {
            let value = if *client == "c1" { 10 } else { 50 };
            let nonce = format!("nonce-{client}");
            handle_reveal_bid(&mut store, &at(7), "TIE", client, value, &nonce).unwrap();
        }

        let winner = handle_award_slot(&mut store, &at(11), "TIE").unwrap();
        assert_eq!(winner.as_deref(), Some("c2"), "order {:?}", order);
    }
}

/// Boundary instants of each phase as seen through the handlers.
#[test]
fn test_phase_boundaries_through_handlers() {
    let mut store = new_store();
    let auction = handle_init_auction(&mut store, &at(0), "B", 5, 5).unwrap();
    assert_eq!(auction_module::phase_at(auction.bid_end, &auction), Phase::Bidding);
    assert_eq!(auction_module::phase_at(auction.bid_end + 1, &auction), Phase::Reveal);
    assert_eq!(auction_module::phase_at(auction.reveal_end, &auction), Phase::Reveal);
    assert_eq!(auction_module::phase_at(auction.reveal_end + 1, &auction), Phase::Closed);

    // Last bidding instant
    handle_place_bid(&mut store, &at(5), "B", "c1", &commit(1, "a")).unwrap();
    // First reveal instant
    assert!(matches!(
        handle_place_bid(&mut store, &at(6), "B", "c2", &commit(1, "a")),
        Err(AuctionError::WrongPhase { .. })
    ));
    // Last reveal instant
    handle_reveal_bid(&mut store, &at(10), "B", "c1", 1, "a").unwrap();
    assert!(matches!(
        handle_award_slot(&mut store, &at(10), "B"),
        Err(AuctionError::WrongPhase { .. })
    ));
    // First closed instant
    assert_eq!(
        handle_award_slot(&mut store, &at(11), "B").unwrap().as_deref(),
        Some("c1")
    );
}

#[test]
fn test_award_without_reveals() {
    let mut store = new_store();
    handle_init_auction(&mut store, &at(0), "EMPTY", 1, 1).unwrap();
    handle_place_bid(&mut store, &at(1), "EMPTY", "c1", &commit(9, "z")).unwrap();

    assert_eq!(handle_award_slot(&mut store, &at(3), "EMPTY").unwrap(), None);
    assert_eq!(
        handle_award_slot(&mut store, &at(4), "EMPTY"),
        Err(AuctionError::AlreadyAwarded)
    );

    let auction = store.load_auction("EMPTY").unwrap();
    assert!(auction.awarded);
    assert_eq!(auction.winner, None);
}

#[test]
fn test_asks_accepted_in_every_phase() {
    let mut store = new_store();
    handle_init_auction(&mut store, &at(0), "ASK", 5, 5).unwrap();
    handle_place_bid(&mut store, &at(0), "ASK", "b1", &commit(70, "k")).unwrap();
    handle_reveal_bid(&mut store, &at(6), "ASK", "b1", 70, "k").unwrap();
    handle_award_slot(&mut store, &at(11), "ASK").unwrap();
    let awarded = store.load_auction("ASK").unwrap();

    for (offset, client, amount) in [(0, "s1", 10), (6, "s2", 20), (11, "s3", 30), (99, "s1", 15)] {
        handle_place_ask(&mut store, &at(offset), "ASK", client, amount).unwrap();
    }

    let auction = store.load_auction("ASK").unwrap();
    assert_eq!(auction.get_ask("s1"), Some(15));
    assert_eq!(auction.asks.len(), 3);
    assert_eq!(auction.awarded, awarded.awarded);
    assert_eq!(auction.winner, awarded.winner);
}

#[test]
fn test_client_builder_openings_verify_in_engine() {
    let mut store = new_store();
    handle_init_auction(&mut store, &at(0), "CLI", 5, 5).unwrap();

    let bid = BidBuilder::new()
        .bid_value(1234)
        .nonce("blue-moon")
        .build(&mut OsRng)
        .unwrap();
    handle_place_bid(&mut store, &at(1), "CLI", "c1", &bid.bid_hash).unwrap();

    assert_eq!(
        handle_reveal_bid(&mut store, &at(6), "CLI", "c1", 1234, "blue-sun"),
        Err(AuctionError::HashMismatch)
    );
    handle_reveal_bid(&mut store, &at(6), "CLI", "c1", bid.bid_value, &bid.nonce).unwrap();
}

/// Calls arrive as borsh-encoded transactions.
#[test]
fn test_dispatch_encoded_calls() {
    let mut store = AuctionStore::new(MemoryLedger::new(), EngineConfig::with_key_prefix("auction/"));
    let txs = vec![
        (0, AuctionCall::InitAuction {
            asset: "ENC".into(),
            bid_duration: 5,
            reveal_duration: 5,
        }),
        (1, AuctionCall::PlaceBid {
            asset: "ENC".into(),
            client_id: "c1".into(),
            bid_hash: commit(42, "x"),
        }),
        (2, AuctionCall::PlaceAsk {
            asset: "ENC".into(),
            client_id: "c2".into(),
            amount: 40,
        }),
        (6, AuctionCall::RevealBid {
            asset: "ENC".into(),
            client_id: "c1".into(),
            bid_value: 42,
            nonce: "x".into(),
        }),
        (11, AuctionCall::AwardSlot { asset: "ENC".into() }),
    ];

    let mut last = None;
    for (offset, call) in txs {
        let bytes = borsh::to_vec(&call).unwrap();
        let decoded: AuctionCall = borsh::from_slice(&bytes).unwrap();
        last = Some(dispatch(&mut store, &at(offset), decoded).unwrap());
    }

    assert_eq!(last, Some(CallOutcome::Awarded(Some("c1".to_string()))));
    assert!(store.ledger().get_state("auction/ENC").unwrap().is_some());
}

/// Ledger that accepts reads but refuses every write.
struct ReadOnlyLedger {
    inner: MemoryLedger,
}

impl Ledger for ReadOnlyLedger {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        self.inner.get_state(key)
    }

    fn put_state(&mut self, key: &str, _value: Vec<u8>) -> Result<(), LedgerError> {
        Err(LedgerError::WriteRejected {
            key: key.to_string(),
            reason: "read-only".to_string(),
        })
    }

    fn del_state(&mut self, key: &str) -> Result<(), LedgerError> {
        Err(LedgerError::WriteRejected {
            key: key.to_string(),
            reason: "read-only".to_string(),
        })
    }
}

#[test]
fn test_ledger_write_failure_surfaces() {
    let mut inner = MemoryLedger::new();
    {
        let mut seed = AuctionStore::with_defaults(&mut inner);
        handle_init_auction(&mut seed, &at(0), "RO", 5, 5).unwrap();
    }
    let snapshot: Auction = AuctionStore::with_defaults(&mut inner).load_auction("RO").unwrap();

    let mut store = AuctionStore::with_defaults(ReadOnlyLedger { inner });
    let result = handle_place_bid(&mut store, &at(1), "RO", "c1", &commit(1, "a"));

    assert!(matches!(
        result,
        Err(AuctionError::Ledger(LedgerError::WriteRejected { .. }))
    ));
    assert_eq!(store.load_auction("RO").unwrap(), snapshot);
}
