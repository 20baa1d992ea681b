//! Phase clock.
//!
//! Maps an auction schedule and the current time onto a [`Phase`]:
//!
//! ```text
//! Bidding  = [.., bid_end]
//! Reveal   = (bid_end, reveal_end]
//! Closed   = (reveal_end, ..)
//! ```
//!
//! `bid_end` is the last valid bidding instant and `reveal_end` the last
//! valid reveal instant; both boundaries are inclusive on the earlier phase.

use auction_types::{Auction, Phase, Timestamp};

/// Phase of `auction` at time `now`.
pub fn phase_at(now: Timestamp, auction: &Auction) -> Phase {
    if now <= auction.bid_end {
        Phase::Bidding
    } else if now <= auction.reveal_end {
        Phase::Reveal
    } else {
        Phase::Closed
    }
}

/// First instant at which the auction leaves its current phase.
///
/// Returns `None` once the auction is closed.
pub fn next_transition(now: Timestamp, auction: &Auction) -> Option<Timestamp> {
    match phase_at(now, auction) {
        Phase::Bidding => auction.bid_end.checked_add(1),
        Phase::Reveal => auction.reveal_end.checked_add(1),
        Phase::Closed => None,
    }
}
