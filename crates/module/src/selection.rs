//! Winner determination.
//!
//! The winner is the revealed bid with the greatest value. Ties go to the
//! lexicographically smallest client id, so the outcome depends only on the
//! stored bids and never on map iteration order.
//!
//! There is deliberately no reserve floor: a revealed value of zero competes
//! like any other, so a lone zero reveal wins. Only an auction with no
//! reveals at all is awarded to nobody.

use std::cmp::Ordering;

use auction_types::{Auction, ClientId};

/// Result of winner computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinningBid {
    /// Winning client
    pub client_id: ClientId,
    /// Revealed value of the winning bid
    pub value: u64,
    /// Number of revealed bids considered
    pub num_revealed: u32,
}

/// Order two `(client, value)` candidates; the greater one wins.
fn rank(a: &(&str, u64), b: &(&str, u64)) -> Ordering {
    a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0))
}

/// Pick the best candidate from `(client, value)` pairs.
pub fn select_best<'a, I>(candidates: I) -> Option<(&'a str, u64)>
where
    I: IntoIterator<Item = (&'a str, u64)>,
{
    candidates.into_iter().max_by(rank)
}

/// Compute the winner among the auction's revealed bids.
///
/// Unrevealed commitments are ignored. Returns `None` when nothing was
/// revealed.
pub fn compute_winner(auction: &Auction) -> Option<WinningBid> {
    let revealed = auction.revealed_bids();
    let num_revealed = revealed.len() as u32;
    let (client, value) = select_best(revealed)?;

    Some(WinningBid {
        client_id: client.to_string(),
        value,
        num_revealed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn auction_with(reveals: &[(&str, Option<u64>)]) -> Auction {
        let mut auction = Auction::new("X", 0, 5, 10);
        for (client, value) in reveals {
            auction.place_bid(*client, "00".repeat(32));
            if let Some(v) = value {
                auction.get_bid_mut(client).unwrap().reveal(*v, "n");
            }
        }
        auction
    }

    #[test]
    fn test_highest_revealed_wins() {
        let auction = auction_with(&[("a", Some(100)), ("b", Some(200)), ("c", Some(150))]);
        let winner = compute_winner(&auction).unwrap();

        assert_eq!(winner.client_id, "b");
        assert_eq!(winner.value, 200);
        assert_eq!(winner.num_revealed, 3);
    }

    #[test]
    fn test_unrevealed_bids_ignored() {
        let auction = auction_with(&[("a", Some(100)), ("b", None)]);
        let winner = compute_winner(&auction).unwrap();

        assert_eq!(winner.client_id, "a");
        assert_eq!(winner.num_revealed, 1);
    }

    #[test]
    fn test_no_reveals_no_winner() {
        assert!(compute_winner(&auction_with(&[("a", None), ("b", None)])).is_none());
        assert!(compute_winner(&auction_with(&[])).is_none());
    }

    #[test]
    fn test_tie_goes_to_smallest_client_id() {
        let auction = auction_with(&[("zed", Some(500)), ("amy", Some(500)), ("bob", Some(400))]);
        assert_eq!(compute_winner(&auction).unwrap().client_id, "amy");
    }

    #[test]
    fn test_zero_value_reveal_can_win() {
        let auction = auction_with(&[("a", Some(0))]);
        let winner = compute_winner(&auction).unwrap();
        assert_eq!(winner.client_id, "a");
        assert_eq!(winner.value, 0);
    }

    #[test]
    fn test_select_best_independent_of_input_order() {
        let forward = select_best(vec![("c1", 7), ("c2", 9), ("c3", 9)]);
        let backward = select_best(vec![("c3", 9), ("c2", 9), ("c1", 7)]);
        assert_eq!(forward, Some(("c2", 9)));
        assert_eq!(forward, backward);
    }

    proptest! {
        #[test]
        fn winner_is_maximal_and_smallest_among_ties(
            bids in prop::collection::btree_map("[a-d]{1,3}", 0u64..5, 1..12),
        ) {
            let candidates: Vec<(&str, u64)> =
                bids.iter().map(|(c, v)| (c.as_str(), *v)).collect();
            let (client, value) = select_best(candidates.iter().copied()).unwrap();

            let max = *bids.values().max().unwrap();
            prop_assert_eq!(value, max);
            let smallest = bids.iter().find(|(_, v)| **v == max).map(|(c, _)| c.as_str());
            prop_assert_eq!(Some(client), smallest);

            let mut reversed = candidates.clone();
            reversed.reverse();
            prop_assert_eq!(select_best(reversed), Some((client, value)));
        }
    }
}
