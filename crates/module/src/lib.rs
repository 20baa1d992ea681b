//! Sealed-bid commit-reveal auction engine.
//!
//! This module implements the auction lifecycle over an external key-value
//! ledger:
//!
//! - Auction creation with bidding and reveal windows
//! - Bid placement as SHA-256 commitments
//! - Reveal of `(value, nonce)` openings checked against the commitment
//! - One-shot award to the highest revealed bid
//! - An ask book recorded alongside the bids
//!
//! # Architecture
//!
//! - `call`: Message types for state-changing operations
//! - `handlers`: Business logic for processing calls
//! - `queries`: Read-only state access
//! - `state`: Ledger trait and the auction store adapter
//! - `phase`: Phase clock
//! - `selection`: Winner determination
//! - `config`: Engine configuration
//! - `error`: Error types
//!
//! Time is never read from the system clock; every call carries a
//! [`CallContext`] with the current timestamp.
//!
//! # Example
//!
//! ```
//! use auction_module::{handlers, AuctionStore, CallContext, MemoryLedger};
//!
//! let mut store = AuctionStore::with_defaults(MemoryLedger::new());
//! let hash = auction_crypto::commit(100, "n1");
//!
//! handlers::handle_init_auction(&mut store, &CallContext::at(0), "X", 5, 5)?;
//! handlers::handle_place_bid(&mut store, &CallContext::at(1), "X", "c1", &hash)?;
//! handlers::handle_reveal_bid(&mut store, &CallContext::at(6), "X", "c1", 100, "n1")?;
//! let winner = handlers::handle_award_slot(&mut store, &CallContext::at(11), "X")?;
//! assert_eq!(winner.as_deref(), Some("c1"));
//! # Ok::<(), auction_module::AuctionError>(())
//! ```

pub mod call;
pub mod config;
pub mod error;
pub mod handlers;
pub mod phase;
pub mod queries;
pub mod selection;
pub mod state;

pub use call::{dispatch, AuctionCall, CallOutcome};
pub use config::{ConfigValidationError, EngineConfig};
pub use error::{AuctionError, LedgerError};
pub use handlers::{CallContext, HandlerResult};
pub use phase::phase_at;
pub use queries::{AuctionQuery, AuctionQueryResponse, AuctionSummary};
pub use state::{AuctionStore, Ledger, MemoryLedger};
