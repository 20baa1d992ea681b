//! Ledger-backed state for the auction module.
//!
//! The engine never touches a global store: every call receives an
//! [`AuctionStore`] wrapping the caller's [`Ledger`]. Auctions are stored as
//! borsh-encoded blobs under `<key_prefix><asset>`.

use std::collections::BTreeMap;

use auction_types::Auction;

use crate::config::EngineConfig;
use crate::error::{AuctionError, LedgerError};

/// Key-value ledger collaborator.
///
/// Implementations are expected to make a `get_state` followed by a
/// `put_state` on the same key atomic within the surrounding transaction.
pub trait Ledger {
    /// Read the value stored at `key`.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;

    /// Store `value` at `key`, replacing any previous value.
    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), LedgerError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn del_state(&mut self, key: &str) -> Result<(), LedgerError>;
}

impl<L: Ledger + ?Sized> Ledger for &mut L {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        (**self).get_state(key)
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        (**self).put_state(key, value)
    }

    fn del_state(&mut self, key: &str) -> Result<(), LedgerError> {
        (**self).del_state(key)
    }
}

/// In-memory ledger.
///
/// Used by the mock chain and by tests; a real deployment plugs in the
/// ledger's own transaction stub instead.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryLedger {
    entries: BTreeMap<String, Vec<u8>>,
    writes: u64,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of successful `put_state` calls so far.
    pub fn write_count(&self) -> u64 {
        self.writes
    }

    /// Iterate over stored keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl Ledger for MemoryLedger {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        Ok(self.entries.get(key).cloned())
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        self.entries.insert(key.to_string(), value);
        self.writes += 1;
        Ok(())
    }

    fn del_state(&mut self, key: &str) -> Result<(), LedgerError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Encode an auction for storage.
pub fn encode_auction(auction: &Auction) -> Result<Vec<u8>, AuctionError> {
    borsh::to_vec(auction).map_err(|e| AuctionError::Codec(e.to_string()))
}

/// Decode a stored auction.
pub fn decode_auction(bytes: &[u8]) -> Result<Auction, AuctionError> {
    borsh::from_slice(bytes).map_err(|e| AuctionError::Codec(e.to_string()))
}

/// Auction store adapter over a ledger.
#[derive(Debug)]
pub struct AuctionStore<L> {
    ledger: L,
    config: EngineConfig,
}

impl<L: Ledger> AuctionStore<L> {
    /// Create a store with an explicit configuration.
    pub fn new(ledger: L, config: EngineConfig) -> Self {
        Self { ledger, config }
    }

    /// Create a store with the default configuration.
    pub fn with_defaults(ledger: L) -> Self {
        Self::new(ledger, EngineConfig::default())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Ledger key for an asset.
    pub fn key(&self, asset: &str) -> String {
        format!("{}{}", self.config.key_prefix, asset)
    }

    /// Get auction by asset, if one exists.
    pub fn get_auction(&self, asset: &str) -> Result<Option<Auction>, AuctionError> {
        self.ledger
            .get_state(&self.key(asset))?
            .map(|bytes| decode_auction(&bytes))
            .transpose()
    }

    /// Get auction by asset, failing with `NotFound` if absent.
    pub fn load_auction(&self, asset: &str) -> Result<Auction, AuctionError> {
        self.get_auction(asset)?
            .ok_or_else(|| AuctionError::NotFound(asset.to_string()))
    }

    /// Whether an auction exists for `asset`.
    pub fn contains_auction(&self, asset: &str) -> Result<bool, AuctionError> {
        Ok(self.ledger.get_state(&self.key(asset))?.is_some())
    }

    /// Persist an auction under its asset key.
    pub fn put_auction(&mut self, auction: &Auction) -> Result<(), AuctionError> {
        let bytes = encode_auction(auction)?;
        let key = self.key(&auction.asset);
        self.ledger.put_state(&key, bytes)?;
        Ok(())
    }
}
