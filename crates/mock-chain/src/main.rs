//! Mock chain server for local testing of the sealed-bid auction engine.
//!
//! This provides a JSON-RPC server that hosts an in-memory ledger and a
//! controllable clock, so the auction lifecycle can be driven end to end
//! without a real ledger or real waiting.

use anyhow::{Context, Result};
use clap::Parser;
use jsonrpsee::core::async_trait;
use jsonrpsee::proc_macros::rpc;
use jsonrpsee::server::Server;
use jsonrpsee::types::ErrorObjectOwned;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

use auction_module::queries::{get_auction_summary, handle_query};
use auction_module::{
    handlers, AuctionQuery, AuctionQueryResponse, AuctionStore, AuctionSummary, CallContext,
    EngineConfig, MemoryLedger,
};
use auction_types::Phase;

mod types;
use types::*;

/// Shared chain state.
struct ChainState {
    /// Auction store over the in-memory ledger
    store: AuctionStore<MemoryLedger>,
    /// Current timestamp (simulated, can be advanced)
    timestamp: u64,
}

impl ChainState {
    fn new(config: EngineConfig, timestamp: u64) -> Self {
        Self {
            store: AuctionStore::new(MemoryLedger::new(), config),
            timestamp,
        }
    }

    fn context(&self) -> CallContext {
        CallContext::at(self.timestamp)
    }

    fn advance_time(&mut self, seconds: u64) {
        self.timestamp = self.timestamp.saturating_add(seconds);
    }

    fn set_timestamp(&mut self, ts: u64) {
        self.timestamp = ts;
    }

    /// Asset ids of every stored auction.
    fn assets(&self) -> Vec<String> {
        let prefix = &self.store.config().key_prefix;
        self.store
            .ledger()
            .keys()
            .filter_map(|key| key.strip_prefix(prefix.as_str()))
            .map(str::to_string)
            .collect()
    }
}

/// RPC API definition for the mock chain.
#[rpc(server)]
pub trait MockChainApi {
    // ============ Admin Methods ============

    /// Set the current timestamp (for testing time-dependent logic).
    #[method(name = "admin_setTimestamp")]
    async fn admin_set_timestamp(&self, timestamp: u64) -> Result<bool, ErrorObjectOwned>;

    /// Move the clock forward.
    #[method(name = "admin_advanceTime")]
    async fn admin_advance_time(&self, seconds: u64) -> Result<TimeInfo, ErrorObjectOwned>;

    // ============ Auction Methods ============

    /// Create a new auction starting now.
    #[method(name = "auction_init")]
    async fn auction_init(&self, params: InitAuctionParams) -> Result<AuctionRpc, ErrorObjectOwned>;

    /// Commit to a bid.
    #[method(name = "auction_placeBid")]
    async fn auction_place_bid(&self, params: PlaceBidParams) -> Result<bool, ErrorObjectOwned>;

    /// Record an asking price.
    #[method(name = "auction_placeAsk")]
    async fn auction_place_ask(&self, params: PlaceAskParams) -> Result<bool, ErrorObjectOwned>;

    /// Reveal a committed bid.
    #[method(name = "auction_revealBid")]
    async fn auction_reveal_bid(&self, params: RevealBidParams) -> Result<bool, ErrorObjectOwned>;

    /// Award the auction to the highest revealed bid.
    #[method(name = "auction_award")]
    async fn auction_award(&self, asset: String) -> Result<AwardRpc, ErrorObjectOwned>;

    // ============ Query Methods ============

    /// Get the current chain time.
    #[method(name = "chain_getTime")]
    async fn chain_get_time(&self) -> Result<TimeInfo, ErrorObjectOwned>;

    /// Get auction by asset.
    #[method(name = "query_getAuction")]
    async fn query_get_auction(&self, asset: String)
        -> Result<Option<AuctionRpc>, ErrorObjectOwned>;

    /// Get the current phase of an auction.
    #[method(name = "query_getPhase")]
    async fn query_get_phase(&self, asset: String) -> Result<Option<Phase>, ErrorObjectOwned>;

    /// Get one client's bid.
    #[method(name = "query_getBid")]
    async fn query_get_bid(
        &self,
        asset: String,
        client_id: String,
    ) -> Result<Option<BidRpc>, ErrorObjectOwned>;

    /// Get all asks of an auction.
    #[method(name = "query_getAsks")]
    async fn query_get_asks(
        &self,
        asset: String,
    ) -> Result<Option<BTreeMap<String, u64>>, ErrorObjectOwned>;

    /// Get one client's ask.
    #[method(name = "query_getAsk")]
    async fn query_get_ask(
        &self,
        asset: String,
        client_id: String,
    ) -> Result<Option<u64>, ErrorObjectOwned>;

    /// Get the award status of an auction.
    #[method(name = "query_getWinner")]
    async fn query_get_winner(&self, asset: String) -> Result<WinnerRpc, ErrorObjectOwned>;

    /// List all auctions.
    #[method(name = "query_listAuctions")]
    async fn query_list_auctions(&self) -> Result<Vec<AuctionSummary>, ErrorObjectOwned>;
}

/// Implementation of the mock chain RPC server.
struct MockChainServer {
    state: Arc<RwLock<ChainState>>,
}

impl MockChainServer {
    fn new(config: EngineConfig, timestamp: u64) -> Self {
        Self {
            state: Arc::new(RwLock::new(ChainState::new(config, timestamp))),
        }
    }

    fn rpc_error(msg: &str) -> ErrorObjectOwned {
        ErrorObjectOwned::owned(-32000, msg.to_string(), None::<()>)
    }

    /// Answer a read-only query at the chain's current time.
    fn query(&self, query: AuctionQuery) -> Result<AuctionQueryResponse, ErrorObjectOwned> {
        let state = self.state.read();
        handle_query(&state.store, &state.context(), query)
            .map_err(|e| Self::rpc_error(&format!("Query failed: {}", e)))
    }

    fn unexpected(response: AuctionQueryResponse) -> ErrorObjectOwned {
        Self::rpc_error(&format!("Unexpected query response: {:?}", response))
    }
}

#[async_trait]
impl MockChainApiServer for MockChainServer {
    async fn admin_set_timestamp(&self, timestamp: u64) -> Result<bool, ErrorObjectOwned> {
        let mut state = self.state.write();
        if timestamp < state.timestamp {
            warn!(from = state.timestamp, to = timestamp, "Clock moved backwards");
        }
        state.set_timestamp(timestamp);
        info!("Timestamp set to {}", timestamp);
        Ok(true)
    }

    async fn admin_advance_time(&self, seconds: u64) -> Result<TimeInfo, ErrorObjectOwned> {
        let mut state = self.state.write();
        state.advance_time(seconds);
        Ok(TimeInfo {
            timestamp: state.timestamp,
        })
    }

    async fn auction_init(&self, params: InitAuctionParams) -> Result<AuctionRpc, ErrorObjectOwned> {
        let mut state = self.state.write();
        let ctx = state.context();

        let auction = handlers::handle_init_auction(
            &mut state.store,
            &ctx,
            &params.asset,
            params.bid_duration,
            params.reveal_duration,
        )
        .map_err(|e| Self::rpc_error(&format!("Failed to create auction: {}", e)))?;

        info!("Created auction for {}", params.asset);
        Ok(AuctionRpc::from_auction(&auction, ctx.timestamp))
    }

    async fn auction_place_bid(&self, params: PlaceBidParams) -> Result<bool, ErrorObjectOwned> {
        let mut state = self.state.write();
        let ctx = state.context();

        handlers::handle_place_bid(
            &mut state.store,
            &ctx,
            &params.asset,
            &params.client_id,
            &params.bid_hash,
        )
        .map_err(|e| Self::rpc_error(&format!("Failed to place bid: {}", e)))?;

        info!("Bid placed on {} by {}", params.asset, params.client_id);
        Ok(true)
    }

    async fn auction_place_ask(&self, params: PlaceAskParams) -> Result<bool, ErrorObjectOwned> {
        let mut state = self.state.write();
        let ctx = state.context();

        handlers::handle_place_ask(
            &mut state.store,
            &ctx,
            &params.asset,
            &params.client_id,
            params.amount,
        )
        .map_err(|e| Self::rpc_error(&format!("Failed to place ask: {}", e)))?;

        info!(
            "Ask of {} placed on {} by {}",
            params.amount, params.asset, params.client_id
        );
        Ok(true)
    }

    async fn auction_reveal_bid(&self, params: RevealBidParams) -> Result<bool, ErrorObjectOwned> {
        let mut state = self.state.write();
        let ctx = state.context();

        handlers::handle_reveal_bid(
            &mut state.store,
            &ctx,
            &params.asset,
            &params.client_id,
            params.bid_value,
            &params.nonce,
        )
        .map_err(|e| Self::rpc_error(&format!("Failed to reveal bid: {}", e)))?;

        info!("Bid revealed on {} by {}", params.asset, params.client_id);
        Ok(true)
    }

    async fn auction_award(&self, asset: String) -> Result<AwardRpc, ErrorObjectOwned> {
        let mut state = self.state.write();
        let ctx = state.context();

        let winner = handlers::handle_award_slot(&mut state.store, &ctx, &asset)
            .map_err(|e| Self::rpc_error(&format!("Failed to award: {}", e)))?;

        info!(
            "Auction {} awarded. Winner: {}",
            asset,
            winner.as_deref().unwrap_or("<none>")
        );
        Ok(AwardRpc {
            asset,
            winner,
            awarded_at: ctx.timestamp,
        })
    }

    async fn chain_get_time(&self) -> Result<TimeInfo, ErrorObjectOwned> {
        let state = self.state.read();
        Ok(TimeInfo {
            timestamp: state.timestamp,
        })
    }

    async fn query_get_auction(
        &self,
        asset: String,
    ) -> Result<Option<AuctionRpc>, ErrorObjectOwned> {
        let state = self.state.read();
        let ctx = state.context();
        match handle_query(&state.store, &ctx, AuctionQuery::GetAuction { asset }) {
            Ok(AuctionQueryResponse::Auction(auction)) => {
                Ok(auction.map(|a| AuctionRpc::from_auction(&a, ctx.timestamp)))
            }
            Ok(other) => Err(Self::unexpected(other)),
            Err(e) => Err(Self::rpc_error(&format!("Failed to load auction: {}", e))),
        }
    }

    async fn query_get_phase(&self, asset: String) -> Result<Option<Phase>, ErrorObjectOwned> {
        match self.query(AuctionQuery::GetPhase { asset })? {
            AuctionQueryResponse::Phase(phase) => Ok(phase),
            other => Err(Self::unexpected(other)),
        }
    }

    async fn query_get_bid(
        &self,
        asset: String,
        client_id: String,
    ) -> Result<Option<BidRpc>, ErrorObjectOwned> {
        match self.query(AuctionQuery::GetBid { asset, client_id })? {
            AuctionQueryResponse::Bid(bid) => Ok(bid.as_ref().map(BidRpc::from)),
            other => Err(Self::unexpected(other)),
        }
    }

    async fn query_get_asks(
        &self,
        asset: String,
    ) -> Result<Option<BTreeMap<String, u64>>, ErrorObjectOwned> {
        match self.query(AuctionQuery::GetAsks { asset })? {
            AuctionQueryResponse::Asks(asks) => Ok(asks),
            other => Err(Self::unexpected(other)),
        }
    }

    async fn query_get_ask(
        &self,
        asset: String,
        client_id: String,
    ) -> Result<Option<u64>, ErrorObjectOwned> {
        match self.query(AuctionQuery::GetAsk { asset, client_id })? {
            AuctionQueryResponse::Ask(ask) => Ok(ask),
            other => Err(Self::unexpected(other)),
        }
    }

    async fn query_get_winner(&self, asset: String) -> Result<WinnerRpc, ErrorObjectOwned> {
        match self.query(AuctionQuery::GetWinner { asset: asset.clone() })? {
            AuctionQueryResponse::Winner { awarded, winner } => Ok(WinnerRpc {
                asset,
                awarded,
                winner,
            }),
            other => Err(Self::unexpected(other)),
        }
    }

    async fn query_list_auctions(&self) -> Result<Vec<AuctionSummary>, ErrorObjectOwned> {
        let state = self.state.read();
        let ctx = state.context();
        let mut summaries = Vec::new();
        for asset in state.assets() {
            let summary = get_auction_summary(&state.store, &ctx, &asset)
                .map_err(|e| Self::rpc_error(&format!("Failed to load auction: {}", e)))?;
            summaries.extend(summary);
        }
        Ok(summaries)
    }
}

#[derive(Parser)]
#[command(name = "mock-chain")]
#[command(about = "Local mock ledger for sealed-bid auctions")]
struct Args {
    /// Address to serve JSON-RPC on
    #[arg(long, default_value = "127.0.0.1:9944")]
    listen: SocketAddr,

    /// Engine configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Starting clock value (unix timestamp); defaults to the system time
    #[arg(long)]
    initial_timestamp: Option<u64>,
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let config = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => EngineConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mock_chain=info".parse()?)
                .add_directive("auction_module=info".parse()?)
                .add_directive("jsonrpsee=warn".parse()?),
        )
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    let timestamp = match args.initial_timestamp {
        Some(ts) => ts,
        None => SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs(),
    };

    info!("Starting mock chain server on {} at t={}", args.listen, timestamp);

    let server = Server::builder().build(args.listen).await?;
    let handle = server.start(MockChainServer::new(config, timestamp).into_rpc());

    info!("Mock chain server running. Press Ctrl+C to stop.");

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutting down...");
    handle.stop()?;
    handle.stopped().await;

    Ok(())
}
