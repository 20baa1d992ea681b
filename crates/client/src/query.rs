//! JSON-RPC access to the mock chain.

use std::collections::BTreeMap;

use jsonrpsee::core::client::ClientT;
use jsonrpsee::core::ClientError;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeInfo {
    pub timestamp: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidView {
    pub client_id: String,
    pub bid_hash: String,
    pub revealed: bool,
    pub bid_value: Option<u64>,
    pub nonce: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuctionView {
    pub asset: String,
    pub phase: String,
    pub start_time: u64,
    pub bid_end: u64,
    pub reveal_end: u64,
    pub next_transition: Option<u64>,
    pub bids: Vec<BidView>,
    pub asks: BTreeMap<String, u64>,
    pub awarded: bool,
    pub winner: Option<String>,
}

/// Compact listing entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryView {
    pub asset: String,
    pub phase: String,
    pub start_time: u64,
    pub bid_end: u64,
    pub reveal_end: u64,
    pub next_transition: Option<u64>,
    pub num_bids: usize,
    pub num_revealed: usize,
    pub num_asks: usize,
    pub awarded: bool,
    pub winner: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WinnerView {
    pub asset: String,
    pub awarded: bool,
    pub winner: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwardView {
    pub asset: String,
    pub winner: Option<String>,
    pub awarded_at: u64,
}

/// Typed wrapper over the mock chain's RPC methods.
pub struct AuctionRpcClient {
    client: HttpClient,
}

impl AuctionRpcClient {
    /// Connect to an RPC endpoint.
    pub fn connect(url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            client: HttpClientBuilder::default().build(url)?,
        })
    }

    pub async fn init_auction(
        &self,
        asset: &str,
        bid_duration: u64,
        reveal_duration: u64,
    ) -> Result<AuctionView, ClientError> {
        let params = json!({
            "asset": asset,
            "bid_duration": bid_duration,
            "reveal_duration": reveal_duration
        });
        self.client.request("auction_init", vec![params]).await
    }

    pub async fn place_bid(
        &self,
        asset: &str,
        client_id: &str,
        bid_hash: &str,
    ) -> Result<bool, ClientError> {
        let params = json!({
            "asset": asset,
            "client_id": client_id,
            "bid_hash": bid_hash
        });
        self.client.request("auction_placeBid", vec![params]).await
    }

    pub async fn place_ask(
        &self,
        asset: &str,
        client_id: &str,
        amount: u64,
    ) -> Result<bool, ClientError> {
        let params = json!({
            "asset": asset,
            "client_id": client_id,
            "amount": amount
        });
        self.client.request("auction_placeAsk", vec![params]).await
    }

    pub async fn reveal_bid(
        &self,
        asset: &str,
        client_id: &str,
        bid_value: u64,
        nonce: &str,
    ) -> Result<bool, ClientError> {
        let params = json!({
            "asset": asset,
            "client_id": client_id,
            "bid_value": bid_value,
            "nonce": nonce
        });
        self.client.request("auction_revealBid", vec![params]).await
    }

    pub async fn award(&self, asset: &str) -> Result<AwardView, ClientError> {
        self.client.request("auction_award", vec![asset]).await
    }

    pub async fn get_auction(&self, asset: &str) -> Result<Option<AuctionView>, ClientError> {
        self.client.request("query_getAuction", vec![asset]).await
    }

    pub async fn get_phase(&self, asset: &str) -> Result<Option<String>, ClientError> {
        self.client.request("query_getPhase", vec![asset]).await
    }

    pub async fn get_bid(
        &self,
        asset: &str,
        client_id: &str,
    ) -> Result<Option<BidView>, ClientError> {
        self.client
            .request("query_getBid", vec![asset, client_id])
            .await
    }

    pub async fn get_asks(
        &self,
        asset: &str,
    ) -> Result<Option<BTreeMap<String, u64>>, ClientError> {
        self.client.request("query_getAsks", vec![asset]).await
    }

    pub async fn get_ask(&self, asset: &str, client_id: &str) -> Result<Option<u64>, ClientError> {
        self.client
            .request("query_getAsk", vec![asset, client_id])
            .await
    }

    pub async fn get_winner(&self, asset: &str) -> Result<WinnerView, ClientError> {
        self.client.request("query_getWinner", vec![asset]).await
    }

    pub async fn list_auctions(&self) -> Result<Vec<SummaryView>, ClientError> {
        self.client
            .request("query_listAuctions", Vec::<()>::new())
            .await
    }

    pub async fn get_time(&self) -> Result<TimeInfo, ClientError> {
        self.client.request("chain_getTime", Vec::<()>::new()).await
    }

    pub async fn set_timestamp(&self, timestamp: u64) -> Result<bool, ClientError> {
        self.client
            .request("admin_setTimestamp", vec![timestamp])
            .await
    }

    pub async fn advance_time(&self, seconds: u64) -> Result<TimeInfo, ClientError> {
        self.client.request("admin_advanceTime", vec![seconds]).await
    }
}
