//! CLI for interacting with sealed-bid auctions.
//!
//! This binary provides commands for:
//! - Computing commitments offline
//! - Creating auctions, bidding, asking, revealing and awarding
//! - Querying auction status
//! - Driving the mock chain's clock

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use rand::rngs::OsRng;
use tracing::info;

use auction_client::query::AuctionView;
use auction_client::{check_commitment, AuctionRpcClient, BidBuilder, PreparedBid};

#[derive(Parser)]
#[command(name = "auction-cli")]
#[command(about = "CLI for sealed-bid commit-reveal auctions")]
struct Cli {
    /// Mock chain RPC endpoint
    #[arg(long, default_value = "http://127.0.0.1:9944")]
    rpc: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a commitment without contacting the chain
    Commit {
        /// Bid amount
        #[arg(long)]
        amount: u64,

        /// Nonce to use (random if omitted)
        #[arg(long)]
        nonce: Option<String>,
    },

    /// Create a new auction starting at the chain's current time
    Init {
        /// Asset identifier
        #[arg(long)]
        asset: String,

        /// Bidding window (seconds)
        #[arg(long)]
        bid_duration: u64,

        /// Reveal window (seconds)
        #[arg(long)]
        reveal_duration: u64,
    },

    /// Commit to a bid
    Bid {
        #[arg(long)]
        asset: String,

        /// Bidder identifier
        #[arg(long)]
        client: String,

        /// Bid amount (only the commitment is sent)
        #[arg(long, required_unless_present = "hash")]
        amount: Option<u64>,

        /// Nonce to use (random if omitted)
        #[arg(long, conflicts_with = "hash")]
        nonce: Option<String>,

        /// Submit a commitment computed earlier with `commit`
        #[arg(long, conflicts_with = "amount")]
        hash: Option<String>,
    },

    /// Place or update an asking price
    Ask {
        #[arg(long)]
        asset: String,

        #[arg(long)]
        client: String,

        #[arg(long)]
        amount: u64,
    },

    /// Reveal a committed bid
    Reveal {
        #[arg(long)]
        asset: String,

        #[arg(long)]
        client: String,

        #[arg(long)]
        amount: u64,

        #[arg(long)]
        nonce: String,
    },

    /// Award the auction once the reveal window is over
    Award {
        #[arg(long)]
        asset: String,
    },

    /// Get auction details
    GetAuction {
        #[arg(long)]
        asset: String,
    },

    /// Show one client's bid
    GetBid {
        #[arg(long)]
        asset: String,

        #[arg(long)]
        client: String,
    },

    /// Show asks, or a single client's ask
    Asks {
        #[arg(long)]
        asset: String,

        #[arg(long)]
        client: Option<String>,
    },

    /// Show the award status
    Winner {
        #[arg(long)]
        asset: String,
    },

    /// List all auctions
    ListAuctions,

    /// Show an auction's current phase
    Phase {
        #[arg(long)]
        asset: String,
    },

    /// Set chain timestamp (for testing)
    SetTimestamp {
        /// Unix timestamp to set
        #[arg(long)]
        timestamp: u64,
    },

    /// Advance chain time (for testing)
    AdvanceTime {
        /// Seconds to advance
        #[arg(long)]
        seconds: u64,
    },
}

fn prepare_bid(amount: u64, nonce: Option<String>) -> Result<PreparedBid> {
    let mut builder = BidBuilder::new().bid_value(amount);
    if let Some(nonce) = nonce {
        builder = builder.nonce(nonce);
    }
    Ok(builder.build(&mut OsRng)?)
}

fn print_opening(bid: &PreparedBid) {
    println!("  Commitment: {}", bid.bid_hash);
    println!("  Amount: {}", bid.bid_value);
    println!("  Nonce: {}", bid.nonce);
}

fn print_auction(a: &AuctionView) {
    println!("Auction {}:", a.asset);
    println!("  Phase: {}", a.phase);
    println!("  Start: {}", a.start_time);
    println!("  Bid End: {}", a.bid_end);
    println!("  Reveal End: {}", a.reveal_end);
    if let Some(next) = a.next_transition {
        println!("  Next Transition: {}", next);
    }
    println!("  Bids: {}", a.bids.len());
    for bid in &a.bids {
        match bid.bid_value {
            Some(value) if bid.revealed => println!("    {} revealed {}", bid.client_id, value),
            _ => println!(
                "    {} committed {}...",
                bid.client_id,
                bid.bid_hash.get(..16).unwrap_or(&bid.bid_hash)
            ),
        }
    }
    println!("  Asks: {}", a.asks.len());
    for (client, amount) in &a.asks {
        println!("    {} asks {}", client, amount);
    }
    if a.awarded {
        println!("  Winner: {}", a.winner.as_deref().unwrap_or("<none>"));
    }
}

async fn bid_cmd(
    client: &AuctionRpcClient,
    asset: &str,
    bidder: &str,
    amount: Option<u64>,
    nonce: Option<String>,
    hash: Option<String>,
) -> Result<()> {
    if let Some(hash) = hash {
        check_commitment(&hash)?;
        client.place_bid(asset, bidder, &hash).await?;
        info!("Precomputed bid submitted for {}", asset);
        println!("Commitment {} submitted on {} by {}", hash, asset, bidder);
        return Ok(());
    }

    let amount = amount.ok_or_else(|| anyhow!("--amount is required without --hash"))?;
    let prepared = prepare_bid(amount, nonce)?;
    client.place_bid(asset, bidder, &prepared.bid_hash).await?;

    info!("Bid submitted for {}", asset);
    println!("Bid submitted successfully. Keep the nonce to reveal later:");
    print_opening(&prepared);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("auction_cli=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let client = AuctionRpcClient::connect(&cli.rpc)?;

    match cli.command {
        Commands::Commit { amount, nonce } => {
            let prepared = prepare_bid(amount, nonce)?;
            println!("Commitment prepared:");
            print_opening(&prepared);
        }

        Commands::Init {
            asset,
            bid_duration,
            reveal_duration,
        } => {
            let auction = client
                .init_auction(&asset, bid_duration, reveal_duration)
                .await?;
            info!("Created auction for {}", asset);
            print_auction(&auction);
        }

        Commands::Bid {
            asset,
            client: bidder,
            amount,
            nonce,
            hash,
        } => {
            bid_cmd(&client, &asset, &bidder, amount, nonce, hash).await?;
        }

        Commands::Ask {
            asset,
            client: asker,
            amount,
        } => {
            client.place_ask(&asset, &asker, amount).await?;
            println!("Ask of {} placed on {} by {}", amount, asset, asker);
        }

        Commands::Reveal {
            asset,
            client: bidder,
            amount,
            nonce,
        } => {
            client.reveal_bid(&asset, &bidder, amount, &nonce).await?;
            println!("Bid of {} revealed on {} by {}", amount, asset, bidder);
        }

        Commands::Award { asset } => {
            let award = client.award(&asset).await?;
            println!("Auction {} awarded at {}", award.asset, award.awarded_at);
            println!("  Winner: {}", award.winner.as_deref().unwrap_or("<none>"));
        }

        Commands::GetAuction { asset } => match client.get_auction(&asset).await? {
            Some(auction) => print_auction(&auction),
            None => println!("Auction {} not found", asset),
        },

        Commands::GetBid {
            asset,
            client: bidder,
        } => match client.get_bid(&asset, &bidder).await? {
            Some(bid) if bid.revealed => println!(
                "{} revealed {} on {}",
                bid.client_id,
                bid.bid_value.unwrap_or_default(),
                asset
            ),
            Some(bid) => println!("{} committed {} on {}", bid.client_id, bid.bid_hash, asset),
            None => println!("No bid from {} on {}", bidder, asset),
        },

        Commands::Asks {
            asset,
            client: Some(asker),
        } => match client.get_ask(&asset, &asker).await? {
            Some(amount) => println!("{} asks {} on {}", asker, amount, asset),
            None => println!("No ask from {} on {}", asker, asset),
        },

        Commands::Asks {
            asset,
            client: None,
        } => {
            let asks = client
                .get_asks(&asset)
                .await?
                .ok_or_else(|| anyhow!("Auction {} not found", asset))?;
            println!("Asks on {}: {}", asset, asks.len());
            for (asker, amount) in &asks {
                println!("  {} asks {}", asker, amount);
            }
        }

        Commands::Winner { asset } => {
            let status = client.get_winner(&asset).await?;
            if status.awarded {
                println!(
                    "{} awarded to {}",
                    status.asset,
                    status.winner.as_deref().unwrap_or("<none>")
                );
            } else {
                println!("{} not awarded yet", status.asset);
            }
        }

        Commands::ListAuctions => {
            let auctions = client.list_auctions().await?;
            if auctions.is_empty() {
                println!("No auctions found");
            } else {
                println!("Auctions:");
                for a in auctions {
                    println!(
                        "  [{}] {} ({} bids, {} revealed, {} asks)",
                        a.asset, a.phase, a.num_bids, a.num_revealed, a.num_asks
                    );
                }
            }
        }

        Commands::Phase { asset } => {
            let phase = client
                .get_phase(&asset)
                .await?
                .ok_or_else(|| anyhow!("Auction {} not found", asset))?;
            let time = client.get_time().await?;
            println!("{} is in phase {} at t={}", asset, phase, time.timestamp);
        }

        Commands::SetTimestamp { timestamp } => {
            client.set_timestamp(timestamp).await?;
            println!("Timestamp set to {}", timestamp);
        }

        Commands::AdvanceTime { seconds } => {
            let time = client.advance_time(seconds).await?;
            println!("Time advanced: timestamp={}", time.timestamp);
        }
    }

    Ok(())
}
