//! Print the total staked in a pool from a JSON dump of its stake entries.
//!
//! Usage: cargo run --bin total_staked -- --settings config/settings.json

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::info;

use stake_pool_console::{
    config::Settings,
    notify::{LogNotifier, Notification, Notifier},
    pool::stats::{percent_staked, total_staked_label},
    tokens::StakeEntry,
    totals::{compute_total_staked, decimals::RpcMintDecimals},
};

#[derive(Debug, Parser)]
#[command(name = "total_staked", about = "Sum a stake pool's entries")]
struct Args {
    /// Settings file.
    #[arg(long, default_value = "config/settings.json")]
    settings: PathBuf,

    /// Stake entries dump; overrides `entries_file` from the settings.
    #[arg(long)]
    entries: Option<PathBuf>,

    /// Pool capacity, for the "/ max" suffix and the percentage.
    #[arg(long)]
    max_staked: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let settings = Settings::load_from_file(&args.settings)?;
    let entries_path = args
        .entries
        .unwrap_or_else(|| PathBuf::from(&settings.entries_file));
    let entries = StakeEntry::load_all(&entries_path)?;
    info!(
        "📂 [TOTAL_STAKED] Loaded {} entries for pool {} from {:?}",
        entries.len(),
        settings.stake_pool_id,
        entries_path
    );

    let decimals = RpcMintDecimals::new(settings.rpc_client.clone());
    let total = compute_total_staked(Some(entries.as_slice()), &decimals).await;
    LogNotifier.notify(Notification::success(format!(
        "Total staked for pool {}: {}",
        settings.stake_pool_id, total
    )));

    println!("Total staked: {}", total_staked_label(&total, args.max_staked));
    if let Some(pct) = args
        .max_staked
        .and_then(|max| percent_staked(entries.len(), max))
    {
        println!("Percent staked: {pct}%");
    }

    Ok(())
}
