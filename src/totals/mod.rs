//! "Total staked" aggregation over the pool's stake entries.
//!
//! Amount-bearing entries count as `amount / 10^decimals` of their original
//! mint, single-unit entries count as one. Decimals are looked up once per
//! distinct mint per pass, sequentially, and the sum is rounded up.

pub mod decimals;

use std::collections::HashMap;

use anyhow::Result;
use log::{info, warn};
use num::{BigInt, BigRational, BigUint, One, Zero};
use solana_sdk::pubkey::Pubkey;

use crate::tokens::StakeEntry;
use decimals::MintDecimals;

/// Decimals resolved during one aggregation pass. Never reused across passes.
#[derive(Debug, Default)]
pub struct MintDecimalsCache {
    decimals: HashMap<Pubkey, u8>,
}

impl MintDecimalsCache {
    pub fn get(&self, mint: &Pubkey) -> Option<u8> {
        self.decimals.get(mint).copied()
    }

    pub fn len(&self) -> usize {
        self.decimals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decimals.is_empty()
    }

    /// Cached value, or one external lookup whose result is kept for the pass.
    /// Failed lookups are not cached.
    pub async fn resolve<D: MintDecimals + ?Sized>(&mut self, mint: &Pubkey, source: &D) -> Result<u8> {
        if let Some(decimals) = self.get(mint) {
            return Ok(decimals);
        }
        let decimals = source.mint_decimals(mint).await?;
        self.decimals.insert(*mint, decimals);
        Ok(decimals)
    }
}

/// `raw / 10^decimals` as an exact fraction.
pub fn normalize_amount(raw: &BigUint, decimals: u8) -> BigRational {
    let scale = BigUint::from(10u32).pow(u32::from(decimals));
    BigRational::new(BigInt::from(raw.clone()), BigInt::from(scale))
}

async fn entry_contribution<D: MintDecimals + ?Sized>(
    entry: &StakeEntry,
    cache: &mut MintDecimalsCache,
    source: &D,
) -> Result<BigRational> {
    if !entry.is_amount_bearing() {
        return Ok(BigRational::one());
    }
    let decimals = cache.resolve(&entry.original_mint, source).await?;
    Ok(normalize_amount(&entry.amount, decimals))
}

/// Total staked across `entries`, as the decimal string of the rounded-up sum.
///
/// `None` (entries not loaded yet) yields `"0"`. A failing entry is logged and
/// skipped; it never aborts the pass.
pub async fn compute_total_staked<D: MintDecimals + ?Sized>(
    entries: Option<&[StakeEntry]>,
    source: &D,
) -> String {
    let Some(entries) = entries else {
        return "0".to_string();
    };

    let mut cache = MintDecimalsCache::default();
    let mut total = BigRational::zero();
    let mut skipped = 0usize;

    for entry in entries {
        match entry_contribution(entry, &mut cache, source).await {
            Ok(amount) => total += amount,
            Err(e) => {
                warn!("⚠️ [TOTAL_STAKED] Skipping stake entry {}: {:#}", entry.pubkey, e);
                skipped += 1;
            }
        }
    }

    let rounded = total.ceil().to_integer();
    info!(
        "🧮 [TOTAL_STAKED] {} entries, {} distinct mints looked up, {} skipped -> {}",
        entries.len(),
        cache.len(),
        skipped,
        rounded
    );
    rounded.to_string()
}

/// Holds the last applied total and discards results of superseded passes.
///
/// Each pass takes a generation from [`begin`](Self::begin); only the most
/// recently issued generation may write.
#[derive(Debug)]
pub struct TotalStakedTracker {
    total: String,
    issued: u64,
}

impl Default for TotalStakedTracker {
    fn default() -> Self {
        Self {
            total: "0".to_string(),
            issued: 0,
        }
    }
}

impl TotalStakedTracker {
    pub fn total(&self) -> &str {
        &self.total
    }

    pub fn begin(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Returns `false` (and keeps the previous total) for a stale generation.
    pub fn apply(&mut self, generation: u64, total: String) -> bool {
        if generation != self.issued {
            info!(
                "⏭️ [TOTAL_STAKED] Dropping result of pass {} (latest is {})",
                generation, self.issued
            );
            return false;
        }
        self.total = total;
        true
    }
}
