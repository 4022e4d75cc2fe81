//! Headline figures for the pool banner: totals, schedule and rewards.

use chrono::{DateTime, TimeZone, Utc};
use num::{BigUint, Zero};

use super::{
    RewardDistributorInfo, RewardDistributorKind, RewardMintInfo, RewardsRate, RewardsSnapshot,
    StakePoolInfo,
};
use crate::utils::{time::seconds_to_duration, units};

/// Share of the pool's capacity in use, floored to four decimals.
/// `None` when the pool has no known maximum.
pub fn percent_staked(entry_count: usize, max_staked: u64) -> Option<f64> {
    if max_staked == 0 {
        return None;
    }
    let pct = entry_count as f64 * 100.0 / max_staked as f64;
    Some((pct * 10_000.0).floor() / 10_000.0)
}

/// `"1,234"` or `"1,234 / 10,000"` when the metadata carries a maximum.
/// A total that is not a plain integer reads as zero.
pub fn total_staked_label(total: &str, metadata_max: Option<u64>) -> String {
    let total = total
        .trim()
        .parse::<BigUint>()
        .unwrap_or_else(|_| BigUint::zero());
    let mut label = units::with_thousands_separators(&total.to_string());
    if let Some(max) = metadata_max.filter(|m| *m > 0) {
        label.push_str(" / ");
        label.push_str(&units::with_thousands_separators(&max.to_string()));
    }
    label
}

/// Schedule fields worth showing; zero values are omitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolSchedule {
    pub end_date: Option<DateTime<Utc>>,
    pub cooldown: Option<String>,
    pub min_stake: Option<String>,
}

impl PoolSchedule {
    pub fn from_pool(pool: &StakePoolInfo) -> Self {
        let end_date = if pool.end_date != 0 {
            Utc.timestamp_opt(pool.end_date, 0).single()
        } else {
            None
        };
        let as_duration = |secs: u32| (secs != 0).then(|| seconds_to_duration(u64::from(secs)));

        Self {
            end_date,
            cooldown: as_duration(pool.cooldown_seconds),
            min_stake: as_duration(pool.min_stake_seconds),
        }
    }
}

/// Claimable rewards for the connected wallet and what is left to pay them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Earnings {
    pub amount: String,
    pub name: String,
    /// `None` when the treasury balance is unknown.
    pub treasury_remaining: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewardSummary {
    pub daily_rate: String,
    pub symbol: String,
    /// Present once claimable rewards have been fetched.
    pub earnings: Option<Earnings>,
    pub claimable: bool,
}

impl RewardSummary {
    /// Needs a distributor, its rate and the reward mint; otherwise the pool
    /// has nothing to show.
    pub fn build(
        distributor: Option<&RewardDistributorInfo>,
        mint_info: Option<&RewardMintInfo>,
        rate: Option<&RewardsRate>,
        rewards: Option<&RewardsSnapshot>,
        treasury_amount: Option<&BigUint>,
    ) -> Option<Self> {
        let (distributor, mint_info, rate) = (distributor?, mint_info?, rate?);
        let decimals = mint_info.decimals;

        let daily_rate = units::format_amount_as_decimal(decimals, &rate.daily_rewards, decimals.min(5));

        let earnings = rewards.map(|r| {
            let remaining = match distributor.kind {
                RewardDistributorKind::Mint => Some(&mint_info.supply),
                RewardDistributorKind::Treasury => treasury_amount,
            };
            Earnings {
                amount: units::format_amount_as_decimal(decimals, &r.claimable_rewards, decimals.min(6)),
                name: mint_info.name(),
                treasury_remaining: remaining
                    .map(|amount| units::format_amount_as_decimal(decimals, amount, decimals.min(6))),
            }
        });

        Some(Self {
            daily_rate,
            symbol: mint_info.symbol(),
            earnings,
            claimable: rewards_claimable(Some(distributor), rewards),
        })
    }

    /// Treasury label with the `??` placeholder used when unknown.
    pub fn treasury_label(&self) -> Option<String> {
        self.earnings
            .as_ref()
            .map(|e| e.treasury_remaining.clone().unwrap_or_else(|| "??".to_string()))
    }
}

/// Claiming is only offered with a distributor and a positive balance.
pub fn rewards_claimable(
    distributor: Option<&RewardDistributorInfo>,
    rewards: Option<&RewardsSnapshot>,
) -> bool {
    distributor.is_some() && rewards.map_or(false, |r| !r.claimable_rewards.is_zero())
}
