//! Read-only snapshots the page consumes from its data sources.
//!
//! Every source reports through a [`Snapshot`] carrying the usual
//! fetched/refetching flags; nothing here performs a fetch.

pub mod stats;

use num::BigUint;
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

use crate::tokens::{TokenKind, TokenMetadata};

/// Data plus fetch state as reported by a data source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot<T> {
    pub data: Option<T>,
    pub is_fetched: bool,
    pub is_refetching: bool,
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self::loading()
    }
}

impl<T> Snapshot<T> {
    pub fn loading() -> Self {
        Self {
            data: None,
            is_fetched: false,
            is_refetching: false,
        }
    }

    /// Fetched snapshot; `data` may still be `None` (e.g. the account does not exist).
    pub fn fetched(data: Option<T>) -> Self {
        Self {
            data,
            is_fetched: true,
            is_refetching: false,
        }
    }

    pub fn ready(data: T) -> Self {
        Self::fetched(Some(data))
    }

    pub fn refetching(mut self) -> Self {
        self.is_refetching = true;
        self
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }
}

/* --------------------------------------------------------------------- */
/*  Pool descriptor                                                      */
/* --------------------------------------------------------------------- */

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
pub enum ReceiptType {
    /// Lock the original token in the staker's wallet.
    Original,
    /// Issue a tokenized receipt representing the stake.
    Receipt,
}

impl ReceiptType {
    pub fn toggled(self) -> Self {
        match self {
            ReceiptType::Original => ReceiptType::Receipt,
            ReceiptType::Receipt => ReceiptType::Original,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
pub enum TokenStandard {
    Fungible,
    NonFungible,
}

impl TokenStandard {
    pub fn from_fungible_flag(show_fungible: bool) -> Self {
        if show_fungible {
            TokenStandard::Fungible
        } else {
            TokenStandard::NonFungible
        }
    }

    pub fn matches(&self, kind: &TokenKind) -> bool {
        match self {
            TokenStandard::Fungible => kind.is_fungible(),
            TokenStandard::NonFungible => !kind.is_fungible(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StakePoolInfo {
    pub pubkey: Pubkey,
    /// Unix seconds; `0` means no end date.
    pub end_date: i64,
    pub cooldown_seconds: u32,
    pub min_stake_seconds: u32,
    /// Maximum number of tokens the pool expects to hold; `0` if unknown.
    pub max_staked: u64,
}

/* --------------------------------------------------------------------- */
/*  Display metadata                                                     */
/* --------------------------------------------------------------------- */

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PoolColors {
    pub primary: Option<String>,
    pub secondary: Option<String>,
    pub accent: Option<String>,
    pub font_color: Option<String>,
    pub font_color_secondary: Option<String>,
    pub background_secondary: Option<String>,
}

/// Per-pool presentation settings published alongside the pool.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StakePoolMetadata {
    pub name: String,
    pub display_name: Option<String>,
    pub colors: Option<PoolColors>,
    pub image_url: Option<String>,
    pub background_image: Option<String>,
    pub hide_footer: bool,
    pub hide_allowed_tokens: bool,
    /// Fixes the receipt type and hides the toggle.
    pub receipt_type: Option<ReceiptType>,
    /// Fixes the token standard and hides the fungible filter.
    pub token_standard: Option<TokenStandard>,
    pub redirect: Option<String>,
    pub not_found: bool,
    pub max_staked: Option<u64>,
}

/// What the page should show for the current pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PagePresence {
    Redirect(String),
    Loading,
    NotFound,
    Ready,
}

pub fn resolve_presence(
    pool: &Snapshot<StakePoolInfo>,
    metadata: Option<&StakePoolMetadata>,
) -> PagePresence {
    if let Some(target) = metadata.and_then(|m| m.redirect.clone()) {
        return PagePresence::Redirect(target);
    }
    if !pool.is_fetched {
        return PagePresence::Loading;
    }
    if pool.data.is_none() || metadata.map_or(false, |m| m.not_found) {
        return PagePresence::NotFound;
    }
    PagePresence::Ready
}

/* --------------------------------------------------------------------- */
/*  Rewards                                                              */
/* --------------------------------------------------------------------- */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RewardDistributorKind {
    /// Rewards are minted on claim.
    Mint,
    /// Rewards are paid from a treasury token account.
    Treasury,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewardDistributorInfo {
    pub pubkey: Pubkey,
    pub kind: RewardDistributorKind,
    pub reward_mint: Pubkey,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewardMintInfo {
    pub decimals: u8,
    pub supply: BigUint,
    pub token_list: Option<TokenMetadata>,
    pub metaplex: Option<TokenMetadata>,
}

impl RewardMintInfo {
    /// Token-list symbol, then metaplex symbol, then `???`.
    pub fn symbol(&self) -> String {
        self.token_list
            .as_ref()
            .and_then(|m| m.symbol.clone())
            .or_else(|| self.metaplex.as_ref().and_then(|m| m.symbol.clone()))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "???".to_string())
    }

    pub fn name(&self) -> String {
        self.token_list
            .as_ref()
            .and_then(|m| m.name.clone())
            .or_else(|| self.metaplex.as_ref().and_then(|m| m.name.clone()))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "???".to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewardsSnapshot {
    pub claimable_rewards: BigUint,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewardsRate {
    pub daily_rewards: BigUint,
}
