//! Token records the stake pool page works with: wallet token accounts that
//! can be staked, and stake entries already held by the pool.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use num::{BigUint, One};
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

use crate::utils::serde_str;

/// Off-chain/on-chain display metadata attached to a token.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub image: Option<String>,
}

/// Whether a token carries an amount or is a single-unit item.
///
/// Decided once when the record is built: anything holding more than one
/// base unit is amount-bearing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Fungible { decimals: u8 },
    Unique,
}

impl TokenKind {
    pub fn classify(raw_amount: &BigUint, decimals: u8) -> Self {
        if *raw_amount > BigUint::one() {
            TokenKind::Fungible { decimals }
        } else {
            TokenKind::Unique
        }
    }

    pub fn is_fungible(&self) -> bool {
        matches!(self, TokenKind::Fungible { .. })
    }
}

/* --------------------------------------------------------------------- */
/*  Unstaked candidates                                                  */
/* --------------------------------------------------------------------- */

/// A wallet token account that may be staked into the pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnstakedTokenRecord {
    pub token_account: Pubkey,
    pub mint: Pubkey,
    /// Owned amount in base units.
    pub amount: u64,
    pub kind: TokenKind,
    pub metadata: Option<TokenMetadata>,
    /// Partial amount typed by the user, kept verbatim.
    pub amount_to_stake: Option<String>,
}

impl UnstakedTokenRecord {
    pub fn new(
        token_account: Pubkey,
        mint: Pubkey,
        amount: u64,
        decimals: u8,
        metadata: Option<TokenMetadata>,
    ) -> Self {
        Self {
            token_account,
            mint,
            amount,
            kind: TokenKind::classify(&BigUint::from(amount), decimals),
            metadata,
            amount_to_stake: None,
        }
    }

    /// Identity used for both membership and removal.
    pub fn mint_key(&self) -> String {
        self.mint.to_string()
    }
}

/* --------------------------------------------------------------------- */
/*  Stake entries                                                        */
/* --------------------------------------------------------------------- */

/// One token currently held by the staking program for a staker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeEntry {
    #[serde(with = "serde_str")]
    pub pubkey: Pubkey,
    #[serde(with = "serde_str")]
    pub original_mint: Pubkey,
    #[serde(with = "serde_str")]
    pub last_staker: Pubkey,
    /// Staked amount in base units; `0` or `1` for single-unit items.
    #[serde(with = "serde_str")]
    pub amount: BigUint,
}

impl StakeEntry {
    pub fn is_amount_bearing(&self) -> bool {
        self.amount > BigUint::one()
    }

    /// Read a JSON array of stake entries, e.g. a dump of the pool's entries.
    pub fn load_all<P: AsRef<Path>>(path: P) -> Result<Vec<StakeEntry>> {
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("reading stake entries {:?}", path.as_ref()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("parsing stake entries {:?}", path.as_ref()))
    }
}

/// A stake entry as shown in the "staked" list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StakedTokenRecord {
    pub entry: StakeEntry,
    pub metadata: Option<TokenMetadata>,
}

impl StakedTokenRecord {
    pub fn new(entry: StakeEntry, metadata: Option<TokenMetadata>) -> Self {
        Self { entry, metadata }
    }

    /// Key for "is this selected": the original mint. Several entries can
    /// share one original mint.
    pub fn original_mint_key(&self) -> String {
        self.entry.original_mint.to_string()
    }

    /// Key for removal from the selection: the stake entry address.
    pub fn entry_key(&self) -> String {
        self.entry.pubkey.to_string()
    }

    pub fn last_staker(&self) -> &Pubkey {
        &self.entry.last_staker
    }
}
