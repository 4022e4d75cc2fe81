//! Runtime configuration loader.

use std::{fmt, fs, path::Path, str::FromStr, sync::Arc};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};

pub const DEFAULT_SETTINGS_PATH: &str = "config/settings.json";
pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";
pub const DEFAULT_ENTRIES_FILE: &str = "./stake_entries.json";

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Commitment {
    Processed,
    #[default]
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn to_config(self) -> CommitmentConfig {
        match self {
            Commitment::Processed => CommitmentConfig::processed(),
            Commitment::Confirmed => CommitmentConfig::confirmed(),
            Commitment::Finalized => CommitmentConfig::finalized(),
        }
    }
}

/// ------------------------------------------------------------------
/// Serializable Settings for display / export
/// ------------------------------------------------------------------
#[derive(Debug, Serialize, Deserialize)]
pub struct SerializableSettings {
    pub rpc_url: String,
    pub stake_pool_id: String,
    pub wallet: Option<String>,
    pub commitment: Commitment,
    pub entries_file: String,
}

/// ------------------------------------------------------------------
/// Main Settings object
/// ------------------------------------------------------------------
pub struct Settings {
    /* -------- infrastructure ------------------------ */
    pub rpc_url: String,
    pub commitment: Commitment,

    /* -------- pool & wallet ------------------------- */
    pub stake_pool_id: Pubkey,
    pub wallet: Option<Pubkey>,
    pub entries_file: String,

    /* -------- shared objects ------------------------ */
    pub rpc_client: Arc<RpcClient>,
}

fn parse_pubkey(field: &str, value: &str) -> Result<Pubkey> {
    Pubkey::from_str(value.trim()).with_context(|| format!("`{field}` is not a valid address: {value}"))
}

impl Settings {
    /// Read a settings JSON file from disk.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("reading settings file {:?}", path.as_ref()))?;
        let json: serde_json::Value = serde_json::from_str(&raw)
            .with_context(|| format!("parsing settings file {:?}", path.as_ref()))?;
        Self::from_json(&json)
    }

    /// Load settings from the default `config/settings.json`.
    pub fn load() -> Result<Self> {
        Self::load_from_file(DEFAULT_SETTINGS_PATH)
    }

    pub fn from_json(json: &serde_json::Value) -> Result<Self> {
        /* -------- plain strings ---------------------------------- */
        let rpc_url = json["rpc_url"]
            .as_str()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_RPC_URL)
            .to_string();
        let entries_file = json["entries_file"]
            .as_str()
            .unwrap_or(DEFAULT_ENTRIES_FILE)
            .to_string();
        let commitment = match json["commitment"].as_str() {
            Some(level) => Commitment::from_str(level)
                .map_err(|_| anyhow!("unknown commitment `{level}`"))?,
            None => Commitment::default(),
        };

        /* -------- addresses -------------------------------------- */
        let stake_pool_id = json["stake_pool_id"]
            .as_str()
            .ok_or_else(|| anyhow!("`stake_pool_id` is required"))
            .and_then(|s| parse_pubkey("stake_pool_id", s))?;
        let wallet = json["wallet"]
            .as_str()
            .filter(|s| !s.is_empty())
            .map(|s| parse_pubkey("wallet", s))
            .transpose()?;

        let rpc_client = Arc::new(RpcClient::new_with_commitment(
            rpc_url.clone(),
            commitment.to_config(),
        ));

        Ok(Self {
            rpc_url,
            commitment,
            stake_pool_id,
            wallet,
            entries_file,
            rpc_client,
        })
    }

    /// Save settings back to the default file.
    pub fn save(&self) -> Result<()> {
        self.save_to_file(DEFAULT_SETTINGS_PATH)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json_string = serde_json::to_string_pretty(&self.to_serializable())?;
        fs::write(&path, json_string)
            .with_context(|| format!("writing settings to {:?}", path.as_ref()))?;
        Ok(())
    }

    pub fn to_serializable(&self) -> SerializableSettings {
        SerializableSettings {
            rpc_url: self.rpc_url.clone(),
            stake_pool_id: self.stake_pool_id.to_string(),
            wallet: self.wallet.map(|w| w.to_string()),
            commitment: self.commitment,
            entries_file: self.entries_file.clone(),
        }
    }
}

/* ------------------------------------------------------------------ */
/*  Manual Clone & Debug implementations (RpcClient isn’t Clone/Debug) */
/* ------------------------------------------------------------------ */
impl Clone for Settings {
    fn clone(&self) -> Self {
        Self {
            rpc_url: self.rpc_url.clone(),
            commitment: self.commitment,
            stake_pool_id: self.stake_pool_id,
            wallet: self.wallet,
            entries_file: self.entries_file.clone(),
            rpc_client: Arc::clone(&self.rpc_client),
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("rpc_url", &self.rpc_url)
            .field("commitment", &self.commitment)
            .field("stake_pool_id", &self.stake_pool_id)
            .field("wallet", &self.wallet)
            .field("entries_file", &self.entries_file)
            .finish_non_exhaustive()
    }
}
