//! Mint decimals lookup used by the total-staked aggregation.

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use log::debug;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_program::program_pack::Pack;
use solana_sdk::pubkey::Pubkey;
use spl_token::state::Mint;

#[async_trait]
pub trait MintDecimals: Send + Sync {
    async fn mint_decimals(&self, mint: &Pubkey) -> Result<u8>;
}

/// Reads the mint account over RPC and decodes its `decimals` field.
#[derive(Clone)]
pub struct RpcMintDecimals {
    rpc: Arc<RpcClient>,
}

impl RpcMintDecimals {
    pub fn new(rpc: Arc<RpcClient>) -> Self {
        Self { rpc }
    }
}

#[async_trait]
impl MintDecimals for RpcMintDecimals {
    async fn mint_decimals(&self, mint: &Pubkey) -> Result<u8> {
        let data = self
            .rpc
            .get_account_data(mint)
            .await
            .with_context(|| format!("fetching mint account {mint}"))?;
        let decimals = decode_mint_decimals(&data).with_context(|| format!("decoding mint {mint}"))?;
        debug!("🔎 [DECIMALS] {} has {} decimals", mint, decimals);
        Ok(decimals)
    }
}

/// Token-2022 mints carry extensions after the base layout; only the base
/// layout is read.
pub fn decode_mint_decimals(data: &[u8]) -> Result<u8> {
    if data.len() < Mint::LEN {
        return Err(anyhow!("mint account too short: {} bytes", data.len()));
    }
    let mint = Mint::unpack_from_slice(&data[..Mint::LEN])?;
    if !mint.is_initialized {
        return Err(anyhow!("mint account is not initialized"));
    }
    Ok(mint.decimals)
}
