//! Per-operation reports. Each one combines a few gateway calls and turns
//! hex quantities and smallest units into readable values.

use serde::Serialize;
use serde_json::Value;

use crate::rpc::types::{LATEST_BLOCK, RecentBlockhash};
use crate::rpc::units::{parse_hex_quantity, parse_hex_u64, wei_to_ether, wei_to_gwei};
use crate::rpc::{
    ChainDescriptor, ChainFamily, GatewayClient, RpcError, RpcResult, lookup_chain,
    supported_chains,
};

pub const MAX_SIGNATURE_LIMIT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Success,
    Failed,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransactionReport {
    Evm(EvmTransactionReport),
    Solana(SolanaTransactionReport),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvmTransactionReport {
    pub chain: String,
    pub hash: String,
    pub from: String,
    pub to: Option<String>,
    pub value_wei: String,
    pub value: String,
    pub symbol: String,
    pub gas_used: Option<u64>,
    pub gas_price_gwei: Option<String>,
    pub block_number: Option<u64>,
    pub status: TxStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolanaTransactionReport {
    pub signature: String,
    pub slot: u64,
    pub block_time: Option<i64>,
    pub fee_lamports: Option<u64>,
    pub status: TxStatus,
    pub error: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BlockReport {
    Evm(EvmBlockReport),
    Solana(SolanaBlockReport),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvmBlockReport {
    pub chain: String,
    pub current_block_number: u64,
    pub block_number: Option<u64>,
    pub block_hash: Option<String>,
    pub timestamp: u64,
    pub transaction_count: usize,
    pub gas_used: u64,
    pub gas_limit: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolanaBlockReport {
    pub recent_blockhash: String,
    pub lamports_per_signature: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GasPriceReport {
    pub chain: String,
    pub gas_price_wei: String,
    pub gas_price_gwei: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionCountReport {
    pub chain: String,
    pub address: String,
    pub transaction_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenHolding {
    pub account: String,
    pub mint: String,
    pub owner: String,
    pub balance: String,
    pub decimals: u8,
    pub raw_balance: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenHoldingsReport {
    pub address: String,
    pub token_count: usize,
    pub tokens: Vec<TokenHolding>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentTransaction {
    pub signature: String,
    pub slot: u64,
    pub block_time: Option<i64>,
    pub error: Option<Value>,
    pub memo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentTransactionsReport {
    pub address: String,
    pub count: usize,
    pub transactions: Vec<RecentTransaction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportedChainsReport {
    pub count: usize,
    pub chains: Vec<ChainDescriptor>,
}

fn resolve(chain: &str) -> RpcResult<&'static ChainDescriptor> {
    lookup_chain(chain).ok_or_else(|| RpcError::unsupported_chain(chain))
}

fn require_evm(chain: &'static ChainDescriptor, operation: &str) -> RpcResult<()> {
    if chain.family == ChainFamily::Evm {
        Ok(())
    } else {
        Err(RpcError::UnsupportedOperation {
            operation: operation.to_string(),
            chain: chain.id.to_string(),
        })
    }
}

fn optional_u64(raw: Option<&str>) -> RpcResult<Option<u64>> {
    raw.map(parse_hex_u64).transpose()
}

pub async fn transaction(
    gateway: &GatewayClient,
    chain: &str,
    hash: &str,
) -> RpcResult<TransactionReport> {
    let chain = resolve(chain)?;

    if chain.family == ChainFamily::Solana {
        let tx = gateway
            .solana_transaction(hash)
            .await?
            .ok_or_else(|| RpcError::NotFound(format!("transaction {hash}")))?;
        let error = tx.meta.as_ref().and_then(|meta| meta.err.clone());
        let status = match (&tx.meta, &error) {
            (None, _) => TxStatus::Pending,
            (Some(_), Some(_)) => TxStatus::Failed,
            (Some(_), None) => TxStatus::Success,
        };
        return Ok(TransactionReport::Solana(SolanaTransactionReport {
            signature: hash.to_string(),
            slot: tx.slot,
            block_time: tx.block_time,
            fee_lamports: tx.meta.as_ref().map(|meta| meta.fee),
            status,
            error,
        }));
    }

    let tx = gateway
        .transaction(chain.id, hash)
        .await?
        .ok_or_else(|| RpcError::NotFound(format!("transaction {hash}")))?;
    let receipt = gateway.transaction_receipt(chain.id, hash).await?;

    let value = parse_hex_quantity(&tx.value)?;
    let gas_price_gwei = tx
        .gas_price
        .as_deref()
        .map(|raw| parse_hex_quantity(raw).map(|wei| wei_to_gwei(&wei)))
        .transpose()?;
    let status = match receipt.as_ref().and_then(|receipt| receipt.status.as_deref()) {
        Some("0x1") => TxStatus::Success,
        Some(_) => TxStatus::Failed,
        None if receipt.is_some() => TxStatus::Failed,
        None => TxStatus::Pending,
    };
    let gas_used = optional_u64(receipt.as_ref().and_then(|receipt| receipt.gas_used.as_deref()))?;

    Ok(TransactionReport::Evm(EvmTransactionReport {
        chain: chain.id.to_string(),
        hash: tx.hash.clone(),
        from: tx.from.clone(),
        to: tx.to.clone(),
        value_wei: value.to_string(),
        value: wei_to_ether(&value),
        symbol: chain.symbol.to_string(),
        gas_used,
        gas_price_gwei,
        block_number: optional_u64(tx.block_number.as_deref())?,
        status,
    }))
}

/// `block` defaults to the latest block; Solana ignores it.
pub async fn block_info(
    gateway: &GatewayClient,
    chain: &str,
    block: Option<&str>,
) -> RpcResult<BlockReport> {
    let chain = resolve(chain)?;

    if chain.family == ChainFamily::Solana {
        let RecentBlockhash {
            blockhash,
            fee_calculator,
        } = gateway.solana_recent_blockhash().await?;
        return Ok(BlockReport::Solana(SolanaBlockReport {
            recent_blockhash: blockhash,
            lamports_per_signature: fee_calculator.lamports_per_signature,
        }));
    }

    let block_tag = block.unwrap_or(LATEST_BLOCK);
    let found = gateway
        .block_by_number(chain.id, block_tag, false)
        .await?
        .ok_or_else(|| RpcError::NotFound(format!("block {block_tag}")))?;
    let current_block_number = gateway.block_number(chain.id).await?;

    Ok(BlockReport::Evm(EvmBlockReport {
        chain: chain.id.to_string(),
        current_block_number,
        block_number: optional_u64(found.number.as_deref())?,
        block_hash: found.hash.clone(),
        timestamp: parse_hex_u64(&found.timestamp)?,
        transaction_count: found.transactions.len(),
        gas_used: parse_hex_u64(&found.gas_used)?,
        gas_limit: parse_hex_u64(&found.gas_limit)?,
    }))
}

pub async fn gas_price(gateway: &GatewayClient, chain: &str) -> RpcResult<GasPriceReport> {
    let chain = resolve(chain)?;
    require_evm(chain, "gas price")?;

    let wei = gateway.gas_price(chain.id).await?;
    Ok(GasPriceReport {
        chain: chain.id.to_string(),
        gas_price_wei: wei.to_string(),
        gas_price_gwei: wei_to_gwei(&wei),
    })
}

pub async fn transaction_count(
    gateway: &GatewayClient,
    chain: &str,
    address: &str,
) -> RpcResult<TransactionCountReport> {
    let chain = resolve(chain)?;
    require_evm(chain, "transaction count")?;

    Ok(TransactionCountReport {
        chain: chain.id.to_string(),
        address: address.to_string(),
        transaction_count: gateway.transaction_count(chain.id, address).await?,
    })
}

pub async fn token_holdings(
    gateway: &GatewayClient,
    address: &str,
) -> RpcResult<TokenHoldingsReport> {
    let accounts = gateway.solana_token_accounts_by_owner(address, None).await?;

    let tokens: Vec<TokenHolding> = accounts
        .into_iter()
        .map(|keyed| {
            let info = keyed.account.data.parsed.info;
            TokenHolding {
                account: keyed.pubkey,
                mint: info.mint,
                owner: info.owner,
                balance: info
                    .token_amount
                    .ui_amount_string
                    .unwrap_or_else(|| info.token_amount.amount.clone()),
                decimals: info.token_amount.decimals,
                raw_balance: info.token_amount.amount,
            }
        })
        .collect();

    Ok(TokenHoldingsReport {
        address: address.to_string(),
        token_count: tokens.len(),
        tokens,
    })
}

/// `limit` is clamped to `1..=MAX_SIGNATURE_LIMIT`.
pub async fn recent_transactions(
    gateway: &GatewayClient,
    address: &str,
    limit: usize,
) -> RpcResult<RecentTransactionsReport> {
    let limit = limit.clamp(1, MAX_SIGNATURE_LIMIT);
    let signatures = gateway.solana_signatures_for_address(address, limit).await?;

    let transactions: Vec<RecentTransaction> = signatures
        .into_iter()
        .map(|info| RecentTransaction {
            signature: info.signature,
            slot: info.slot,
            block_time: info.block_time,
            error: info.err,
            memo: info.memo,
        })
        .collect();

    Ok(RecentTransactionsReport {
        address: address.to_string(),
        count: transactions.len(),
        transactions,
    })
}

pub fn chains_report() -> SupportedChainsReport {
    let chains = supported_chains().to_vec();
    SupportedChainsReport {
        count: chains.len(),
        chains,
    }
}
