//! Typed result shapes for the gateway helpers. Unknown fields are ignored so
//! backends can return richer objects than what is modelled here.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const LATEST_BLOCK: &str = "latest";
pub const SPL_TOKEN_PROGRAM_ID: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";
pub const DEFAULT_SIGNATURE_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvmTransaction {
    pub hash: String,
    pub from: String,
    #[serde(default)]
    pub to: Option<String>,
    pub value: String,
    #[serde(default)]
    pub gas_price: Option<String>,
    #[serde(default)]
    pub block_number: Option<String>,
    #[serde(default)]
    pub nonce: Option<String>,
    #[serde(default)]
    pub input: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvmReceipt {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub gas_used: Option<String>,
    #[serde(default)]
    pub block_number: Option<String>,
    #[serde(default)]
    pub contract_address: Option<String>,
    #[serde(default)]
    pub logs: Vec<EvmLog>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvmBlock {
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub hash: Option<String>,
    pub timestamp: String,
    pub gas_used: String,
    pub gas_limit: String,
    /// Hashes, or full objects when requested with `include_transactions`.
    #[serde(default)]
    pub transactions: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvmLog {
    pub address: String,
    #[serde(default)]
    pub topics: Vec<String>,
    pub data: String,
    #[serde(default)]
    pub block_number: Option<String>,
    #[serde(default)]
    pub transaction_hash: Option<String>,
    #[serde(default)]
    pub log_index: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_block: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_block: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Vec<String>>,
    /// Positional topic slots; `null` matches anything.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topics: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransactionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RpcContext {
    pub slot: u64,
}

/// Solana's `{context, value}` envelope.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Contextual<T> {
    pub context: RpcContext,
    pub value: T,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolanaAccount {
    pub lamports: u64,
    pub owner: String,
    #[serde(default)]
    pub executable: bool,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KeyedTokenAccount {
    pub pubkey: String,
    pub account: TokenAccount,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenAccount {
    pub data: TokenAccountData,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenAccountData {
    pub parsed: ParsedTokenAccount,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ParsedTokenAccount {
    pub info: TokenAccountInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAccountInfo {
    pub mint: String,
    pub owner: String,
    pub token_amount: TokenAmount,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAmount {
    pub amount: String,
    pub decimals: u8,
    #[serde(default)]
    pub ui_amount_string: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolanaTransaction {
    pub slot: u64,
    #[serde(default)]
    pub block_time: Option<i64>,
    #[serde(default)]
    pub meta: Option<SolanaTransactionMeta>,
    #[serde(default)]
    pub transaction: Value,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SolanaTransactionMeta {
    #[serde(default)]
    pub err: Option<Value>,
    #[serde(default)]
    pub fee: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentBlockhash {
    pub blockhash: String,
    pub fee_calculator: FeeCalculator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeCalculator {
    pub lamports_per_signature: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureInfo {
    pub signature: String,
    pub slot: u64,
    #[serde(default)]
    pub block_time: Option<i64>,
    #[serde(default)]
    pub err: Option<Value>,
    #[serde(default)]
    pub memo: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{EvmBlock, KeyedTokenAccount, LogFilter, TransactionRequest};
    use serde_json::json;

    #[test]
    fn log_filter_omits_unset_fields() {
        let filter = LogFilter {
            from_block: Some("0x10".to_string()),
            address: Some(vec!["0xdead".to_string()]),
            ..LogFilter::default()
        };
        assert_eq!(
            serde_json::to_value(&filter).expect("serialize"),
            json!({"fromBlock": "0x10", "address": ["0xdead"]})
        );
    }

    #[test]
    fn transaction_request_omits_unset_fields() {
        let tx = TransactionRequest {
            to: Some("0xbeef".to_string()),
            value: Some("0x1".to_string()),
            ..TransactionRequest::default()
        };
        assert_eq!(
            serde_json::to_value(&tx).expect("serialize"),
            json!({"to": "0xbeef", "value": "0x1"})
        );
    }

    #[test]
    fn block_decodes_with_hash_only_transactions() {
        let block: EvmBlock = serde_json::from_value(json!({
            "number": "0x10",
            "hash": "0xabc",
            "timestamp": "0x5f5e100",
            "gasUsed": "0x5208",
            "gasLimit": "0x1c9c380",
            "transactions": ["0x01", "0x02"],
            "miner": "0x0000000000000000000000000000000000000000"
        }))
        .expect("decode");
        assert_eq!(block.transactions.len(), 2);
        assert_eq!(block.gas_used, "0x5208");
    }

    #[test]
    fn token_account_decodes_json_parsed_layout() {
        let account: KeyedTokenAccount = serde_json::from_value(json!({
            "pubkey": "Acc1",
            "account": {
                "lamports": 2039280,
                "data": {
                    "program": "spl-token",
                    "parsed": {
                        "type": "account",
                        "info": {
                            "mint": "Mint1",
                            "owner": "Owner1",
                            "tokenAmount": {
                                "amount": "1500000",
                                "decimals": 6,
                                "uiAmount": 1.5,
                                "uiAmountString": "1.5"
                            }
                        }
                    },
                    "space": 165
                }
            }
        }))
        .expect("decode");
        let info = account.account.data.parsed.info;
        assert_eq!(info.mint, "Mint1");
        assert_eq!(info.token_amount.decimals, 6);
        assert_eq!(info.token_amount.ui_amount_string.as_deref(), Some("1.5"));
    }
}
