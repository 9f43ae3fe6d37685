use serde::Serialize;

use super::balance::{NativeBalance, fetch_native_balance};
use crate::rpc::chains::supported_chain_ids;
use crate::rpc::{GatewayClient, RpcResult};

pub trait BalanceSource {
    fn native_balance(
        &self,
        chain: &str,
        address: &str,
    ) -> impl std::future::Future<Output = RpcResult<NativeBalance>> + Send;
}

impl BalanceSource for GatewayClient {
    async fn native_balance(&self, chain: &str, address: &str) -> RpcResult<NativeBalance> {
        fetch_native_balance(self, chain, address).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainResult {
    pub chain: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<NativeBalance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChainResult {
    fn succeeded(chain: String, payload: NativeBalance) -> Self {
        Self {
            chain,
            success: true,
            payload: Some(payload),
            error: None,
        }
    }

    fn failed(chain: String, error: String) -> Self {
        Self {
            chain,
            success: false,
            payload: None,
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiChainReport {
    pub address: String,
    pub chains_analyzed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub results: Vec<ChainResult>,
}

/// Visits each chain once, in order, and records its outcome. A failing
/// chain becomes a failed entry; it never stops the remaining chains.
/// `None` means every supported chain.
pub async fn analyze<S: BalanceSource>(
    source: &S,
    address: &str,
    chains: Option<&[String]>,
) -> Vec<ChainResult> {
    let requested: Vec<String> = match chains {
        Some(chains) => chains.to_vec(),
        None => supported_chain_ids()
            .into_iter()
            .map(ToString::to_string)
            .collect(),
    };

    let mut results = Vec::with_capacity(requested.len());
    for chain in requested {
        let result = match source.native_balance(&chain, address).await {
            Ok(balance) => ChainResult::succeeded(chain, balance),
            Err(err) => ChainResult::failed(chain, err.to_string()),
        };
        results.push(result);
    }
    results
}

pub async fn analyze_wallet<S: BalanceSource>(
    source: &S,
    address: &str,
    chains: Option<&[String]>,
) -> MultiChainReport {
    let results = analyze(source, address, chains).await;
    let succeeded = results.iter().filter(|result| result.success).count();

    MultiChainReport {
        address: address.to_string(),
        chains_analyzed: results.len(),
        succeeded,
        failed: results.len() - succeeded,
        results,
    }
}
