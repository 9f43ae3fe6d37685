use serde::Serialize;

use crate::rpc::units::{lamports_to_sol, wei_to_ether};
use crate::rpc::{ChainFamily, GatewayClient, RpcError, RpcResult, lookup_chain};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeBalance {
    pub chain: String,
    pub chain_name: String,
    pub address: String,
    pub symbol: String,
    /// Smallest-unit integer (wei or lamports) as decimal text.
    pub raw: String,
    pub balance: String,
}

impl NativeBalance {
    pub fn formatted(&self) -> String {
        format!("{} {}", self.balance, self.symbol)
    }
}

/// Fetches the native asset balance, dispatching on the chain family.
pub async fn fetch_native_balance(
    gateway: &GatewayClient,
    chain: &str,
    address: &str,
) -> RpcResult<NativeBalance> {
    let descriptor = lookup_chain(chain).ok_or_else(|| RpcError::unsupported_chain(chain))?;

    let (raw, balance) = match descriptor.family {
        ChainFamily::Solana => {
            let lamports = gateway.solana_balance(address).await?;
            (lamports.to_string(), lamports_to_sol(lamports))
        }
        ChainFamily::Evm => {
            let wei = gateway.balance(descriptor.id, address).await?;
            (wei.to_string(), wei_to_ether(&wei))
        }
    };

    Ok(NativeBalance {
        chain: descriptor.id.to_string(),
        chain_name: descriptor.display_name.to_string(),
        address: address.to_string(),
        symbol: descriptor.symbol.to_string(),
        raw,
        balance,
    })
}
