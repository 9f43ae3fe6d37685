use serde_json::json;

use super::error::RpcResult;
use super::gateway::GatewayClient;
use super::types::{
    Contextual, KeyedTokenAccount, RecentBlockhash, SPL_TOKEN_PROGRAM_ID, SignatureInfo,
    SolanaAccount, SolanaTransaction,
};

const SOLANA: &str = "solana";

impl GatewayClient {
    /// Balance in lamports.
    pub async fn solana_balance(&self, address: &str) -> RpcResult<u64> {
        let balance: Contextual<u64> = self
            .call_typed(SOLANA, "getBalance", vec![json!(address)])
            .await?;
        Ok(balance.value)
    }

    pub async fn solana_account_info(&self, address: &str) -> RpcResult<Option<SolanaAccount>> {
        let account: Contextual<Option<SolanaAccount>> = self
            .call_typed(
                SOLANA,
                "getAccountInfo",
                vec![json!(address), json!({"encoding": "jsonParsed"})],
            )
            .await?;
        Ok(account.value)
    }

    /// SPL token accounts; `program_id` defaults to the SPL token program.
    pub async fn solana_token_accounts_by_owner(
        &self,
        owner: &str,
        program_id: Option<&str>,
    ) -> RpcResult<Vec<KeyedTokenAccount>> {
        let program_id = program_id.unwrap_or(SPL_TOKEN_PROGRAM_ID);
        let accounts: Contextual<Vec<KeyedTokenAccount>> = self
            .call_typed(
                SOLANA,
                "getTokenAccountsByOwner",
                vec![
                    json!(owner),
                    json!({"programId": program_id}),
                    json!({"encoding": "jsonParsed"}),
                ],
            )
            .await?;
        Ok(accounts.value)
    }

    pub async fn solana_transaction(
        &self,
        signature: &str,
    ) -> RpcResult<Option<SolanaTransaction>> {
        self.call_typed(
            SOLANA,
            "getTransaction",
            vec![
                json!(signature),
                json!({"encoding": "jsonParsed", "maxSupportedTransactionVersion": 0}),
            ],
        )
        .await
    }

    pub async fn solana_recent_blockhash(&self) -> RpcResult<RecentBlockhash> {
        let blockhash: Contextual<RecentBlockhash> = self
            .call_typed(SOLANA, "getRecentBlockhash", vec![])
            .await?;
        Ok(blockhash.value)
    }

    pub async fn solana_signatures_for_address(
        &self,
        address: &str,
        limit: usize,
    ) -> RpcResult<Vec<SignatureInfo>> {
        self.call_typed(
            SOLANA,
            "getSignaturesForAddress",
            vec![json!(address), json!({"limit": limit})],
        )
        .await
    }
}
