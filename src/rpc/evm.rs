use num_bigint::BigUint;
use serde_json::{Value, json};

use super::error::{RpcError, RpcResult};
use super::gateway::GatewayClient;
use super::types::{
    EvmBlock, EvmLog, EvmReceipt, EvmTransaction, LATEST_BLOCK, LogFilter, TransactionRequest,
};
use super::units::{parse_hex_quantity, parse_hex_u64};

/// Encoding happens before any request is built, so a failure never reaches
/// the gateway.
fn to_param<T: serde::Serialize>(value: &T) -> RpcResult<Value> {
    serde_json::to_value(value)
        .map_err(|err| RpcError::Transport(format!("could not encode params: {err}")))
}

impl GatewayClient {
    pub async fn block_number(&self, chain: &str) -> RpcResult<u64> {
        let raw: String = self.call_typed(chain, "eth_blockNumber", vec![]).await?;
        parse_hex_u64(&raw)
    }

    /// Native balance in wei at the latest block.
    pub async fn balance(&self, chain: &str, address: &str) -> RpcResult<BigUint> {
        let raw: String = self
            .call_typed(
                chain,
                "eth_getBalance",
                vec![json!(address), json!(LATEST_BLOCK)],
            )
            .await?;
        parse_hex_quantity(&raw)
    }

    pub async fn transaction(
        &self,
        chain: &str,
        tx_hash: &str,
    ) -> RpcResult<Option<EvmTransaction>> {
        self.call_typed(chain, "eth_getTransactionByHash", vec![json!(tx_hash)])
            .await
    }

    pub async fn transaction_receipt(
        &self,
        chain: &str,
        tx_hash: &str,
    ) -> RpcResult<Option<EvmReceipt>> {
        self.call_typed(chain, "eth_getTransactionReceipt", vec![json!(tx_hash)])
            .await
    }

    pub async fn block_by_number(
        &self,
        chain: &str,
        block: &str,
        include_transactions: bool,
    ) -> RpcResult<Option<EvmBlock>> {
        self.call_typed(
            chain,
            "eth_getBlockByNumber",
            vec![json!(block), json!(include_transactions)],
        )
        .await
    }

    /// Read-only contract call; returns the raw hex return data.
    pub async fn call_contract(
        &self,
        chain: &str,
        to: &str,
        data: &str,
        block: &str,
    ) -> RpcResult<String> {
        self.call_typed(
            chain,
            "eth_call",
            vec![json!({"to": to, "data": data}), json!(block)],
        )
        .await
    }

    pub async fn transaction_count(&self, chain: &str, address: &str) -> RpcResult<u64> {
        let raw: String = self
            .call_typed(
                chain,
                "eth_getTransactionCount",
                vec![json!(address), json!(LATEST_BLOCK)],
            )
            .await?;
        parse_hex_u64(&raw)
    }

    pub async fn gas_price(&self, chain: &str) -> RpcResult<BigUint> {
        let raw: String = self.call_typed(chain, "eth_gasPrice", vec![]).await?;
        parse_hex_quantity(&raw)
    }

    pub async fn logs(&self, chain: &str, filter: &LogFilter) -> RpcResult<Vec<EvmLog>> {
        self.call_typed(chain, "eth_getLogs", vec![to_param(filter)?])
            .await
    }

    pub async fn estimate_gas(&self, chain: &str, tx: &TransactionRequest) -> RpcResult<BigUint> {
        let raw: String = self
            .call_typed(chain, "eth_estimateGas", vec![to_param(tx)?])
            .await?;
        parse_hex_quantity(&raw)
    }
}

#[cfg(test)]
mod tests {
    use crate::http::client::HttpClient;
    use crate::http::debug::HttpDebugConfig;
    use super::to_param;
    use crate::rpc::error::RpcError;
    use crate::rpc::gateway::GatewayClient;
    use crate::rpc::types::{LogFilter, TransactionRequest};
    use num_bigint::BigUint;
    use reqwest::Client;
    use serde_json::{Value, json};
    use std::collections::BTreeMap;
    use wiremock::matchers::{body_partial_json, header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_rpc(server: &MockServer, rpc_method: &str, params: Value, result: Value) {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": rpc_method, "params": params})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"jsonrpc": "2.0", "id": 1, "result": result})),
            )
            .expect(1)
            .mount(server)
            .await;
    }

    fn gateway(server: &MockServer) -> GatewayClient {
        GatewayClient::new(
            HttpClient::new(Client::new(), HttpDebugConfig::disabled()),
            server.uri(),
            None,
        )
    }

    #[tokio::test]
    async fn balance_uses_latest_block_and_decodes_wei() {
        let server = MockServer::start().await;
        mount_rpc(
            &server,
            "eth_getBalance",
            json!(["0xabc", "latest"]),
            json!("0xde0b6b3a7640000"),
        )
        .await;

        let wei = gateway(&server)
            .balance("ethereum", "0xabc")
            .await
            .expect("balance");
        assert_eq!(wei, BigUint::from(1_000_000_000_000_000_000u64));
    }

    #[tokio::test]
    async fn block_by_number_passes_include_flag() {
        let server = MockServer::start().await;
        mount_rpc(
            &server,
            "eth_getBlockByNumber",
            json!(["latest", true]),
            json!({
                "number": "0x1",
                "hash": "0xaa",
                "timestamp": "0x2",
                "gasUsed": "0x0",
                "gasLimit": "0x1c9c380",
                "transactions": []
            }),
        )
        .await;

        let block = gateway(&server)
            .block_by_number("base", "latest", true)
            .await
            .expect("block")
            .expect("block exists");
        assert_eq!(block.hash.as_deref(), Some("0xaa"));
    }

    #[tokio::test]
    async fn unknown_transaction_decodes_as_none() {
        let server = MockServer::start().await;
        mount_rpc(
            &server,
            "eth_getTransactionByHash",
            json!(["0xfeed"]),
            Value::Null,
        )
        .await;

        let tx = gateway(&server)
            .transaction("arbitrum", "0xfeed")
            .await
            .expect("call succeeds");
        assert!(tx.is_none());
    }

    #[tokio::test]
    async fn receipt_method_and_params() {
        let server = MockServer::start().await;
        mount_rpc(
            &server,
            "eth_getTransactionReceipt",
            json!(["0xfeed"]),
            json!({"status": "0x1", "gasUsed": "0x5208", "logs": []}),
        )
        .await;

        let receipt = gateway(&server)
            .transaction_receipt("optimism", "0xfeed")
            .await
            .expect("receipt")
            .expect("receipt exists");
        assert_eq!(receipt.status.as_deref(), Some("0x1"));
    }

    #[tokio::test]
    async fn call_contract_wraps_to_and_data() {
        let server = MockServer::start().await;
        mount_rpc(
            &server,
            "eth_call",
            json!([{"to": "0xtoken", "data": "0x18160ddd"}, "latest"]),
            json!("0x00"),
        )
        .await;

        let out = gateway(&server)
            .call_contract("ethereum", "0xtoken", "0x18160ddd", "latest")
            .await
            .expect("eth_call");
        assert_eq!(out, "0x00");
    }

    #[tokio::test]
    async fn nonce_and_gas_price_decode_quantities() {
        let server = MockServer::start().await;
        mount_rpc(
            &server,
            "eth_getTransactionCount",
            json!(["0xabc", "latest"]),
            json!("0x2a"),
        )
        .await;
        mount_rpc(&server, "eth_gasPrice", json!([]), json!("0x3b9aca00")).await;
        mount_rpc(&server, "eth_blockNumber", json!([]), json!("0x112a880")).await;

        let client = gateway(&server);
        assert_eq!(client.transaction_count("bsc", "0xabc").await.expect("nonce"), 42);
        assert_eq!(
            client.gas_price("bsc").await.expect("gas price"),
            BigUint::from(1_000_000_000u64)
        );
        assert_eq!(client.block_number("bsc").await.expect("block"), 18_000_000);
    }

    #[tokio::test]
    async fn logs_and_estimate_gas_send_single_object_param() {
        let server = MockServer::start().await;
        mount_rpc(
            &server,
            "eth_getLogs",
            json!([{"fromBlock": "0x1", "toBlock": "latest", "address": ["0xtoken"]}]),
            json!([{
                "address": "0xtoken",
                "topics": ["0xddf2"],
                "data": "0x",
                "blockNumber": "0x1",
                "transactionHash": "0xfeed",
                "logIndex": "0x0"
            }]),
        )
        .await;
        Mock::given(method("POST"))
            .and(header("x-chain", "polygon"))
            .and(body_partial_json(json!({
                "method": "eth_estimateGas",
                "params": [{"from": "0xa", "to": "0xb", "value": "0x1"}]
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"jsonrpc": "2.0", "id": 2, "result": "0x5208"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = gateway(&server);
        let logs = client
            .logs(
                "ethereum",
                &LogFilter {
                    from_block: Some("0x1".to_string()),
                    to_block: Some("latest".to_string()),
                    address: Some(vec!["0xtoken".to_string()]),
                    topics: None,
                },
            )
            .await
            .expect("logs");
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].topics, vec!["0xddf2".to_string()]);

        let gas = client
            .estimate_gas(
                "polygon",
                &TransactionRequest {
                    from: Some("0xa".to_string()),
                    to: Some("0xb".to_string()),
                    data: None,
                    value: Some("0x1".to_string()),
                },
            )
            .await
            .expect("estimate");
        assert_eq!(gas, BigUint::from(21_000u32));
    }

    #[test]
    fn log_filter_encodes_camel_case_and_skips_unset_fields() {
        let filter = LogFilter {
            from_block: Some("0x10".to_string()),
            topics: Some(vec![Value::Null, json!("0xddf2")]),
            ..LogFilter::default()
        };
        assert_eq!(
            to_param(&filter).expect("encode"),
            json!({"fromBlock": "0x10", "topics": [null, "0xddf2"]})
        );
    }

    #[test]
    fn unencodable_params_are_an_error_not_null() {
        let mut bad = BTreeMap::new();
        bad.insert(vec![1u8], "non-string key");

        let err = to_param(&bad).expect_err("map keys must be strings");
        let RpcError::Transport(message) = err else {
            panic!("expected transport error, got {err:?}");
        };
        assert!(message.starts_with("could not encode params:"), "{message}");
    }
}
