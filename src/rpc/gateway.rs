use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::time::timeout;

use super::chains::lookup_chain;
use super::error::{RpcError, RpcResult};
use super::wire::{RpcRequest, RpcResponse};
use crate::http::client::HttpClient;

pub const DEFAULT_RPC_ENDPOINT: &str = "https://x402labs.cloud/rpc";
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

const CHAIN_HEADER: &str = "x-chain";
const AUTHORIZATION_HEADER: &str = "authorization";

/// JSON-RPC client for a single gateway endpoint that fronts every
/// supported chain. The target chain travels in the `X-Chain` header.
#[derive(Debug)]
pub struct GatewayClient {
    http: HttpClient,
    endpoint: String,
    api_key: Option<String>,
    call_timeout: Duration,
    next_id: AtomicU64,
}

impl GatewayClient {
    pub fn new(http: HttpClient, endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            call_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn with_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    fn next_request_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Issues one JSON-RPC call and returns `result` untouched.
    pub async fn call(&self, chain: &str, method: &str, params: Vec<Value>) -> RpcResult<Value> {
        let chain = lookup_chain(chain).ok_or_else(|| RpcError::unsupported_chain(chain))?;
        let id = self.next_request_id();

        let Some(trace) = self.http.trace() else {
            return self.send(chain.id, RpcRequest::new(id, method, &params)).await;
        };
        trace.log_rpc_call(id, chain.id, method, &params);
        let started = Instant::now();
        let result = self.send(chain.id, RpcRequest::new(id, method, &params)).await;
        let error = result.as_ref().err().map(ToString::to_string);
        trace.log_rpc_outcome(id, started.elapsed(), error.as_deref());
        result
    }

    async fn send(&self, chain: &str, request: RpcRequest<'_>) -> RpcResult<Value> {
        let bearer = self.api_key.as_ref().map(|key| format!("Bearer {key}"));
        let mut headers = vec![(CHAIN_HEADER, chain)];
        if let Some(bearer) = bearer.as_deref() {
            headers.push((AUTHORIZATION_HEADER, bearer));
        }

        let response = timeout(
            self.call_timeout,
            self.http.post_json(&self.endpoint, &headers, &request),
        )
        .await
        .map_err(|_| {
            RpcError::Transport(format!(
                "request timed out after {} ms",
                self.call_timeout.as_millis()
            ))
        })?
        .map_err(|err| RpcError::Transport(err.to_string()))?;

        if !response.is_success() {
            return Err(RpcError::http_status(response.status, &response.body));
        }

        RpcResponse::parse(&response.body)?.into_result()
    }

    /// Like [`GatewayClient::call`], decoding `result` into `T`.
    pub async fn call_typed<T: DeserializeOwned>(
        &self,
        chain: &str,
        method: &str,
        params: Vec<Value>,
    ) -> RpcResult<T> {
        let result = self.call(chain, method, params).await?;
        serde_json::from_value(result).map_err(|err| {
            RpcError::MalformedResponse(format!("unexpected result shape for {method}: {err}"))
        })
    }
}
