use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::error::{RpcError, RpcResult};

pub const JSONRPC_VERSION: &str = "2.0";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: &'a [Value],
}

impl<'a> RpcRequest<'a> {
    pub fn new(id: u64, method: &'a str, params: &'a [Value]) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            method,
            params,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: Option<Value>,
    // A present `"result": null` is a valid answer (e.g. unknown tx hash),
    // so it must stay distinguishable from a missing field.
    #[serde(default, deserialize_with = "present")]
    pub result: Option<Value>,
    /// Kept loose: gateways send bare strings or partial objects here.
    #[serde(default)]
    pub error: Option<Value>,
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

impl RpcResponse {
    pub fn parse(body: &str) -> RpcResult<Self> {
        serde_json::from_str(body).map_err(|err| {
            let preview = body.chars().take(200).collect::<String>();
            RpcError::MalformedResponse(format!("{err}: {preview}"))
        })
    }

    /// Error wins over result; neither is a malformed response.
    pub fn into_result(self) -> RpcResult<Value> {
        if let Some(error) = self.error {
            return Err(protocol_error(error));
        }

        self.result.ok_or_else(|| {
            RpcError::MalformedResponse("response carried neither result nor error".to_string())
        })
    }
}

/// Any non-null `error` is a protocol failure. `code` defaults to 0 when
/// absent or non-numeric.
fn protocol_error(error: Value) -> RpcError {
    let code = error.get("code").and_then(Value::as_i64).unwrap_or(0);
    let message = match &error {
        Value::String(text) => text.clone(),
        Value::Object(fields) => match fields.get("message") {
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
            None => error.to_string(),
        },
        other => other.to_string(),
    };
    RpcError::Protocol { code, message }
}
