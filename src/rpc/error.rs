use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RpcError {
    #[error("Unsupported chain: {chain}. Supported chains: {supported}")]
    UnsupportedChain { chain: String, supported: String },
    #[error("RPC request failed: {0}")]
    Transport(String),
    #[error("RPC error: {message} (code: {code})")]
    Protocol { code: i64, message: String },
    #[error("malformed RPC response: {0}")]
    MalformedResponse(String),
    #[error("{operation} is not available on {chain}")]
    UnsupportedOperation { operation: String, chain: String },
    #[error("{0} not found")]
    NotFound(String),
}

impl RpcError {
    pub fn unsupported_chain(chain: &str) -> Self {
        Self::UnsupportedChain {
            chain: chain.to_string(),
            supported: super::chains::supported_chain_ids().join(", "),
        }
    }

    pub fn http_status(status: u16, body: &str) -> Self {
        let body = body.chars().take(400).collect::<String>();
        Self::Transport(format!("{status} - {body}"))
    }
}

pub type RpcResult<T> = std::result::Result<T, RpcError>;
