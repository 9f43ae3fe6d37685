pub mod chains;
pub mod error;
mod evm;
pub mod gateway;
mod solana;
pub mod types;
pub mod units;
pub mod wire;

pub use chains::{ChainDescriptor, ChainFamily, lookup_chain, supported_chains};
pub use error::{RpcError, RpcResult};
pub use gateway::GatewayClient;
