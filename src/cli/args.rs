use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::rpc::types::DEFAULT_SIGNATURE_LIMIT;

#[derive(Debug, Parser, Clone, PartialEq, Eq)]
#[command(name = "chainscope")]
#[command(
    about = "Multi-chain wallet and transaction explorer over a JSON-RPC gateway",
    long_about = "Multi-chain wallet and transaction explorer over a JSON-RPC gateway\n\nConfig file loading:\n  - --config <path> (explicit file, overrides default path discovery)\n  - Default search path when --config is not provided:\n    1. $XDG_CONFIG_HOME/chainscope/config.toml\n    2. ~/.config/chainscope/config.toml\n\nEnvironment overrides: CHAINSCOPE_RPC_ENDPOINT, CHAINSCOPE_API_KEY, CHAINSCOPE_TIMEOUT_MS"
)]
pub struct CliArgs {
    /// Load config from this file path instead of the default discovery path.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Log HTTP requests and responses to stderr, with secrets redacted.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Write a session trace file with raw HTTP traffic.
    #[arg(long, global = true)]
    pub trace: bool,

    /// Print reports as JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the chains the gateway routes to.
    Chains,
    /// Native balance of an address on one chain.
    Balance {
        address: String,
        #[arg(long)]
        chain: String,
    },
    /// Native balances of an address across several chains.
    Analyze {
        address: String,
        /// Comma separated chain ids; defaults to the configured or full list.
        #[arg(long, value_delimiter = ',')]
        chains: Option<Vec<String>>,
    },
    /// Transaction details, combined with its receipt on EVM chains.
    Tx {
        hash: String,
        #[arg(long)]
        chain: String,
    },
    /// Block details; the latest block unless --number is given.
    Block {
        #[arg(long)]
        chain: String,
        /// Hex block number or a tag such as `latest`.
        #[arg(long)]
        number: Option<String>,
    },
    /// Current gas price.
    Gas {
        #[arg(long)]
        chain: String,
    },
    /// Transaction count (nonce) of an address.
    Nonce {
        address: String,
        #[arg(long)]
        chain: String,
    },
    /// SPL token holdings of a Solana wallet.
    Tokens { address: String },
    /// Recent Solana transaction signatures for an address.
    History {
        address: String,
        #[arg(long, default_value_t = DEFAULT_SIGNATURE_LIMIT)]
        limit: usize,
    },
    /// Send a raw JSON-RPC call through the gateway.
    Rpc {
        method: String,
        #[arg(long)]
        chain: String,
        /// JSON array of positional params.
        #[arg(long, value_name = "JSON")]
        params: Option<String>,
    },
}

impl Command {
    /// The single chain this command targets, if any.
    pub fn chain(&self) -> Option<&str> {
        match self {
            Self::Balance { chain, .. }
            | Self::Tx { chain, .. }
            | Self::Block { chain, .. }
            | Self::Gas { chain }
            | Self::Nonce { chain, .. }
            | Self::Rpc { chain, .. } => Some(chain.as_str()),
            Self::Tokens { .. } | Self::History { .. } => Some("solana"),
            Self::Chains | Self::Analyze { .. } => None,
        }
    }
}
