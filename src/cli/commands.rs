use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use serde_json::Value;

use super::args::Command;
use crate::analysis::reports::{
    self, BlockReport, GasPriceReport, RecentTransactionsReport, SupportedChainsReport,
    TokenHoldingsReport, TransactionCountReport, TransactionReport,
};
use crate::analysis::{MultiChainReport, NativeBalance, analyze_wallet, fetch_native_balance};
use crate::rpc::GatewayClient;

/// Outcome of one CLI command, printed as text or JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Report {
    Chains(SupportedChainsReport),
    Balance(NativeBalance),
    Analyze(MultiChainReport),
    Transaction(TransactionReport),
    Block(BlockReport),
    Gas(GasPriceReport),
    Nonce(TransactionCountReport),
    Tokens(TokenHoldingsReport),
    History(RecentTransactionsReport),
    Raw(Value),
}

/// Runs `command` against the gateway. `default_chains` applies to
/// `analyze` when no chain list was given on the command line.
pub async fn execute(
    command: &Command,
    gateway: &GatewayClient,
    default_chains: Option<&[String]>,
) -> Result<Report> {
    let report = match command {
        Command::Chains => Report::Chains(reports::chains_report()),
        Command::Analyze { address, chains } => {
            let chains = chains.as_deref().or(default_chains);
            // Per-chain failures are part of the report.
            return Ok(Report::Analyze(
                analyze_wallet(gateway, address, chains).await,
            ));
        }
        Command::Balance { address, chain } => {
            Report::Balance(fetch_native_balance(gateway, chain, address).await?)
        }
        Command::Tx { hash, chain } => {
            Report::Transaction(reports::transaction(gateway, chain, hash).await?)
        }
        Command::Block { chain, number } => {
            Report::Block(reports::block_info(gateway, chain, number.as_deref()).await?)
        }
        Command::Gas { chain } => Report::Gas(reports::gas_price(gateway, chain).await?),
        Command::Nonce { address, chain } => {
            Report::Nonce(reports::transaction_count(gateway, chain, address).await?)
        }
        Command::Tokens { address } => {
            Report::Tokens(reports::token_holdings(gateway, address).await?)
        }
        Command::History { address, limit } => {
            Report::History(reports::recent_transactions(gateway, address, *limit).await?)
        }
        Command::Rpc {
            method,
            chain,
            params,
        } => {
            let params = parse_params(params.as_deref())?;
            Report::Raw(gateway.call(chain, method, params).await?)
        }
    };
    Ok(report)
}

/// Wraps a failed single-chain command with the chain it targeted.
pub fn with_chain_context(command: &Command, result: Result<Report>) -> Result<Report> {
    match command.chain() {
        Some(chain) => result.with_context(|| format!("request on {chain} failed")),
        None => result,
    }
}

fn parse_params(raw: Option<&str>) -> Result<Vec<Value>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(params)) => Ok(params),
        Ok(other) => Err(anyhow!(
            "invalid --params: expected a JSON array, got {other}"
        )),
        Err(err) => Err(anyhow!("invalid --params: {err}")),
    }
}
