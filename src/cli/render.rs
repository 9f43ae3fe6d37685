use std::fmt::Write;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use super::commands::Report;
use crate::analysis::reports::{
    BlockReport, EvmTransactionReport, RecentTransactionsReport, SolanaTransactionReport,
    SupportedChainsReport, TokenHoldingsReport, TransactionReport, TxStatus,
};
use crate::analysis::{MultiChainReport, NativeBalance};

pub fn render_json(report: &Report) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

pub fn render_text(report: &Report) -> String {
    let mut out = String::new();
    match report {
        Report::Chains(chains) => write_chains(&mut out, chains),
        Report::Balance(balance) => write_balance(&mut out, balance),
        Report::Analyze(analysis) => write_analysis(&mut out, analysis),
        Report::Transaction(TransactionReport::Evm(tx)) => write_evm_transaction(&mut out, tx),
        Report::Transaction(TransactionReport::Solana(tx)) => {
            write_solana_transaction(&mut out, tx)
        }
        Report::Block(block) => write_block(&mut out, block),
        Report::Gas(gas) => {
            let _ = writeln!(
                out,
                "Gas price on {}: {} gwei ({} wei)",
                gas.chain, gas.gas_price_gwei, gas.gas_price_wei
            );
        }
        Report::Nonce(nonce) => {
            let _ = writeln!(
                out,
                "Transaction count for {} on {}: {}",
                nonce.address, nonce.chain, nonce.transaction_count
            );
        }
        Report::Tokens(tokens) => write_tokens(&mut out, tokens),
        Report::History(history) => write_history(&mut out, history),
        Report::Raw(value) => {
            let text = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
            let _ = writeln!(out, "{text}");
        }
    }
    out
}

fn write_chains(out: &mut String, report: &SupportedChainsReport) {
    let _ = writeln!(out, "Supported chains ({})", report.count);
    for chain in &report.chains {
        let _ = writeln!(
            out,
            "  {:<10} {:<18} {:<8} {}",
            chain.id, chain.display_name, chain.chain_id, chain.symbol
        );
    }
}

fn write_balance(out: &mut String, balance: &NativeBalance) {
    let _ = writeln!(out, "{} ({})", balance.chain_name, balance.chain);
    let _ = writeln!(out, "  address: {}", balance.address);
    let _ = writeln!(out, "  balance: {}", balance.formatted());
    let _ = writeln!(out, "  raw:     {}", balance.raw);
}

fn write_analysis(out: &mut String, report: &MultiChainReport) {
    let _ = writeln!(
        out,
        "Wallet {}: {} chains analyzed, {} succeeded, {} failed",
        report.address, report.chains_analyzed, report.succeeded, report.failed
    );
    for result in &report.results {
        match (&result.payload, &result.error) {
            (Some(balance), _) => {
                let _ = writeln!(out, "  {:<10} {}", result.chain, balance.formatted());
            }
            (None, error) => {
                let _ = writeln!(
                    out,
                    "  {:<10} error: {}",
                    result.chain,
                    error.as_deref().unwrap_or("unknown failure")
                );
            }
        }
    }
}

fn status_text(status: TxStatus) -> &'static str {
    match status {
        TxStatus::Success => "success",
        TxStatus::Failed => "failed",
        TxStatus::Pending => "pending",
    }
}

fn write_evm_transaction(out: &mut String, tx: &EvmTransactionReport) {
    let _ = writeln!(out, "Transaction {} on {}", tx.hash, tx.chain);
    let _ = writeln!(out, "  status:    {}", status_text(tx.status));
    let _ = writeln!(out, "  from:      {}", tx.from);
    let _ = writeln!(
        out,
        "  to:        {}",
        tx.to.as_deref().unwrap_or("(contract creation)")
    );
    let _ = writeln!(out, "  value:     {} {}", tx.value, tx.symbol);
    if let Some(block) = tx.block_number {
        let _ = writeln!(out, "  block:     {block}");
    }
    if let Some(gas_used) = tx.gas_used {
        let _ = writeln!(out, "  gas used:  {gas_used}");
    }
    if let Some(gas_price) = &tx.gas_price_gwei {
        let _ = writeln!(out, "  gas price: {gas_price} gwei");
    }
}

fn write_solana_transaction(out: &mut String, tx: &SolanaTransactionReport) {
    let _ = writeln!(out, "Transaction {} on solana", tx.signature);
    let _ = writeln!(out, "  status: {}", status_text(tx.status));
    let _ = writeln!(out, "  slot:   {}", tx.slot);
    if let Some(block_time) = tx.block_time {
        let _ = writeln!(out, "  time:   {}", format_unix_time(block_time));
    }
    if let Some(fee) = tx.fee_lamports {
        let _ = writeln!(out, "  fee:    {fee} lamports");
    }
    if let Some(error) = &tx.error {
        let _ = writeln!(out, "  error:  {error}");
    }
}

fn write_block(out: &mut String, block: &BlockReport) {
    match block {
        BlockReport::Evm(block) => {
            let number = block
                .block_number
                .map_or_else(|| "(pending)".to_string(), |number| number.to_string());
            let _ = writeln!(
                out,
                "Block {number} on {} (head {})",
                block.chain, block.current_block_number
            );
            if let Some(hash) = &block.block_hash {
                let _ = writeln!(out, "  hash:         {hash}");
            }
            let timestamp = i64::try_from(block.timestamp)
                .map_or_else(|_| block.timestamp.to_string(), format_unix_time);
            let _ = writeln!(out, "  timestamp:    {timestamp}");
            let _ = writeln!(out, "  transactions: {}", block.transaction_count);
            let _ = writeln!(out, "  gas used:     {} / {}", block.gas_used, block.gas_limit);
        }
        BlockReport::Solana(block) => {
            let _ = writeln!(out, "Solana recent blockhash {}", block.recent_blockhash);
            let _ = writeln!(
                out,
                "  fee per signature: {} lamports",
                block.lamports_per_signature
            );
        }
    }
}

fn write_tokens(out: &mut String, report: &TokenHoldingsReport) {
    if report.tokens.is_empty() {
        let _ = writeln!(out, "No token accounts found for {}", report.address);
        return;
    }
    let _ = writeln!(
        out,
        "Token holdings for {} ({})",
        report.address, report.token_count
    );
    for token in &report.tokens {
        let _ = writeln!(
            out,
            "  {}  {}  (account {}, {} decimals)",
            token.mint, token.balance, token.account, token.decimals
        );
    }
}

fn write_history(out: &mut String, report: &RecentTransactionsReport) {
    if report.transactions.is_empty() {
        let _ = writeln!(out, "No recent transactions for {}", report.address);
        return;
    }
    let _ = writeln!(
        out,
        "Recent transactions for {} ({})",
        report.address, report.count
    );
    for tx in &report.transactions {
        let time = tx
            .block_time
            .map_or_else(|| "-".to_string(), format_unix_time);
        let outcome = if tx.error.is_some() { "failed" } else { "ok" };
        let _ = write!(out, "  {}  slot {}  {time}  {outcome}", tx.signature, tx.slot);
        if let Some(memo) = &tx.memo {
            let _ = write!(out, "  memo: {memo}");
        }
        out.push('\n');
    }
}

fn format_unix_time(seconds: i64) -> String {
    OffsetDateTime::from_unix_timestamp(seconds)
        .ok()
        .and_then(|time| time.format(&Rfc3339).ok())
        .unwrap_or_else(|| seconds.to_string())
}
