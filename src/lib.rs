pub mod analysis;
pub mod cli;
pub mod config;
pub mod http;
pub mod rpc;
pub mod trace;

use anyhow::{Result, anyhow};
use cli::commands::with_chain_context;
use cli::render::{render_json, render_text};
use cli::{CliArgs, execute};
use config::AppConfig;
use http::client::HttpClient;
use rpc::GatewayClient;
use std::time::{SystemTime, UNIX_EPOCH};
use trace::SessionTrace;

pub async fn run(args: CliArgs) -> Result<()> {
    let config = AppConfig::load_with_path(args.config.as_deref())?;
    let session_id = generate_session_id();

    let mut http = HttpClient::new(
        reqwest::Client::new(),
        config.http_debug.to_debug_config(args.verbose),
    );
    let trace = if args.trace {
        let trace = SessionTrace::create(&session_id)?;
        trace.log_command(&command_line());
        eprintln!("trace: {}", trace.file_path().display());
        http = http.with_trace(trace.clone());
        Some(trace)
    } else {
        None
    };

    let gateway = GatewayClient::new(http, config.rpc_endpoint.clone(), config.api_key.clone())
        .with_timeout(config.request_timeout);

    let result = execute(&args.command, &gateway, config.default_chains.as_deref()).await;
    let report = match with_chain_context(&args.command, result) {
        Ok(report) => report,
        Err(err) => {
            if let Some(trace) = &trace {
                trace.log_failure(&format!("{err:#}"));
            }
            return Err(err);
        }
    };

    let output = if args.json {
        render_json(&report).map_err(|err| anyhow!("Failed to encode report as JSON: {err}"))?
    } else {
        render_text(&report)
    };
    if let Some(trace) = &trace {
        trace.log_output(&output);
    }
    print!("{output}");
    if args.json {
        println!();
    }

    Ok(())
}

fn command_line() -> String {
    std::env::args().collect::<Vec<_>>().join(" ")
}

fn generate_session_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_millis());
    format!("{millis:x}-{:x}", std::process::id())
}
