use serde_json::{Value, json};
use std::path::Path;
use std::process::{Command, Output};
use tempfile::{TempDir, tempdir};
use wiremock::matchers::{body_partial_json, header, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Sandbox {
    home: TempDir,
    xdg_config_home: TempDir,
    xdg_state_home: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            home: tempdir().expect("create temp home"),
            xdg_config_home: tempdir().expect("create temp xdg config home"),
            xdg_state_home: tempdir().expect("create temp xdg state home"),
        }
    }

    async fn run(&self, endpoint: &str, args: &[&str]) -> Output {
        let mut command = Command::new(binary_path());
        command
            .args(args)
            .current_dir(self.home.path())
            .env_remove("CHAINSCOPE_API_KEY")
            .env_remove("CHAINSCOPE_TIMEOUT_MS")
            .env("CHAINSCOPE_RPC_ENDPOINT", endpoint)
            .env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.xdg_config_home.path())
            .env("XDG_STATE_HOME", self.xdg_state_home.path());

        tokio::task::spawn_blocking(move || command.output().expect("run chainscope"))
            .await
            .expect("join command")
    }

    fn traces_dir(&self) -> std::path::PathBuf {
        self.xdg_state_home.path().join("chainscope").join("traces")
    }
}

async fn mount_result(server: &MockServer, chain: &str, rpc_method: &str, result: Value) {
    Mock::given(method("POST"))
        .and(header("x-chain", chain))
        .and(body_partial_json(json!({"method": rpc_method})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"jsonrpc": "2.0", "id": 1, "result": result})),
        )
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn balance_prints_formatted_native_amount() {
    let server = MockServer::start().await;
    mount_result(&server, "ethereum", "eth_getBalance", json!("0xde0b6b3a7640000")).await;
    let sandbox = Sandbox::new();

    let output = sandbox
        .run(&server.uri(), &["balance", "0xabc", "--chain", "ethereum"])
        .await;

    assert!(output.status.success(), "balance should succeed: {output:?}");
    let stdout = String::from_utf8(output.stdout).expect("stdout is utf-8");
    assert!(
        stdout.contains("balance: 1.000000 ETH"),
        "unexpected output: {stdout:?}"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn analyze_reports_partial_failure_as_json_and_exits_zero() {
    let server = MockServer::start().await;
    mount_result(&server, "ethereum", "eth_getBalance", json!("0x0")).await;
    Mock::given(method("POST"))
        .and(header("x-chain", "polygon"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend down"))
        .mount(&server)
        .await;
    mount_result(
        &server,
        "solana",
        "getBalance",
        json!({"context": {"slot": 1}, "value": 1_500_000_000u64}),
    )
    .await;
    let sandbox = Sandbox::new();

    let output = sandbox
        .run(
            &server.uri(),
            &["analyze", "0xabc", "--chains", "ethereum,polygon,solana", "--json"],
        )
        .await;

    assert!(output.status.success(), "analyze should succeed: {output:?}");
    let report: Value = serde_json::from_slice(&output.stdout).expect("json report");
    assert_eq!(report["chainsAnalyzed"], 3);
    assert_eq!(report["failed"], 1);
    assert_eq!(report["results"][1]["chain"], "polygon");
    assert_eq!(report["results"][1]["success"], false);
    assert_eq!(report["results"][2]["payload"]["balance"], "1.5000");
}

#[tokio::test(flavor = "multi_thread")]
async fn single_chain_failure_exits_non_zero() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": -32000, "message": "header not found"}
        })))
        .mount(&server)
        .await;
    let sandbox = Sandbox::new();

    let output = sandbox.run(&server.uri(), &["gas", "--chain", "base"]).await;

    assert!(!output.status.success(), "gas should fail");
    let stderr = String::from_utf8(output.stderr).expect("stderr is utf-8");
    assert!(stderr.contains("request on base failed"), "stderr: {stderr:?}");
    assert!(stderr.contains("header not found"), "stderr: {stderr:?}");
}

#[tokio::test(flavor = "multi_thread")]
async fn bare_string_gateway_error_is_reported_as_rpc_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": "rate limited"
        })))
        .mount(&server)
        .await;
    let sandbox = Sandbox::new();

    let output = sandbox.run(&server.uri(), &["gas", "--chain", "optimism"]).await;

    assert!(!output.status.success(), "gas should fail");
    let stderr = String::from_utf8(output.stderr).expect("stderr is utf-8");
    assert!(
        stderr.contains("RPC error: rate limited (code: 0)"),
        "stderr: {stderr:?}"
    );
    assert!(!stderr.contains("malformed"), "stderr: {stderr:?}");
}

#[tokio::test(flavor = "multi_thread")]
async fn unsupported_chain_fails_without_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let sandbox = Sandbox::new();

    let output = sandbox
        .run(&server.uri(), &["balance", "0xabc", "--chain", "dogecoin"])
        .await;

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).expect("stderr is utf-8");
    assert!(stderr.contains("Unsupported chain: dogecoin"), "stderr: {stderr:?}");
}

#[tokio::test(flavor = "multi_thread")]
async fn verbose_redacts_api_key_and_trace_keeps_raw_traffic() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("authorization", "Bearer secret-key"))
        .and(header("x-chain", "arbitrum"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": "0x7"
        })))
        .expect(1)
        .mount(&server)
        .await;
    let sandbox = Sandbox::new();
    write_config(
        sandbox.xdg_config_home.path(),
        "api_key = \"secret-key\"\n",
    );

    let output = sandbox
        .run(
            &server.uri(),
            &["nonce", "0xabc", "--chain", "arbitrum", "--verbose", "--trace"],
        )
        .await;

    assert!(output.status.success(), "nonce should succeed: {output:?}");
    let stdout = String::from_utf8(output.stdout).expect("stdout is utf-8");
    assert!(stdout.contains("Transaction count for 0xabc on arbitrum: 7"));

    let stderr = String::from_utf8(output.stderr).expect("stderr is utf-8");
    assert!(stderr.contains("[http-debug]"), "stderr: {stderr:?}");
    assert!(!stderr.contains("secret-key"), "api key leaked: {stderr:?}");

    let traces: Vec<_> = std::fs::read_dir(sandbox.traces_dir())
        .expect("trace dir exists")
        .map(|entry| entry.expect("dir entry").path())
        .collect();
    assert_eq!(traces.len(), 1);
    let trace = std::fs::read_to_string(&traces[0]).expect("read trace");
    assert!(trace.contains("nonce 0xabc --chain arbitrum"));
    assert!(trace.contains("Bearer secret-key"));
    assert!(trace.contains("eth_getTransactionCount"));
    assert!(
        trace.contains(r#"[rpc.call ] #1 arbitrum eth_getTransactionCount ["0xabc","latest"]"#),
        "trace: {trace}"
    );
    assert!(trace.contains("[rpc.ok   ] #1 "), "trace: {trace}");
}

#[tokio::test(flavor = "multi_thread")]
async fn invalid_config_is_reported() {
    let server = MockServer::start().await;
    let sandbox = Sandbox::new();
    write_config(sandbox.xdg_config_home.path(), "theme = \"dark\"\n");

    let output = sandbox.run(&server.uri(), &["chains"]).await;

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).expect("stderr is utf-8");
    assert!(stderr.contains("Failed to load config"), "stderr: {stderr:?}");
}

fn write_config(xdg_config_home: &Path, contents: &str) {
    let config_dir = xdg_config_home.join("chainscope");
    std::fs::create_dir_all(&config_dir).expect("create config dir");
    std::fs::write(config_dir.join("config.toml"), contents).expect("write config");
}

fn binary_path() -> String {
    std::env::var("CARGO_BIN_EXE_chainscope")
        .unwrap_or_else(|_| "target/debug/chainscope".to_string())
}
