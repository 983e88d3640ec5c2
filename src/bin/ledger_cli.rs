//! ledger-cli: inspect a client config and talk to its nodes.
//!
//! Usage:
//!   ledger-cli nodes                         List configured nodes and their health
//!   ledger-cli ping [<node>]                 Ping one node, or every node
//!   ledger-cli balance <account> [--node <node>]
//!   ledger-cli receipt <transaction-id> [--node <node>] [--no-wait]

use anyhow::{anyhow, bail, Context};
use ledger_exec::prelude::*;
use ledger_exec::ClientConfig;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let result = match args[1].as_str() {
        "nodes" => cmd_nodes(&args[2..]),
        "ping" => cmd_ping(&args[2..]).await,
        "balance" => cmd_balance(&args[2..]).await,
        "receipt" => cmd_receipt(&args[2..]).await,
        "version" | "--version" | "-V" => {
            cmd_version();
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"ledger-cli: ledger network client

USAGE:
    ledger-cli <COMMAND> [OPTIONS]

COMMANDS:
    nodes                                   List configured nodes and their health
    ping [<node>]                           Ping one node, or every configured node
    balance <account> [--node <node>]       Show an account balance (free query)
    receipt <txid> [--node <node>] [--no-wait]
                                            Fetch a transaction receipt
    version                                 Show version information
    help                                    Show this help message

OPTIONS:
    --config <path>                         Client config file (YAML or JSON)

ENVIRONMENT:
    LEDGER_CONFIG                           Client config file path
    LEDGER_MAX_ATTEMPTS                     Attempts per request
    LEDGER_REQUEST_TIMEOUT_SECS             Deadline per request (0 disables)
    RUST_LOG                                Log filter (default: info)"#
    );
}

fn cmd_version() {
    println!("ledger-cli {}", env!("CARGO_PKG_VERSION"));
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

/// First argument that is neither a flag nor a flag's value.
fn positional(args: &[String]) -> Option<&str> {
    let mut skip = false;
    for arg in args {
        if skip {
            skip = false;
            continue;
        }
        match arg.as_str() {
            "--config" | "--node" => skip = true,
            a if a.starts_with("--") => {}
            a => return Some(a),
        }
    }
    None
}

fn resolve_config_path(args: &[String]) -> anyhow::Result<PathBuf> {
    if let Some(path) = flag_value(args, "--config") {
        return Ok(PathBuf::from(path));
    }
    if let Ok(path) = std::env::var("LEDGER_CONFIG") {
        return Ok(PathBuf::from(path));
    }
    for candidate in ["ledger.yaml", "ledger.yml", "ledger.json"] {
        let p = PathBuf::from(candidate);
        if p.exists() {
            return Ok(p);
        }
    }
    bail!("cannot find a client config; set LEDGER_CONFIG or use --config")
}

fn load_client(args: &[String]) -> anyhow::Result<Client> {
    let path = resolve_config_path(args)?;
    let cfg = ClientConfig::from_file(&path)
        .with_context(|| format!("loading {}", path.display()))?;
    // No signer is available here, so the operator stays unset: only free
    // queries can be run.
    let cfg = ClientConfig {
        operator_account_id: None,
        ..cfg
    };
    Ok(ClientBuilder::from_config(&cfg).build()?)
}

fn node_arg(args: &[String], client: &Client) -> anyhow::Result<AccountId> {
    match flag_value(args, "--node") {
        Some(raw) => raw
            .parse()
            .map_err(|e| anyhow!("invalid node id {raw:?}: {e}")),
        None => client
            .network()
            .node_account_ids()
            .first()
            .copied()
            .ok_or_else(|| anyhow!("network has no nodes")),
    }
}

fn cmd_nodes(args: &[String]) -> anyhow::Result<()> {
    let client = load_client(args)?;
    println!("{} node(s)", client.network().len());
    for (node, health) in client.network().health() {
        let state = match health.unhealthy_remaining_ms {
            Some(ms) => format!("excluded for {ms}ms"),
            None => "healthy".to_string(),
        };
        println!(
            "  {node:<12} {state} (failures {}/{})",
            health.consecutive_failures, health.failure_threshold
        );
    }
    Ok(())
}

async fn cmd_ping(args: &[String]) -> anyhow::Result<()> {
    let client = load_client(args)?;
    let nodes = match positional(args) {
        Some(raw) => vec![raw
            .parse::<AccountId>()
            .map_err(|e| anyhow!("invalid node id {raw:?}: {e}"))?],
        None => client.network().node_account_ids(),
    };

    let pings = nodes.iter().map(|node| {
        let client = &client;
        async move {
            let start = Instant::now();
            (*node, client.ping(*node).await, start.elapsed())
        }
    });
    let mut failed = 0usize;
    for (node, outcome, elapsed) in futures::future::join_all(pings).await {
        match outcome {
            Ok(_) => println!("  ✓ {node} ({}ms)", elapsed.as_millis()),
            Err(e) => {
                failed += 1;
                println!("  ✗ {node}: {e}");
            }
        }
    }
    if failed > 0 {
        bail!("{failed} of {} node(s) unreachable", nodes.len());
    }
    Ok(())
}

async fn cmd_balance(args: &[String]) -> anyhow::Result<()> {
    let client = load_client(args)?;
    let raw = positional(args).ok_or_else(|| anyhow!("usage: ledger-cli balance <account>"))?;
    let account: AccountId = raw
        .parse()
        .map_err(|e| anyhow!("invalid account id {raw:?}: {e}"))?;

    let mut query = AccountBalanceQuery::new(account);
    if flag_value(args, "--node").is_some() {
        query = query.node_account_ids(vec![node_arg(args, &client)?]);
    }
    let balance = query.execute(&client).await?;
    println!("{}: {}", balance.account_id, balance.hbars);
    Ok(())
}

async fn cmd_receipt(args: &[String]) -> anyhow::Result<()> {
    let client = load_client(args)?;
    let raw = positional(args).ok_or_else(|| anyhow!("usage: ledger-cli receipt <txid>"))?;
    let transaction_id: TransactionId = raw
        .parse()
        .map_err(|e| anyhow!("invalid transaction id {raw:?}: {e}"))?;
    let node = node_arg(args, &client)?;

    if args.iter().any(|a| a == "--no-wait") {
        let receipt = TransactionReceiptQuery::new(transaction_id)
            .node_account_ids(vec![node])
            .execute(&client)
            .await?;
        println!("{}", serde_json::to_string_pretty(&receipt)?);
        return Ok(());
    }

    match ReceiptPoller::new(&client, transaction_id, node).wait().await? {
        ReceiptState::Success(receipt) | ReceiptState::KnownFailure(receipt) => {
            println!("{}", serde_json::to_string_pretty(&receipt)?);
        }
        ReceiptState::TimedOut | ReceiptState::Pending => {
            bail!("receipt for {transaction_id} is still pending");
        }
    }
    Ok(())
}
