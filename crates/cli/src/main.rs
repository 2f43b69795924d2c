//! sysping CLI - probe a host with the system ping executable

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;
use std::time::Duration;
use tabled::{Table, Tabled};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sysping_core::application::probe_with_deadline;
use sysping_core::domain::{ProbeOptions, ProbeResult};
use sysping_core::port::Prober;
use sysping_core::ProbeError;
use sysping_infra_system::ProcessController;

const DEFAULT_LOG_FILTER: &str = "sysping=info";

#[derive(Parser)]
#[command(name = "sysping")]
#[command(about = "Probe host reachability with the system ping", long_about = None)]
#[command(version)]
struct Cli {
    /// Host name or IP address to probe
    target: String,

    /// Number of echoes to send
    #[arg(short = 'c', long, env = "SYSPING_COUNT")]
    count: Option<u32>,

    /// Seconds to wait for each reply
    #[arg(short = 'W', long, env = "SYSPING_TIMEOUT")]
    timeout: Option<u32>,

    /// Seconds before ping gives up regardless of replies
    #[arg(short = 'w', long, env = "SYSPING_DEADLINE")]
    deadline: Option<u32>,

    /// ICMP payload size in bytes
    #[arg(short = 's', long, env = "SYSPING_PACKET_SIZE")]
    packet_size: Option<u32>,

    /// Seconds between echoes
    #[arg(short = 'i', long, env = "SYSPING_INTERVAL")]
    interval: Option<f64>,

    /// Source address or interface
    #[arg(short = 'I', long, env = "SYSPING_SOURCE")]
    source: Option<String>,

    /// Use IPv6
    #[arg(short = '6', long = "ipv6", env = "SYSPING_IPV6")]
    ipv6: bool,

    /// Let ping resolve reply addresses to names
    #[arg(long, env = "SYSPING_RESOLVE")]
    resolve: bool,

    /// Kill the ping process after this many seconds
    #[arg(long, env = "SYSPING_KILL_AFTER")]
    kill_after: Option<f64>,

    /// Print the result as JSON
    #[arg(long, env = "SYSPING_JSON")]
    json: bool,

    /// Raw arguments passed through to ping
    #[arg(last = true)]
    extra: Vec<String>,
}

impl Cli {
    fn options(&self) -> ProbeOptions {
        ProbeOptions {
            timeout: self.timeout,
            packets_to_send: self.count,
            use_ipv6: self.ipv6,
            extra: self.extra.clone(),
            numeric: !self.resolve,
            deadline: self.deadline,
            packet_size: self.packet_size,
            source_addr: self.source.clone(),
            interval: self.interval,
        }
    }
}

#[derive(Tabled)]
struct SummaryRow {
    host: String,
    address: String,
    sent: u32,
    received: u32,
    loss: String,
    min: String,
    avg: String,
    max: String,
    stddev: String,
}

impl From<&ProbeResult> for SummaryRow {
    fn from(result: &ProbeResult) -> Self {
        Self {
            host: result.host.clone(),
            address: result.numeric_host.clone().unwrap_or_else(|| "-".to_string()),
            sent: result.packets_sent,
            received: result.packets_received,
            loss: result
                .packet_loss
                .map(|loss| format!("{:.1}%", loss))
                .unwrap_or_else(|| "-".to_string()),
            min: millis(result.min),
            avg: millis(result.avg),
            max: millis(result.max),
            stddev: millis(result.stddev),
        }
    }
}

fn millis(value: Option<f64>) -> String {
    value
        .map(|ms| format!("{:.3} ms", ms))
        .unwrap_or_else(|| "-".to_string())
}

fn init_logging() -> Result<()> {
    let log_format = std::env::var("SYSPING_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))
        .context("Failed to create env filter")?;

    // stdout carries results only
    match log_format.as_str() {
        "json" => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        _ => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
    Ok(())
}

/// Run the probe, killing it on Ctrl-C and reporting whatever it settled with
async fn run_probe(
    controller: &ProcessController,
    target: &str,
    options: &ProbeOptions,
    kill_after: Option<Duration>,
) -> Result<ProbeResult, ProbeError> {
    let probe = async {
        match kill_after {
            Some(deadline) => probe_with_deadline(controller, target, options, deadline).await,
            None => controller.probe(target, options).await,
        }
    };
    tokio::pin!(probe);

    tokio::select! {
        outcome = &mut probe => outcome,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, stopping ping");
            if let Err(e) = controller.kill().await {
                warn!(error = %e, "Failed to kill ping process");
            }
            probe.await
        }
    }
}

fn print_summary(result: &ProbeResult) {
    if result.alive {
        println!("{}", format!("✓ {} is alive", result.host).green().bold());
    } else {
        println!("{}", format!("✗ {} is unreachable", result.host).red().bold());
    }
    println!();

    println!("{}", Table::new(vec![SummaryRow::from(result)]));

    if !result.times.is_empty() {
        let times: Vec<String> = result.times.iter().map(|t| format!("{}", t)).collect();
        println!();
        println!("  {} {} ms", "RTTs:".bold(), times.join(", "));
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    init_logging()?;

    let cli = Cli::parse();
    let options = cli.options();
    let kill_after = cli
        .kill_after
        .map(Duration::try_from_secs_f64)
        .transpose()
        .context("Invalid --kill-after value")?;

    let controller = ProcessController::for_current_platform();
    let result = run_probe(&controller, &cli.target, &options, kill_after)
        .await
        .with_context(|| format!("Failed to probe {}", cli.target))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_summary(&result);
    }

    Ok(if result.alive {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
