mod collector;
mod inventory;
mod report;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tokio::sync::Semaphore;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use netvitals_core::health::HealthRecord;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_WORKERS: usize = 8;

fn print_usage() {
    eprintln!("Usage: netvitals-agent <inventory.yaml> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --site <SITE>     Only collect devices tagged with this site");
    eprintln!("  --role <ROLE>     Only collect devices tagged with this role");
    eprintln!("  --output <PATH>   Report path (default: netvitals-report-<timestamp>.csv)");
    eprintln!("  --workers <N>     Concurrent device collections (default: {DEFAULT_WORKERS})");
    eprintln!("  --version         Print version and exit");
    eprintln!("  --help            Print this help message");
}

#[derive(Debug)]
struct Options {
    inventory: PathBuf,
    site: String,
    role: String,
    output: Option<PathBuf>,
    workers: usize,
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut inventory: Option<PathBuf> = None;
    let mut site = String::new();
    let mut role = String::new();
    let mut output: Option<PathBuf> = None;
    let mut workers = DEFAULT_WORKERS;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--site" => {
                site = iter
                    .next()
                    .ok_or("--site requires a value")?
                    .clone();
            }
            "--role" => {
                role = iter
                    .next()
                    .ok_or("--role requires a value")?
                    .clone();
            }
            "--output" => {
                output = Some(PathBuf::from(
                    iter.next().ok_or("--output requires a value")?,
                ));
            }
            "--workers" => {
                let value = iter.next().ok_or("--workers requires a value")?;
                workers = value
                    .parse::<usize>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| format!("--workers must be a positive integer, got '{value}'"))?;
            }
            other if other.starts_with("--") => {
                return Err(format!("Unknown option: {other}"));
            }
            other => {
                if inventory.is_some() {
                    return Err(format!("Unexpected argument: {other}"));
                }
                inventory = Some(PathBuf::from(other));
            }
        }
    }

    let inventory = inventory.ok_or("Missing inventory file argument")?;
    Ok(Options {
        inventory,
        site,
        role,
        output,
        workers,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.is_empty() {
        print_usage();
        std::process::exit(1);
    }
    if args.iter().any(|arg| arg == "--help") {
        print_usage();
        return Ok(());
    }
    if args.iter().any(|arg| arg == "--version") {
        println!("netvitals-agent {VERSION}");
        return Ok(());
    }

    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{message}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    // Log to stderr so a report piped from stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("netvitals-agent {} starting", VERSION);
    run(options).await
}

async fn run(options: Options) -> anyhow::Result<()> {
    let devices = inventory::load(&options.inventory).context("loading inventory")?;
    let devices = inventory::filter(devices, &options.site, &options.role);
    if devices.is_empty() {
        anyhow::bail!(
            "no devices match site '{}' role '{}'",
            options.site,
            options.role
        );
    }

    let started = chrono::Local::now();
    info!(
        devices = devices.len(),
        workers = options.workers,
        "starting proactive maintenance run"
    );

    // Bounded fan-out: collection is blocking SSH work, so each device
    // runs on the blocking pool behind a semaphore permit. Records come
    // back in inventory order regardless of completion order.
    let semaphore = Arc::new(Semaphore::new(options.workers));
    let mut tasks = Vec::with_capacity(devices.len());
    for device in devices {
        let semaphore = Arc::clone(&semaphore);
        let host = device.host.clone();
        let handle = tokio::spawn(async move {
            // The semaphore is never closed, so a permit always arrives.
            let _permit = semaphore.acquire_owned().await.ok();
            tokio::task::spawn_blocking(move || collector::collect_host(&device)).await
        });
        tasks.push((host, handle));
    }

    let mut records = Vec::with_capacity(tasks.len());
    for (host, handle) in tasks {
        match handle.await {
            Ok(Ok(record)) => records.push(record),
            Ok(Err(err)) | Err(err) => {
                error!(%err, host = %host, "collection task failed");
                records.push(HealthRecord::unknown(host));
            }
        }
    }

    let output = options
        .output
        .unwrap_or_else(|| report::default_report_path(started));
    report::write_report(&output, &records)
        .with_context(|| format!("writing report to {}", output.display()))?;

    info!(
        records = records.len(),
        output = %output.display(),
        "maintenance run complete"
    );
    Ok(())
}
