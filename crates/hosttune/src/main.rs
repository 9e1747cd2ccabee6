//! hosttune - raises kernel network limits that are below recommended values.
//!
//! Usage:
//!   hosttune tune                        # apply every tuner to this host
//!   hosttune tune --script ./tune.sh     # record changes into a script instead
//!   hosttune tune --tuners syn_backlog   # run selected tuners only
//!   hosttune check --json                # report current values, change nothing
//!   hosttune info --interface eth0       # show NIC/IRQ details

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

use hosttune_core::config::{DEFAULT_TIMEOUT, ExecutionMode, TuneConfig, TunerKind};
use hosttune_core::fs::FileSystem;
#[cfg(target_os = "linux")]
use hosttune_core::fs::RealFs;
#[cfg(not(target_os = "linux"))]
use hosttune_core::mock::MockFs;
use hosttune_core::os::{Proc, SystemProc};
use hosttune_core::tuner::{NetTunersFactory, TunerOutcome};

/// Host tuner for network-heavy services.
#[derive(Parser)]
#[command(name = "hosttune", about = "Kernel network limits tuner", version)]
struct Args {
    #[command(subcommand)]
    command: Cmd,

    /// Timeout for external tools in milliseconds.
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT.as_millis() as u64)]
    timeout_ms: u64,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Cmd {
    /// Raise every selected limit that is below its reference value.
    Tune {
        /// Write the changes to a shell script instead of applying them.
        #[arg(long, value_name = "PATH")]
        script: Option<PathBuf>,

        /// Comma-separated tuners to run (default: all).
        #[arg(long, value_delimiter = ',')]
        tuners: Vec<TunerKind>,
    },
    /// Report current values against their references.
    Check {
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,

        /// Comma-separated tuners to check (default: all).
        #[arg(long, value_delimiter = ',')]
        tuners: Vec<TunerKind>,
    },
    /// Show NIC, IRQ and CPU details gathered by the tuner collaborators.
    Info {
        /// Interface to inspect (default: every interface).
        #[arg(long)]
        interface: Option<String>,
    },
}

/// Initializes the tracing subscriber with the appropriate log level.
/// Default level is INFO. Use -q for quiet mode (errors only).
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let mut filter = EnvFilter::from_default_env();
    for krate in ["hosttune", "hosttune_core"] {
        if let Ok(directive) = format!("{}={}", krate, level).parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn selected(tuners: &[TunerKind]) -> Vec<TunerKind> {
    if tuners.is_empty() {
        TunerKind::ALL.to_vec()
    } else {
        tuners.to_vec()
    }
}

type CliResult = Result<bool, Box<dyn std::error::Error>>;

/// Runs the selected tuners. Returns `true` if all of them succeeded.
fn tune<F: FileSystem + Clone + 'static>(
    fs: F,
    proc: Arc<dyn Proc>,
    config: &TuneConfig,
) -> CliResult {
    let executor = config
        .mode
        .build_executor(fs.clone(), proc.clone(), config.timeout)?;
    let factory = NetTunersFactory::build(fs, proc, executor, config.timeout)?;

    let outcomes = factory.run(&config.tuners);
    for outcome in &outcomes {
        match outcome {
            TunerOutcome::Skipped { id, reason } => {
                println!("{:<16} skipped ({})", id, reason)
            }
            TunerOutcome::Tuned { id, result } => match result.error() {
                Some(e) => println!("{:<16} FAILED: {}", id, e),
                None if result.is_changed() => println!("{:<16} changed", id),
                None => println!("{:<16} ok", id),
            },
        }
    }

    if let ExecutionMode::Script(path) = &config.mode {
        info!("tuning script written to {}", path.display());
    }
    Ok(outcomes.iter().all(|o| !o.is_failed()))
}

/// Prints check results. Returns `true` if every value meets its reference.
fn check<F: FileSystem + Clone + 'static>(
    fs: F,
    proc: Arc<dyn Proc>,
    config: &TuneConfig,
    json: bool,
) -> CliResult {
    let executor =
        ExecutionMode::Direct.build_executor(fs.clone(), proc.clone(), config.timeout)?;
    let factory = NetTunersFactory::build(fs, proc, executor, config.timeout)?;

    let results: Vec<_> = factory
        .checkers(&config.tuners)
        .iter()
        .map(|c| c.check())
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for r in &results {
            let current = match (r.current, &r.error) {
                (Some(v), _) => v.to_string(),
                (None, Some(e)) => e.clone(),
                (None, None) => "-".to_string(),
            };
            println!(
                "{:<36} {:>10} {:>10}  {}",
                r.desc,
                r.required,
                current,
                if r.is_ok { "ok" } else { "below reference" }
            );
        }
    }
    Ok(results.iter().all(|r| r.is_ok))
}

fn host_info<F: FileSystem + Clone + 'static>(
    fs: F,
    proc: Arc<dyn Proc>,
    timeout: Duration,
    interface: Option<&str>,
) -> CliResult {
    let executor = ExecutionMode::Direct.build_executor(fs.clone(), proc.clone(), timeout)?;
    let factory = NetTunersFactory::build(fs, proc, executor, timeout)?;

    let interfaces = match interface {
        Some(iface) => vec![iface.to_string()],
        None => factory.device_info().interfaces()?,
    };
    for iface in &interfaces {
        let irqs = factory.device_info().irqs(iface)?;
        let driver = factory
            .offload()
            .driver(iface)
            .unwrap_or_else(|e| format!("unknown ({})", e));
        println!("{}: driver={} irqs={:?}", iface, driver, irqs);
    }

    let balance = factory.balance_service();
    println!(
        "irqbalance: running={} banned={:?}",
        balance.is_running(),
        balance.banned_irqs()?
    );

    let masks = factory.cpu_masks();
    if masks.is_supported() {
        println!("cpus: {}", masks.all_cpus_mask()?);
    } else {
        println!("cpus: hwloc-calc not available");
    }
    Ok(true)
}

fn main() {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    #[cfg(target_os = "linux")]
    let fs = RealFs::new();
    #[cfg(not(target_os = "linux"))]
    let fs = MockFs::untuned_host();

    let proc: Arc<dyn Proc> = Arc::new(SystemProc::new());
    let timeout = Duration::from_millis(args.timeout_ms);

    let result = match args.command {
        Cmd::Tune { script, tuners } => {
            let mode = script.map(ExecutionMode::Script).unwrap_or_default();
            let config = TuneConfig::new(mode, timeout, selected(&tuners));
            tune(fs, proc, &config)
        }
        Cmd::Check { json, tuners } => {
            let config = TuneConfig::new(ExecutionMode::Direct, timeout, selected(&tuners));
            check(fs, proc, &config, json)
        }
        Cmd::Info { interface } => host_info(fs, proc, timeout, interface.as_deref()),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}
