use crate::{
    config::Config,
    report::ScanReport,
    scanner::Scanner,
    slot::{date_folder, parse_date, Slot},
    source::FsLogSource,
    util::{ensure_dir, now_rfc3339},
};
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser, Debug)]
#[command(name = "slot-status")]
#[command(about = "OK/NOK/TBC status per area for one price-generation time slot")]
pub struct Args {
    /// Date folder as YYYY-MM-DD, or 'today'.
    #[arg(long)]
    pub date: String,

    /// Scheduled slot. 16:30 checks the FinalRun log, the others the EarlyRun log.
    #[arg(long, value_parser = parse_slot)]
    pub slot: Slot,

    /// Include the reason and the captured block in the output.
    #[arg(long)]
    pub verbose: bool,

    /// Print the whole run as JSON.
    #[arg(long)]
    pub json: bool,

    /// Only check these areas (repeatable). Defaults to every configured area.
    #[arg(long = "area")]
    pub areas: Vec<String>,

    /// Override paths.log_root.
    #[arg(long)]
    pub root: Option<String>,

    /// Override scan.region.
    #[arg(long)]
    pub region: Option<String>,

    /// Print candidate log paths per area and exit without reading them.
    #[arg(long)]
    pub dry_run: bool,

    /// Path to config TOML. If omitted, uses ./slot-status.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,
}

fn parse_slot(s: &str) -> Result<Slot, String> {
    s.parse().map_err(|e: crate::error::UsageError| e.to_string())
}

pub fn dispatch(args: Args) -> Result<()> {
    let date = parse_date(&args.date)?;

    let mut cfg = match resolve_config_path(args.config.as_deref()) {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };
    if let Some(root) = &args.root {
        cfg.paths.log_root = root.clone();
    }
    if let Some(region) = &args.region {
        cfg.scan.region = region.clone();
    }

    let log_path = resolve_log_path(&cfg);
    let _guard = init_logging(&args, &cfg, log_path.as_deref())?;

    let scanner = Scanner::new(&cfg, FsLogSource)?;
    let areas = scanner.select_areas(&args.areas)?;

    if args.dry_run {
        for (area, candidates) in scanner.plan(date, args.slot, &areas) {
            println!("{area}:");
            for path in candidates {
                println!("   {}", path.display());
            }
        }
        return Ok(());
    }

    let verbose = args.verbose || cfg.output.verbose;
    let mut results = scanner.scan(date, args.slot, &areas);
    info!("scanned {} area(s)", results.len());

    if args.json || cfg.output.json {
        if !verbose {
            for r in &mut results {
                r.block.clear();
            }
        }
        let report = ScanReport {
            date: date_folder(date),
            slot: args.slot,
            run_kind: args.slot.run_kind(),
            generated_at: now_rfc3339(),
            results,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for r in &results {
            println!("{}", r.render(verbose));
        }
    }

    Ok(())
}

fn resolve_config_path(user: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = user {
        return Some(p.to_path_buf());
    }
    let default = PathBuf::from("slot-status.toml");
    default.exists().then_some(default)
}

fn init_logging(args: &Args, cfg: &Config, file_path: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries the status lines.
    let stderr_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    };

    let (file_layer, guard) = if let Some(path) = file_path {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        ensure_dir(parent)?;
        let file = std::fs::File::create(path)
            .with_context(|| format!("create log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

fn resolve_log_path(cfg: &Config) -> Option<PathBuf> {
    if !cfg.logging.write_to_file || cfg.logging.file_path.is_empty() {
        return None;
    }
    Some(PathBuf::from(&cfg.logging.file_path))
}
