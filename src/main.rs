// Parking Compliance Monitor - Main Entry Point
//
// You can run it via Cargo:
//
// ```console
// $ cargo build --release
// $ ./target/release/parking-compliance-monitor
// ```
//
// Or with custom configuration:
//
// ```console
// $ ./target/release/parking-compliance-monitor --scenario rush_hour --ticks 12 --tick-interval-ms 500 --verbose
// ```

use anyhow::{bail, Context, Result};
use clap::Parser;
use parking_compliance_monitor::ledger::ViolationFilter;
use parking_compliance_monitor::projection::LotStatus;
use parking_compliance_monitor::simulation::{
    AggregateStats, ChronicOffender, ComplianceMonitor, HeatmapCell, LoggingConfig, MonitorService,
    SimulationState,
};
use parking_compliance_monitor::types::{
    CliArgs, MonitorConfig, OutputFormat, SimulationScenario, ViolationStatus,
};
use parking_compliance_monitor::Violation;
use serde::Serialize;
use std::process;
use std::time::Duration;
use tracing::{error, info};

/// Everything printed at the end of a run
#[derive(Debug, Serialize)]
struct MonitorSnapshot {
    state: SimulationState,
    stats: AggregateStats,
    lots: Vec<LotStatus>,
    active_violations: Vec<Violation>,
    chronic_offenders: Vec<ChronicOffender>,
    heatmap: Vec<HeatmapCell>,
}

fn main() {
    let args = CliArgs::parse();

    if args.print_config {
        match MonitorConfig::default().print_json() {
            Ok(json) => {
                println!("{}", json);
                return;
            }
            Err(e) => {
                eprintln!("Failed to serialize default configuration: {}", e);
                process::exit(1);
            }
        }
    }

    let _logging_guard = match LoggingConfig::for_cli(args.verbose, args.debug, false).init() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run(args) {
        error!("Monitor failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(args: CliArgs) -> Result<()> {
    let dry_run = args.dry_run;
    let config = MonitorConfig::from_cli_args(args).context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;
    info!("Configuration loaded and validated successfully");

    if dry_run {
        eprintln!("Configuration validation successful!");
        eprintln!("Dry run mode - the monitor will not be started.");
        print_configuration_summary(&config);
        return Ok(());
    }

    print_configuration_summary(&config);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to build async runtime")?;

    runtime.block_on(run_simulation(config))
}

async fn run_simulation(config: MonitorConfig) -> Result<()> {
    let scenario = config.get_scenario().map_err(anyhow::Error::msg)?;
    let output_format = config.get_output_format().map_err(anyhow::Error::msg)?;
    let ticks = config.ticks;
    let tick_interval = config.tick_interval();

    let monitor = ComplianceMonitor::from_config(config).context("Failed to load baseline")?;
    let service = MonitorService::new(monitor.clone());

    let state = service.start_simulation(scenario).await?;
    info!(scenario = %scenario, started_at = ?state.started_at, "Simulation running");
    eprintln!("Running {} ticks of {} ...", ticks, scenario.display_name());

    wait_for_ticks(&service, tick_interval, ticks).await?;

    let snapshot = collect_snapshot(&service).await?;
    service.stop_simulation().await?;

    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        OutputFormat::Text => print_text_snapshot(&snapshot, scenario),
    }

    info!("Parking Compliance Monitor completed successfully");
    Ok(())
}

/// Wait until the scheduler has applied the requested number of ticks
async fn wait_for_ticks(service: &MonitorService, tick_interval: Duration, ticks: usize) -> Result<()> {
    let target_events = ticks as u64;
    let poll = (tick_interval / 4).max(Duration::from_millis(10));
    let deadline = tokio::time::Instant::now() + tick_interval * (ticks as u32 + 2);

    loop {
        let state = service.monitor().get_simulation_state()?;
        if state.events_generated >= target_events {
            return Ok(());
        }
        if tokio::time::Instant::now() >= deadline {
            bail!(
                "Timed out after {} of {} ticks",
                state.events_generated,
                target_events
            );
        }
        tokio::time::sleep(poll).await;
    }
}

async fn collect_snapshot(service: &MonitorService) -> Result<MonitorSnapshot> {
    let active_filter = ViolationFilter::default().with_status(ViolationStatus::Active);

    Ok(MonitorSnapshot {
        state: service.simulation_state().await?,
        stats: service.stats().await?,
        lots: service.lots().await?,
        active_violations: service.violations(Some(active_filter)).await?,
        chronic_offenders: service.chronic_offenders().await?,
        heatmap: service.heatmap().await?,
    })
}

fn print_configuration_summary(config: &MonitorConfig) {
    eprintln!("Parking Compliance Monitor");
    eprintln!("==========================");
    eprintln!("Configuration:");
    match &config.seed_data {
        Some(path) => eprintln!("  Seed Data: {}", path),
        None => {
            eprintln!("  Generated Facilities: {}", config.facility_count);
            eprintln!("  Historical Violations: {}", config.historical_violations);
        }
    }
    eprintln!("  Scenario: {}", config.scenario);
    eprintln!("  Ticks: {} every {} ms", config.ticks, config.tick_interval_ms);
    eprintln!(
        "  Initial Load: {:.0}% - {:.0}%",
        config.initial_load_min * 100.0,
        config.initial_load_max * 100.0
    );
    eprintln!("  Output Format: {}", config.output_format);
    if let Some(seed) = config.seed {
        eprintln!("  Random Seed: {}", seed);
    }
    eprintln!();
}

fn print_text_snapshot(snapshot: &MonitorSnapshot, scenario: SimulationScenario) {
    println!("Scenario: {} ({} ticks)", scenario.display_name(), snapshot.state.events_generated);
    println!();
    println!("{}", snapshot.stats);
    println!();
    println!("{:<32} {:>8} {:>8} {:>8}  {}", "Facility", "Count", "Cap", "Util%", "Status");
    for lot in &snapshot.lots {
        println!(
            "{:<32} {:>8} {:>8} {:>7.1}%  {}",
            lot.facility.name,
            lot.current_count,
            lot.facility.capacity,
            lot.utilization_percent,
            lot.status
        );
    }

    if !snapshot.active_violations.is_empty() {
        println!();
        println!("Active violations:");
        for violation in &snapshot.active_violations {
            println!(
                "  {} {} peak {} (+{}) since {}",
                violation.id,
                violation.facility_name,
                violation.peak_count,
                violation.max_excess,
                violation.started_at.format("%Y-%m-%d %H:%M")
            );
        }
    }

    if !snapshot.chronic_offenders.is_empty() {
        println!();
        println!("Chronic offenders:");
        for offender in snapshot.chronic_offenders.iter().take(5) {
            println!(
                "  {:<28} {:>4} violations {:>8.1} h  penalties {}",
                offender.operator,
                offender.total_violations,
                offender.total_violation_hours,
                offender.total_penalties
            );
        }
    }
}
