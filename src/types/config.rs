//! Configuration structures for the compliance monitor
//!
//! This module contains the monitor configuration, its command line surface and
//! the validation rules applied before a monitor is built.

use super::{OutputFormat, SimulationScenario};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Load factor bounds applied to each facility when a simulation starts
pub mod initial_load {
    /// Lower bound of the start-time occupancy, as a fraction of capacity
    pub const MIN_FACTOR: f64 = 0.9;

    /// Upper bound of the start-time occupancy, as a fraction of capacity
    pub const MAX_FACTOR: f64 = 1.2;
}

/// Command line arguments structure
#[derive(Debug, Clone, Parser)]
#[command(
    name = "parking-compliance-monitor",
    version = "0.1.0",
    about = "Parking Compliance Monitor - tracks capacity violations and penalties",
    long_about = "Monitors occupancy of parking facilities against their authorized capacity, opens and resolves violation records, and computes penalties. Simulation mode drives synthetic occupancy readings on a fixed cadence.

EXAMPLES:
    # Run a short simulation with the generated baseline
    parking-compliance-monitor

    # Use a seed data file and a configuration file
    parking-compliance-monitor --seed-data lots.json --config monitor.json

    # Drive twenty fast ticks of the event surge scenario
    parking-compliance-monitor --scenario event_surge --ticks 20 --tick-interval-ms 200

    # Generate configuration template
    parking-compliance-monitor --print-config > monitor.json

CONFIGURATION:
    1. Command line arguments (highest priority)
    2. Configuration file (--config flag, JSON)
    3. Default values (lowest priority)"
)]
pub struct CliArgs {
    /// Configuration file path (JSON format)
    #[arg(
        short,
        long,
        help = "Configuration file path (JSON format)",
        long_help = "Path to a JSON configuration file. CLI arguments will override file settings."
    )]
    pub config: Option<String>,

    /// Seed data file with facilities and historical violations
    #[arg(long, help = "Seed data file (JSON) with facilities and violation history")]
    pub seed_data: Option<String>,

    /// Period between scheduled ticks in milliseconds
    #[arg(long, help = "Milliseconds between scheduled ticks")]
    pub tick_interval_ms: Option<u64>,

    /// Number of ticks to drive before stopping
    #[arg(long, help = "Number of ticks to run before stopping")]
    pub ticks: Option<usize>,

    /// Simulation scenario
    #[arg(
        long,
        help = "Simulation scenario (standard, rush_hour, event_surge)",
        long_help = "Synthetic load scenario. Supported: standard, rush_hour, event_surge. Default: standard"
    )]
    pub scenario: Option<String>,

    /// Number of facilities in the generated baseline
    #[arg(long, help = "Number of facilities to generate when no seed data is given")]
    pub facility_count: Option<usize>,

    /// Number of historical violations in the generated baseline
    #[arg(long, help = "Number of historical violations to generate")]
    pub historical_violations: Option<usize>,

    /// Simulated read latency in milliseconds
    #[arg(long, help = "Simulated latency for service reads, in milliseconds")]
    pub simulated_latency_ms: Option<u64>,

    /// Output format for snapshots
    #[arg(long, help = "Output format (json or text)")]
    pub output_format: Option<String>,

    /// Random seed for reproducible results
    #[arg(long, help = "Random seed for reproducible results")]
    pub seed: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, help = "Enable debug logging")]
    pub debug: bool,

    /// Dry run mode - validate configuration without running
    #[arg(long, help = "Validate configuration without running the monitor")]
    pub dry_run: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in JSON format and exit")]
    pub print_config: bool,
}

/// Configuration file structure (allows partial configuration)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    /// Period between scheduled ticks in milliseconds
    pub tick_interval_ms: Option<u64>,
    /// Lower bound of the start-time load factor
    pub initial_load_min: Option<f64>,
    /// Upper bound of the start-time load factor
    pub initial_load_max: Option<f64>,
    /// Number of points in each projected history series
    pub history_points: Option<usize>,
    /// Minutes between history points
    pub history_step_minutes: Option<i64>,
    /// Simulated read latency in milliseconds
    pub simulated_latency_ms: Option<u64>,
    /// Number of facilities in the generated baseline
    pub facility_count: Option<usize>,
    /// Number of historical violations in the generated baseline
    pub historical_violations: Option<usize>,
    /// Random seed for reproducible results
    pub seed: Option<u64>,
    /// Seed data file path
    pub seed_data: Option<String>,
    /// Scenario used by the command line run
    pub scenario: Option<String>,
    /// Ticks driven by the command line run
    pub ticks: Option<usize>,
    /// Output format for snapshots
    pub output_format: Option<String>,
}

/// Configuration for the compliance monitor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Period between scheduled ticks in milliseconds
    pub tick_interval_ms: u64,

    /// Lower bound of the start-time load factor
    pub initial_load_min: f64,

    /// Upper bound of the start-time load factor
    pub initial_load_max: f64,

    /// Number of points in each projected history series
    pub history_points: usize,

    /// Minutes between history points
    pub history_step_minutes: i64,

    /// Simulated read latency in milliseconds (applied outside the state lock)
    pub simulated_latency_ms: u64,

    /// Number of facilities in the generated baseline
    pub facility_count: usize,

    /// Number of historical violations in the generated baseline
    pub historical_violations: usize,

    /// Random seed for reproducible results
    pub seed: Option<u64>,

    /// Seed data file path; when absent a baseline is generated
    pub seed_data: Option<String>,

    /// Scenario used by the command line run
    pub scenario: String,

    /// Ticks driven by the command line run
    pub ticks: usize,

    /// Output format for snapshots
    pub output_format: String,
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Configuration file read error
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Unsupported configuration file format
    #[error("Unsupported configuration file format: {0} (supported: .json)")]
    UnsupportedFormat(String),
}

/// Validation errors for monitor configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    /// Tick interval is zero
    #[error("Tick interval must be greater than 0 ms, got {0}")]
    InvalidTickInterval(u64),

    /// Load factor range is invalid
    #[error("Invalid initial load range: min ({0}) must be > 0 and <= max ({1})")]
    InvalidLoadRange(f64, f64),

    /// History length is zero
    #[error("History must contain at least one point, got {0}")]
    InvalidHistoryPoints(usize),

    /// History spacing is not positive
    #[error("History step must be a positive number of minutes, got {0}")]
    InvalidHistoryStep(i64),

    /// Facility count is zero
    #[error("Facility count must be greater than 0, got {0}")]
    InvalidFacilityCount(usize),

    /// Scenario name is not recognized
    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),

    /// Output format is not recognized
    #[error("Invalid output format: {0}")]
    InvalidOutputFormat(String),
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 10_000,
            initial_load_min: initial_load::MIN_FACTOR,
            initial_load_max: initial_load::MAX_FACTOR,
            history_points: 25,
            history_step_minutes: 60,
            simulated_latency_ms: 50,
            facility_count: 8,
            historical_violations: 40,
            seed: None,
            seed_data: None,
            scenario: SimulationScenario::Standard.to_string(),
            ticks: 6,
            output_format: "json".to_string(),
        }
    }
}

impl MonitorConfig {
    /// Create configuration from parsed CLI arguments
    pub fn from_cli_args(args: CliArgs) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(config_path) = &args.config {
            config = Self::from_file(config_path)?;
        }

        // CLI takes precedence over the file
        Self::apply_cli_overrides(&mut config, args);

        Ok(config)
    }

    /// Load configuration from a JSON file, merging with defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                let content = fs::read_to_string(path)?;
                let config_file: ConfigFile = serde_json::from_str(&content)?;
                Ok(Self::from_config_file(config_file))
            }
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::UnsupportedFormat("no extension".to_string())),
        }
    }

    fn from_config_file(file: ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            tick_interval_ms: file.tick_interval_ms.unwrap_or(defaults.tick_interval_ms),
            initial_load_min: file.initial_load_min.unwrap_or(defaults.initial_load_min),
            initial_load_max: file.initial_load_max.unwrap_or(defaults.initial_load_max),
            history_points: file.history_points.unwrap_or(defaults.history_points),
            history_step_minutes: file
                .history_step_minutes
                .unwrap_or(defaults.history_step_minutes),
            simulated_latency_ms: file
                .simulated_latency_ms
                .unwrap_or(defaults.simulated_latency_ms),
            facility_count: file.facility_count.unwrap_or(defaults.facility_count),
            historical_violations: file
                .historical_violations
                .unwrap_or(defaults.historical_violations),
            seed: file.seed.or(defaults.seed),
            seed_data: file.seed_data.or(defaults.seed_data),
            scenario: file.scenario.unwrap_or(defaults.scenario),
            ticks: file.ticks.unwrap_or(defaults.ticks),
            output_format: file.output_format.unwrap_or(defaults.output_format),
        }
    }

    fn apply_cli_overrides(config: &mut Self, args: CliArgs) {
        if let Some(value) = args.seed_data {
            config.seed_data = Some(value);
        }
        if let Some(value) = args.tick_interval_ms {
            config.tick_interval_ms = value;
        }
        if let Some(value) = args.ticks {
            config.ticks = value;
        }
        if let Some(value) = args.scenario {
            config.scenario = value;
        }
        if let Some(value) = args.facility_count {
            config.facility_count = value;
        }
        if let Some(value) = args.historical_violations {
            config.historical_violations = value;
        }
        if let Some(value) = args.simulated_latency_ms {
            config.simulated_latency_ms = value;
        }
        if let Some(value) = args.output_format {
            config.output_format = value;
        }
        if let Some(value) = args.seed {
            config.seed = Some(value);
        }
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Print configuration as JSON
    pub fn print_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigValidationError::InvalidTickInterval(self.tick_interval_ms));
        }

        if !(self.initial_load_min > 0.0 && self.initial_load_min <= self.initial_load_max) {
            return Err(ConfigValidationError::InvalidLoadRange(
                self.initial_load_min,
                self.initial_load_max,
            ));
        }

        if self.history_points == 0 {
            return Err(ConfigValidationError::InvalidHistoryPoints(self.history_points));
        }

        if self.history_step_minutes <= 0 {
            return Err(ConfigValidationError::InvalidHistoryStep(self.history_step_minutes));
        }

        if self.facility_count == 0 {
            return Err(ConfigValidationError::InvalidFacilityCount(self.facility_count));
        }

        self.get_scenario().map_err(ConfigValidationError::InvalidScenario)?;
        self.get_output_format().map_err(ConfigValidationError::InvalidOutputFormat)?;

        Ok(())
    }

    /// Scheduler period as a std duration
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Simulated read latency as a std duration
    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }

    /// Start-time load factor range as a tuple
    pub fn initial_load_range(&self) -> (f64, f64) {
        (self.initial_load_min, self.initial_load_max)
    }

    /// Parse the configured scenario
    pub fn get_scenario(&self) -> Result<SimulationScenario, String> {
        self.scenario.parse()
    }

    /// Parse the configured output format
    pub fn get_output_format(&self) -> Result<OutputFormat, String> {
        self.output_format.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_args() -> CliArgs {
        CliArgs::try_parse_from(["test"]).unwrap()
    }

    #[test]
    fn test_monitor_config_default() {
        let config = MonitorConfig::default();

        assert_eq!(config.tick_interval_ms, 10_000);
        assert_eq!(config.initial_load_min, 0.9);
        assert_eq!(config.initial_load_max, 1.2);
        assert_eq!(config.history_points, 25);
        assert_eq!(config.history_step_minutes, 60);
        assert_eq!(config.simulated_latency_ms, 50);
        assert_eq!(config.scenario, "standard");
        assert!(config.seed.is_none());
        assert!(config.seed_data.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_parsing() {
        let args = CliArgs::try_parse_from([
            "test",
            "--ticks",
            "12",
            "--scenario",
            "rush_hour",
            "--tick-interval-ms",
            "250",
            "--seed",
            "42",
        ])
        .unwrap();

        let config = MonitorConfig::from_cli_args(args).unwrap();
        assert_eq!(config.ticks, 12);
        assert_eq!(config.tick_interval_ms, 250);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.get_scenario().unwrap(), SimulationScenario::RushHour);
        // Untouched fields keep defaults
        assert_eq!(config.history_points, 25);
    }

    #[test]
    fn test_config_file_loading() {
        use std::io::Write;
        use tempfile::Builder;

        let mut temp_file = Builder::new().suffix(".json").tempfile().unwrap();
        let config_json = r#"{
            "tick_interval_ms": 500,
            "initial_load_min": 0.8,
            "history_points": 12,
            "scenario": "event_surge",
            "seed": 99
        }"#;
        temp_file.write_all(config_json.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = MonitorConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.tick_interval_ms, 500);
        assert_eq!(config.initial_load_min, 0.8);
        assert_eq!(config.initial_load_max, 1.2);
        assert_eq!(config.history_points, 12);
        assert_eq!(config.seed, Some(99));
        assert_eq!(config.get_scenario().unwrap(), SimulationScenario::EventSurge);
    }

    #[test]
    fn test_config_file_errors() {
        assert!(matches!(
            MonitorConfig::from_file("/definitely/missing/monitor.json"),
            Err(ConfigError::FileNotFound(_))
        ));

        let temp_file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        assert!(matches!(
            MonitorConfig::from_file(temp_file.path()),
            Err(ConfigError::UnsupportedFormat(ext)) if ext == "yaml"
        ));
    }

    #[test]
    fn test_cli_overrides_file() {
        use std::io::Write;

        let mut temp_file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        temp_file.write_all(br#"{ "ticks": 3, "seed": 1 }"#).unwrap();
        temp_file.flush().unwrap();

        let mut args = empty_args();
        args.config = Some(temp_file.path().display().to_string());
        args.seed = Some(2);

        let config = MonitorConfig::from_cli_args(args).unwrap();
        assert_eq!(config.ticks, 3);
        assert_eq!(config.seed, Some(2));
    }

    #[test]
    fn test_validation_errors() {
        let mut config = MonitorConfig::default();
        config.tick_interval_ms = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidTickInterval(0))
        ));

        let mut config = MonitorConfig::default();
        config.initial_load_min = 1.3;
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidLoadRange(_, _))
        ));

        let mut config = MonitorConfig::default();
        config.history_points = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidHistoryPoints(0))
        ));

        let mut config = MonitorConfig::default();
        config.history_step_minutes = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidHistoryStep(0))
        ));

        let mut config = MonitorConfig::default();
        config.facility_count = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidFacilityCount(0))
        ));

        let mut config = MonitorConfig::default();
        config.scenario = "hurricane".to_string();
        assert!(matches!(config.validate(), Err(ConfigValidationError::InvalidScenario(_))));

        let mut config = MonitorConfig::default();
        config.output_format = "xml".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidOutputFormat(_))
        ));
    }

    #[test]
    fn test_print_json_round_trip() {
        let config = MonitorConfig::default();
        let json = config.print_json().unwrap();
        let parsed: MonitorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.tick_interval_ms, config.tick_interval_ms);
        assert_eq!(parsed.scenario, config.scenario);
    }

    #[test]
    fn test_duration_helpers() {
        let config = MonitorConfig::default();
        assert_eq!(config.tick_interval(), Duration::from_secs(10));
        assert_eq!(config.simulated_latency(), Duration::from_millis(50));
        assert_eq!(config.initial_load_range(), (0.9, 1.2));
    }
}
