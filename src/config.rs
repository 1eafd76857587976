use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: Paths,
    #[serde(default)]
    pub scan: Scan,
    #[serde(default = "default_areas")]
    pub areas: Vec<AreaConfig>,
    #[serde(default)]
    pub markers: Markers,
    #[serde(default)]
    pub output: Output,
    #[serde(default)]
    pub logging: Logging,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        Ok(cfg)
    }

    pub fn area(&self, name: &str) -> Option<&AreaConfig> {
        self.areas.iter().find(|a| a.name.eq_ignore_ascii_case(name))
    }

    pub fn area_names(&self) -> Vec<&str> {
        self.areas.iter().map(|a| a.name.as_str()).collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: Default::default(),
            scan: Default::default(),
            areas: default_areas(),
            markers: Default::default(),
            output: Default::default(),
            logging: Default::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paths {
    /// Root holding one folder per day.
    pub log_root: String,
}
impl Default for Paths {
    fn default() -> Self {
        Self {
            log_root: "D:/Data/logs/fixlink".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scan {
    pub region: String,
    pub window_minutes: u32,
}
impl Default for Scan {
    fn default() -> Self {
        Self {
            region: "AUD".into(),
            window_minutes: 3,
        }
    }
}

/// One log category. Templates accept `{root}`, `{date}`, `{area}` and `{region}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaConfig {
    pub name: String,
    #[serde(default = "default_area_dir")]
    pub dir: String,
    /// EarlyRun filenames, tried in order.
    #[serde(default = "default_early_run")]
    pub early_run: Vec<String>,
    /// FinalRun filenames, tried in order.
    #[serde(default = "default_final_run")]
    pub final_run: Vec<String>,
}

impl AreaConfig {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.into(),
            dir: default_area_dir(),
            early_run: default_early_run(),
            final_run: default_final_run(),
        }
    }
}

fn default_areas() -> Vec<AreaConfig> {
    vec![AreaConfig::named("Index"), AreaConfig::named("SingleName")]
}

fn default_area_dir() -> String {
    "{root}/{date}/ICEDIRECT/{area}/{region}forUS".into()
}

fn default_early_run() -> Vec<String> {
    vec![
        "PriceGeneration_{region}forUS_EarlyRun.log".into(),
        "PriceGeneration_EURforUS_EarlyRun.log".into(),
    ]
}

fn default_final_run() -> Vec<String> {
    vec!["PriceGeneration_{region}forUS_FinalRun.log".into()]
}

/// Regular expressions recognised in log blocks. All are matched case-insensitively
/// except `timestamp`, which must capture `hour`, `minute` and `second`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Markers {
    pub timestamp: String,
    /// First line of a run. An open block is cut here even without an end
    /// marker. Empty disables the cut.
    #[serde(default = "default_start_marker")]
    pub start: String,
    pub end: String,
    pub ended_successfully: String,
    pub ended_with_error: String,
    pub good_files: String,
    pub bad_files: String,
    pub total_submitted: String,
    pub total_validated: String,
    pub full_completion: String,
    pub error: String,
    pub skip: String,
}
impl Default for Markers {
    fn default() -> Self {
        Self {
            timestamp: r"^\[?\d{4}[/-]\d{2}[/-]\d{2}[ T]+(?P<hour>\d{2}):(?P<minute>\d{2}):(?P<second>\d{2})\b"
                .into(),
            start: default_start_marker(),
            end: r"Program is ending".into(),
            ended_successfully: r"Program is ending successfully".into(),
            ended_with_error: r"Program is ending with error".into(),
            good_files: r"GoodFiles[\\/].*?\.xml".into(),
            bad_files: r"BadFiles[\\/].*?\.xml".into(),
            total_submitted: r"Total Prices to be submitted:\s*(\d+)".into(),
            total_validated: r"Total validated Prices submitted:\s*(\d+)".into(),
            full_completion: r"\(100%\)".into(),
            error: r"\bERROR\b".into(),
            skip: r"Skipping auto submission".into(),
        }
    }
}

fn default_start_marker() -> String {
    r"\b(?:Program|PriceGeneration)\s+(?:is\s+)?starting\b".into()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Output {
    pub verbose: bool,
    pub json: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            json: false,
            write_to_file: false,
            file_path: "slot-status.log".into(),
        }
    }
}
