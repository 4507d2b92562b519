use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;

use crate::timeline::{TimelineOptions, DEFAULT_MIN_RENDER_WIDTH, DEFAULT_PIXEL_WIDTH};

#[derive(Parser, Debug)]
#[command(name = "teamline", about = "Team-assignment timeline for a person record")]
pub struct Cli {
    /// Person record (JSON, with `createdAt` and `history`)
    #[arg(long, env = "TEAMLINE_PERSON")]
    pub person: PathBuf,

    /// Organisation teams (JSON array, in dashboard order)
    #[arg(long, env = "TEAMLINE_TEAMS")]
    pub teams: PathBuf,

    /// Users and deleted users (JSON), used to name history authors
    #[arg(long, env = "TEAMLINE_USERS")]
    pub users: Option<PathBuf>,

    /// Include the medical-file history (healthcare professionals only)
    #[arg(long, env = "TEAMLINE_HEALTHCARE_PROFESSIONAL")]
    pub healthcare_professional: bool,

    /// Timeline width the layout is computed for
    #[arg(long)]
    pub pixel_width: Option<f64>,

    /// Intervals narrower than this are listed instead of drawn
    #[arg(long)]
    pub min_render_width: Option<f64>,

    /// Terminal rows per timeline lane
    #[arg(long)]
    pub lane_height: Option<u16>,

    /// Seconds between "now" refreshes
    #[arg(long)]
    pub tick_interval: Option<u64>,

    /// Directory history exports are written to
    #[arg(long, env = "TEAMLINE_EXPORT_DIR")]
    pub export_dir: Option<PathBuf>,

    /// Print intervals and layout as JSON instead of opening the viewer
    #[arg(long)]
    pub json: bool,

    /// Log file path
    #[arg(long, env = "TEAMLINE_LOG_FILE")]
    pub log_file: Option<String>,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct ConfigFile {
    pub pixel_width: Option<f64>,
    pub min_render_width: Option<f64>,
    pub lane_height: Option<u16>,
    pub tick_interval: Option<u64>,
    pub export_dir: Option<PathBuf>,
}

impl ConfigFile {
    pub fn load() -> Option<Self> {
        let config_dir = dirs::config_dir()?;
        let config_path = config_dir.join("teamline").join("config.toml");
        let content = std::fs::read_to_string(config_path).ok()?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Option<Self> {
        match toml::from_str(content) {
            Ok(file) => Some(file),
            Err(e) => {
                tracing::warn!("ignoring invalid config file: {}", e);
                None
            }
        }
    }
}

/// Effective settings: CLI flags, then the config file, then defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub timeline: TimelineOptions,
    pub lane_height: u16,
    pub tick_interval: Duration,
    pub export_dir: PathBuf,
    pub include_medical_file: bool,
}

pub const DEFAULT_LANE_HEIGHT: u16 = 2;
pub const DEFAULT_TICK_SECS: u64 = 60;

impl Settings {
    pub fn resolve(cli: &Cli, file: &ConfigFile) -> Self {
        let pixel_width = cli
            .pixel_width
            .or(file.pixel_width)
            .filter(|w| *w > 0.0)
            .unwrap_or(DEFAULT_PIXEL_WIDTH);
        let min_render_width = cli
            .min_render_width
            .or(file.min_render_width)
            .filter(|w| *w >= 0.0)
            .unwrap_or(DEFAULT_MIN_RENDER_WIDTH);

        Self {
            timeline: TimelineOptions {
                pixel_width,
                min_render_width,
            },
            lane_height: cli
                .lane_height
                .or(file.lane_height)
                .unwrap_or(DEFAULT_LANE_HEIGHT)
                .max(1),
            tick_interval: Duration::from_secs(
                cli.tick_interval
                    .or(file.tick_interval)
                    .unwrap_or(DEFAULT_TICK_SECS)
                    .max(1),
            ),
            export_dir: cli
                .export_dir
                .clone()
                .or_else(|| file.export_dir.clone())
                .unwrap_or_else(|| PathBuf::from(".")),
            include_medical_file: cli.healthcare_professional,
        }
    }
}
