pub mod toml_config;

pub use toml_config::{ChatConfig, CycleConfig, FeedConfig, PlacesConfig, TrackerConfig};

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand, ValueEnum};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "period-tracker")]
#[command(about = "Cycle log, next-period estimate and nearby clinic lookup")]
pub struct CliConfig {
    /// TOML 設定檔路徑
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Estimate the next period from logged dates (YYYY-MM-DD)
    Estimate {
        dates: Vec<String>,
        #[arg(long)]
        offset_days: Option<u32>,
    },
    /// Print a month with logged days marked
    Calendar {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
        /// Logged entries as DATE=MOOD, e.g. 2025-03-01=:)
        #[arg(long = "entry", value_delimiter = ',')]
        entries: Vec<String>,
    },
    /// Fetch nearby hospitals and gynaecology clinics
    Clinics {
        #[arg(long)]
        lat: Option<f64>,
        #[arg(long)]
        lon: Option<f64>,
        #[arg(long)]
        radius_meters: Option<u32>,
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Ask the AI assistant a question
    Ask { question: Vec<String> },
    /// Show the common questions and answers
    Faq,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Csv,
}
