//! Configuration and CLI argument handling

use std::path::PathBuf;

use clap::Parser;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "interval-chime")]
#[command(about = "A repeating countdown timer that rings an alarm every interval")]
#[command(version)]
pub struct Config {
    /// Port to bind the control server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Settings file holding the duration and alarm sound
    #[arg(short, long, default_value = "timer_settings.json")]
    pub settings: PathBuf,

    /// Interval length as S, M:S or H:M:S (saved to the settings file)
    #[arg(short, long)]
    pub duration: Option<String>,

    /// Alarm sound file (saved to the settings file)
    #[arg(long)]
    pub sound: Option<PathBuf>,

    /// Start counting down right away
    #[arg(long)]
    pub start: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
