// CLI module for appointment-parser
// Author: kelexine (https://github.com/kelexine)

use clap::Parser;
use std::path::PathBuf;

/// appointment-parser - extract appointment details from text and images with Gemini
#[derive(Parser, Debug)]
#[command(name = "appointment-parser", version, about, long_about = None)]
pub struct Args {
    /// Path to a TOML config file (default: ~/.appointment-parser/config.toml)
    #[arg(short, long, env = "APPOINTMENT_PARSER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the listen address
    #[arg(long)]
    pub host: Option<String>,

    /// Override the listen port
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl Args {
    /// Apply CLI overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut crate::config::AppConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}
