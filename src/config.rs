// ⚙️ Configuration - flags with environment fallbacks

use anyhow::{Context, Result};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 8124;
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_DATA_PATH: &str = "data/rf_data.csv";

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "rf-server")]
#[command(about = "Interactive radiative forcing infographic")]
pub struct Config {
    /// Address to bind
    #[arg(long, env = "RF_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port for web server
    #[arg(short, long, env = "RF_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// CSV file with Source, Measure and Contribution columns
    #[arg(long = "data", env = "RF_DATA", default_value = DEFAULT_DATA_PATH)]
    pub data_path: PathBuf,

    /// Verbose logging and error detail in API responses
    #[arg(long, env = "RF_DEBUG", action = ArgAction::SetTrue, value_parser = BoolishValueParser::new())]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            debug: false,
        }
    }
}

impl Config {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .with_context(|| format!("Invalid bind address {}:{}", self.host, self.port))?
            .next()
            .with_context(|| format!("No address resolved for {}", self.host))
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}
