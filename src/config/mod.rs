pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::sources::EDGE_BLOCKLIST_URL;
#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_path, validate_url, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "hosts-updater")]
#[command(about = "Builds a single blocking hosts file from several published lists")]
pub struct CliConfig {
    /// Directory the input and output files are resolved against
    #[arg(long, default_value = ".")]
    pub base_dir: String,

    /// Newline-separated list of source URLs
    #[arg(long, default_value = "sources.txt")]
    pub sources: String,

    /// Optional local list in hosts format
    #[arg(long, default_value = "extras.txt")]
    pub extras: String,

    #[arg(long, default_value = "hosts.txt")]
    pub output: String,

    #[arg(long, default_value = EDGE_BLOCKLIST_URL)]
    pub edge_endpoint: String,

    /// TOML file whose settings replace the file and endpoint flags
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn sources_file(&self) -> &str {
        &self.sources
    }

    fn extras_file(&self) -> &str {
        &self.extras
    }

    fn output_file(&self) -> &str {
        &self.output
    }

    fn edge_endpoint(&self) -> &str {
        &self.edge_endpoint
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("base_dir", &self.base_dir)?;
        validate_path("sources", &self.sources)?;
        validate_path("extras", &self.extras)?;
        validate_path("output", &self.output)?;
        validate_url("edge_endpoint", &self.edge_endpoint)?;
        Ok(())
    }
}
