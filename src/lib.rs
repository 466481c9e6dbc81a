pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::cli::LocalStorage;
pub use config::toml_config::TomlConfig;
#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use core::{pipeline::HostsPipeline, updater::UpdateEngine};
pub use domain::model::DomainSet;
pub use utils::error::{HostsError, Result};
