use crate::core::sources::EDGE_BLOCKLIST_URL;
use crate::core::ConfigProvider;
use crate::utils::error::{HostsError, Result};
use crate::utils::validation::{validate_path, validate_url, Validate};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub sources: SourcesConfig,
    pub output: OutputConfig,
    pub edge: EdgeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub list: String,
    pub extras: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            list: "sources.txt".to_string(),
            extras: "extras.txt".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "hosts.txt".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeConfig {
    pub endpoint: String,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            endpoint: EDGE_BLOCKLIST_URL.to_string(),
        }
    }
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Parses TOML after expanding `${VAR}` references from the environment.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| HostsError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Unset variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| HostsError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }
}

impl ConfigProvider for TomlConfig {
    fn sources_file(&self) -> &str {
        &self.sources.list
    }

    fn extras_file(&self) -> &str {
        &self.sources.extras
    }

    fn output_file(&self) -> &str {
        &self.output.path
    }

    fn edge_endpoint(&self) -> &str {
        &self.edge.endpoint
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_path("sources.list", &self.sources.list)?;
        validate_path("sources.extras", &self.sources.extras)?;
        validate_path("output.path", &self.output.path)?;
        validate_url("edge.endpoint", &self.edge.endpoint)?;
        Ok(())
    }
}
