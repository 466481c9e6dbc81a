use thiserror::Error;

#[derive(Error, Debug)]
pub enum HostsError {
    #[error("error fetching {url}: {source}")]
    ApiError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("error fetching {url}: unexpected status {status}")]
    HttpStatusError {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("did not find any hosts")]
    NoHostsFoundError,

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<HostsError>,
    },
}

impl HostsError {
    /// Wraps the error with the stage or source it came from.
    pub fn context(self, context: impl Into<String>) -> Self {
        HostsError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with every layer of context stripped.
    pub fn root_cause(&self) -> &HostsError {
        match self {
            HostsError::Context { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.root_cause() {
            HostsError::ApiError { .. } | HostsError::HttpStatusError { .. } => {
                "Check the source URL and network connectivity, or remove the source from the list"
            }
            HostsError::NoHostsFoundError => {
                "The source returned no '0.0.0.0 <host>' lines; its format may have changed"
            }
            HostsError::SerializationError(_) => {
                "The blocklist endpoint returned malformed JSON; retry later"
            }
            HostsError::IoError(_) => "Check that the input files exist and the output path is writable",
            HostsError::ConfigError { .. } | HostsError::InvalidConfigValueError { .. } => {
                "Fix the configuration value and run again"
            }
            HostsError::Context { .. } => "",
        }
    }
}

pub type Result<T> = std::result::Result<T, HostsError>;
