use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Remoting connection failed: {message}")]
    Connection { message: String },

    #[error("Remoting protocol error: {message}")]
    Protocol { message: String },

    #[error("Remote API call '{method}' failed: {message}")]
    Api { method: String, message: String },

    #[error("Remote API call timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Workbook write failed: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid position step: {step} (must be in (0, 1])")]
    InvalidStep { step: f64 },
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for ExtractError {
    fn user_message(&self) -> String {
        match self {
            ExtractError::Connection { message } => {
                format!("Could not talk to the analysis application: {}", message)
            }
            ExtractError::Protocol { message } => {
                format!("Unexpected response from the analysis application: {}", message)
            }
            ExtractError::Api { method, message } => {
                format!("The analysis application rejected '{}': {}", method, message)
            }
            ExtractError::Timeout { seconds } => {
                format!("The analysis application did not answer within {} seconds", seconds)
            }
            ExtractError::Csv(e) => format!("Failed to write CSV output: {}", e),
            ExtractError::Workbook(e) => format!("Failed to write workbook output: {}", e),
            ExtractError::Config { message } => format!("Configuration error: {}", message),
            ExtractError::InvalidStep { step } => {
                format!("Position step {} is outside (0, 1]", step)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            ExtractError::Connection { .. } => Some(
                "Check that the analysis application is running with its remoting API enabled, \
                 and that --host/--port match its listener."
                    .to_string(),
            ),
            ExtractError::Protocol { .. } => Some(
                "The application version may not match this tool. Upgrade whichever is older."
                    .to_string(),
            ),
            ExtractError::Timeout { .. } => Some(
                "Large models can be slow to query. Increase the timeout with --timeout."
                    .to_string(),
            ),
            ExtractError::Io(_) | ExtractError::Csv(_) | ExtractError::Workbook(_) => Some(
                "Ensure the output directory exists and you have write permission to it."
                    .to_string(),
            ),
            ExtractError::Config { .. } => Some(
                "Check the configuration file syntax and that all values are in range.".to_string(),
            ),
            ExtractError::InvalidStep { .. } => Some(
                "Use a step such as 0.1 or 0.25; the sampler always includes ratio 1.0."
                    .to_string(),
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for ExtractError {
    fn from(error: toml::de::Error) -> Self {
        ExtractError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
