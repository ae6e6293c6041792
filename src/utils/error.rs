use thiserror::Error;

/// 對外部服務（places / chat provider）發出請求時的失敗
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Provider returned status {status}")]
    Status { status: u16, body: String },

    #[error("Malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("Invalid input for {field}: '{value}' ({reason})")]
    Input {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl TrackerError {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// 給 CLI 使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            TrackerError::Fetch(FetchError::Transport(_)) => {
                "Could not reach the provider. Check your network connection.".to_string()
            }
            TrackerError::Fetch(FetchError::Status { status, .. }) => {
                format!("The provider rejected the request (HTTP {}).", status)
            }
            TrackerError::Fetch(FetchError::Malformed(_)) | TrackerError::Parse { .. } => {
                format!("Unexpected data: {}", self)
            }
            TrackerError::Input { field, .. } => format!("Please check the value of {}.", field),
            TrackerError::Config { message } => format!("Configuration problem: {}", message),
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
