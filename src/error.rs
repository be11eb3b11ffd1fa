use thiserror::Error;

#[derive(Error, Debug)]
pub enum WidgetError {
    #[error("Template error: {0}")]
    Template(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl WidgetError {
    pub fn template<S: Into<String>>(msg: S) -> Self {
        Self::Template(msg.into())
    }

    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the message can be shown to the host without leaking paths or URLs.
    pub fn is_host_safe(&self) -> bool {
        match self {
            Self::Io(_) | Self::Network(_) | Self::InvalidUrl(_) => false,
            Self::Template(_) | Self::InvalidInput(_) | Self::Config(_) => true,
        }
    }

    pub fn to_safe_string(&self) -> String {
        if self.is_host_safe() {
            self.to_string()
        } else {
            match self {
                Self::Io(_) => "Template file could not be read".to_string(),
                Self::Network(_) => "Template request failed".to_string(),
                Self::InvalidUrl(_) => "Template URL is invalid".to_string(),
                _ => "Operation failed".to_string(),
            }
        }
    }
}

pub type WidgetResult<T> = Result<T, WidgetError>;
