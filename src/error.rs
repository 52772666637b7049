use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(code(picalendar::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(picalendar::config),
        help("check the files in the resources directory")
    )]
    Config(String),

    #[error("Google Calendar API error: {0}")]
    #[diagnostic(code(picalendar::google_calendar))]
    GoogleCalendar(String),

    #[error("Authorization error: {0}")]
    #[diagnostic(
        code(picalendar::auth),
        help("run get_calendar_token to authorize again")
    )]
    Auth(String),

    #[error("Display error: {0}")]
    #[diagnostic(code(picalendar::display))]
    Display(String),

    #[error(transparent)]
    #[diagnostic(code(picalendar::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(picalendar::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(picalendar::other))]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

// Layout overrides are part of the configuration, so a bad file is a config error
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(format!("Invalid layout overrides: {}", err))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::GoogleCalendar(err.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Display(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type AppResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Invalid environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create Google Calendar errors
pub fn google_calendar_error(message: &str) -> Error {
    Error::GoogleCalendar(message.to_string())
}

/// Helper to create authorization errors
pub fn auth_error(message: &str) -> Error {
    Error::Auth(message.to_string())
}

/// Helper to create display errors
pub fn display_error(message: &str) -> Error {
    Error::Display(message.to_string())
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}

