use std::fmt::{Display, Formatter};

/// Error type for loading and parsing engine options.
#[derive(Debug)]
pub enum OptionsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl Display for OptionsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io error: {}", err),
            Self::Parse(err) => write!(f, "invalid options json: {}", err),
        }
    }
}

impl std::error::Error for OptionsError {}

impl From<std::io::Error> for OptionsError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for OptionsError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}
