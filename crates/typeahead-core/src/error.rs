use thiserror::Error;

/// All errors that can occur in typeahead-core.
#[derive(Debug, Error)]
pub enum TypeaheadError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error from {0}: {1}")]
    Api(String, String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Exit codes used by the `typeahead` binary.
#[repr(i32)]
pub enum ExitCode {
    GeneralError = 1,
    InvalidArgs = 3,
    NetworkError = 6,
}

impl TypeaheadError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Http(_) | Self::Api(..) | Self::Parse(_) => ExitCode::NetworkError,
            Self::Config(_) | Self::TomlParse(_) => ExitCode::InvalidArgs,
            Self::Io(_) | Self::TomlSerialize(_) => ExitCode::GeneralError,
        }
    }
}

pub type Result<T> = std::result::Result<T, TypeaheadError>;
