use thiserror::Error;

/// Failures that prevent a normal envelope from being produced.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid arguments: {0}")]
    Arguments(#[from] clap::Error),

    #[error("failed to serialize result: {0}")]
    Serialization(#[from] quotefetch_core::CoreError),

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Every uncaught failure exits with status 1.
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Arguments(_) | Self::Serialization(_) | Self::Io(_) => 1,
        }
    }
}
