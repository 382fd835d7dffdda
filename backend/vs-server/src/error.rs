use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Config error: {0}")]
    Config(#[from] vs_config::ConfigError),

    #[error("Failed to read seed file {path}: {source}")]
    SeedFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid seed data in {path}: {source}")]
    SeedData {
        path: String,
        #[source]
        source: vs_core::CoreError,
    },

    #[error("Streaming setup failed: {0}")]
    Stream(#[from] vs_stream::StreamError),

    #[error("Logger error: {message}")]
    Logger { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
