use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Failed to read client secret {path}: {source}")]
    ClientSecret {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Interactive authorization failed: {0}")]
    Flow(String),

    #[error("Token refresh failed: {0}")]
    Refresh(String),

    #[error("Failed to write token file {path}: {source}")]
    Persist {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request to contacts API failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Failed to fetch contacts: {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Malformed contacts response: {0}")]
    Decode(#[source] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

pub type Result<T> = std::result::Result<T, Error>;
