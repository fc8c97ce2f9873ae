use std::path::PathBuf;

/// Errors from retrieving a page's HTML.
///
/// These are always recovered at the entry-processing boundary; a failed
/// fetch degrades one entry to "no image" and never aborts the batch.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("timed out fetching {url}")]
    Timeout { url: String },

    #[error("too many redirects starting from {url}")]
    TooManyRedirects { url: String },

    #[error("transport error for {url}: {source}")]
    Transport { url: String, source: reqwest::Error },
}

/// Errors from downloading an image to a local file.
///
/// On every failure path the destination file has already been removed by
/// the time the error is returned.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("timed out downloading {url}")]
    Timeout { url: String },

    #[error("too many redirects starting from {url}")]
    TooManyRedirects { url: String },

    #[error("transport error for {url}: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("I/O error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors reading or writing the portfolio dataset. Fatal for the run.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Top-level errors that abort a whole scraping run.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error("failed to create images directory {path}: {source}")]
    ImageDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
