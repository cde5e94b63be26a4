use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("could not discover sets from {url}: {source}")]
    Discovery {
        url: String,
        #[source]
        source: FetchError,
    },
    #[error("crawl of set \"{set}\" stopped at {url}: {source}")]
    Crawl {
        set: String,
        url: String,
        #[source]
        source: FetchError,
    },
    #[error("could not retrieve card page {url}: {source}")]
    Extract {
        url: String,
        #[source]
        source: FetchError,
    },
    #[error("could not write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("prompt failed: {0}")]
    Prompt(#[from] inquire::InquireError),
    #[error("invalid url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl Error {
    pub(crate) fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Write {
            path: path.into(),
            source,
        }
    }
}
