//! Fetching remote datasets over HTTP.

use std::io::Read;
use std::time::Duration;

use log::debug;
use thiserror::Error;

use crate::dataset::Dataset;
use crate::encoding::decode_text;
use crate::options::{Format, ReadOptions};
use crate::source::parse_text;

/// Default timeout for HTTP requests (30 seconds).
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur during HTTP fetching.
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("HTTP error {status}: {message}")]
    HttpStatus { status: u16, message: String },
    #[error("Network error: {0}")]
    Network(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ureq::Error> for HttpError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => HttpError::HttpStatus {
                status: code,
                message: format!("Server returned status {code}"),
            },
            _ => HttpError::Network(err.to_string()),
        }
    }
}

/// Fetch the full body of `url`.
pub fn fetch_url(url: &str) -> Result<Vec<u8>, HttpError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(HttpError::InvalidUrl(format!(
            "URL must start with http:// or https://: {url}"
        )));
    }

    let config = ureq::Agent::config_builder()
        .timeout_global(Some(DEFAULT_TIMEOUT))
        .build();
    let agent = ureq::Agent::new_with_config(config);

    let response = agent.get(url).call()?;
    let mut reader = response.into_body().into_reader();
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;

    debug!("fetched {} bytes from {url}", data.len());
    Ok(data)
}

/// Fetch `url` and parse it as `format` (`libsvm`, `csv` or `weka`).
///
/// The format tag is checked before any network access.
pub fn read_url(url: &str, format: &str, options: &ReadOptions) -> crate::Result<Dataset> {
    let format: Format = format.parse()?;
    let data = fetch_url(url)?;
    let text = decode_text(&data);
    parse_text(&text, format, options)
}
