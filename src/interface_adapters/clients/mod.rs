// HTTP clients for the game server.

pub mod inventory;
pub mod movement;

use std::fmt;
use url::Url;

#[derive(Debug)]
pub enum ClientBuildError {
    InvalidBaseUrl(url::ParseError),
    Http(reqwest::Error),
}

impl fmt::Display for ClientBuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientBuildError::InvalidBaseUrl(err) => write!(f, "invalid api base url: {err}"),
            ClientBuildError::Http(err) => write!(f, "http client error: {err}"),
        }
    }
}

impl std::error::Error for ClientBuildError {}

impl From<url::ParseError> for ClientBuildError {
    fn from(err: url::ParseError) -> Self {
        ClientBuildError::InvalidBaseUrl(err)
    }
}

impl From<reqwest::Error> for ClientBuildError {
    fn from(err: reqwest::Error) -> Self {
        ClientBuildError::Http(err)
    }
}

/// Parses the API root and gives it a trailing slash so relative joins keep its path.
pub fn api_root(base_url: &str) -> Result<Url, url::ParseError> {
    let mut root = Url::parse(base_url)?;
    if !root.path().ends_with('/') {
        let path = format!("{}/", root.path());
        root.set_path(&path);
    }
    Ok(root)
}
