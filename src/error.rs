use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProwLinkError {
    #[error("Pull request page was empty: {url}")]
    EmptyPage { url: String },

    #[error(
        "No status checks rendered on {url} after {waited:?} (is the browser profile logged in?)"
    )]
    PageNotReady { url: String, waited: Duration },

    #[error("No status check links found on {url}")]
    NoCheckLinks { url: String },

    #[error("None of the {checks} status checks on {url} is an e2e job")]
    NoE2eCheck { url: String, checks: usize },

    #[error("Cannot derive a Prow job from e2e link: {0}")]
    MalformedE2eLink(String),

    #[error("No 'Using namespace' line in log: {log_url}")]
    NamespaceNotFound { log_url: String },

    #[error("Browser automation failed: {0}")]
    Browser(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ProwLinkError>;
