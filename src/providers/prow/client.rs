use log::{debug, warn};
use reqwest::Client;
use std::time::Duration;
use url::Url;

use crate::error::{ProwLinkError, Result};

use super::links::{log_url, JobRef};

/// Plain HTTP client for the Prow log viewer.
pub struct ProwClient {
    client: Client,
    base_url: String,
}

impl ProwClient {
    /// Creates a client for the Prow deck at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute URL or the HTTP
    /// client cannot be built.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        Url::parse(base_url)
            .map_err(|e| ProwLinkError::Config(format!("Invalid Prow base URL: {e}")))?;

        let mut builder =
            Client::builder().user_agent(concat!("prowlink/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ProwLinkError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Log viewer URL for `job_ref` on this Prow instance.
    pub fn log_url(&self, job_ref: &JobRef) -> String {
        log_url(&self.base_url, job_ref)
    }

    /// Fetches the raw log text of a job run.
    ///
    /// The body is returned whatever the response status; an error page
    /// simply won't contain a namespace line.
    pub async fn fetch_log(&self, job_ref: &JobRef) -> Result<String> {
        let url = self.log_url(job_ref);
        debug!("Fetching Prow log: {url}");

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Prow log request returned status {status}: {url}");
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn job_ref() -> JobRef {
        JobRef {
            id: "12345".to_string(),
            job: "my-job".to_string(),
            container: "test".to_string(),
        }
    }

    #[test]
    fn test_prow_client_rejects_relative_base_url() {
        let result = ProwClient::new("prow.ci.openshift.org", None);
        assert!(matches!(result, Err(ProwLinkError::Config(_))));
    }

    #[test]
    fn test_prow_client_log_url() {
        let client = ProwClient::new("https://prow.ci.openshift.org/", None).unwrap();
        assert_eq!(client.base_url(), "https://prow.ci.openshift.org");
        assert_eq!(
            client.log_url(&job_ref()),
            "https://prow.ci.openshift.org/log?container=test&id=12345&job=my-job"
        );
    }

    #[tokio::test]
    async fn test_fetch_log_returns_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/log")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("container".into(), "test".into()),
                Matcher::UrlEncoded("id".into(), "12345".into()),
                Matcher::UrlEncoded("job".into(), "my-job".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "text/plain")
            .with_body("line one\nUsing namespace ci-op-abc\n")
            .create_async()
            .await;

        let client = ProwClient::new(&server.url(), None).unwrap();
        let log = client.fetch_log(&job_ref()).await.unwrap();

        assert_eq!(log, "line one\nUsing namespace ci-op-abc\n");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_log_passes_error_body_through() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/log")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body("artifact not found")
            .create_async()
            .await;

        let client = ProwClient::new(&server.url(), None).unwrap();
        let log = client.fetch_log(&job_ref()).await.unwrap();

        assert_eq!(log, "artifact not found");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_log_network_error() {
        // Nothing listens on port 1.
        let client = ProwClient::new("http://127.0.0.1:1", None).unwrap();
        let result = client.fetch_log(&job_ref()).await;

        assert!(matches!(result, Err(ProwLinkError::Network(_))));
    }
}
