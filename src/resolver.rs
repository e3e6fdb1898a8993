use chrono::Utc;
use log::{debug, info};
use url::Url;

use crate::error::{ProwLinkError, Result};
use crate::output::StageProgress;
use crate::providers::github::{extract_check_links, select_e2e_link, PageSource};
use crate::providers::prow::{derive_job_ref, extract_namespace, ProwClient};
use crate::resolution::ClusterResolution;

/// Traces a pull request or an e2e check link down to the namespace of the
/// test cluster its e2e job ran against.
pub struct ClusterResolver<P> {
    pages: P,
    prow: ProwClient,
    container: String,
}

impl<P: PageSource> ClusterResolver<P> {
    /// Creates a resolver.
    ///
    /// # Arguments
    ///
    /// * `pages` - Renders pull request pages
    /// * `prow` - Client for the Prow log viewer
    /// * `container` - Container whose log announces the namespace
    pub fn new(pages: P, prow: ProwClient, container: String) -> Self {
        Self {
            pages,
            prow,
            container,
        }
    }

    /// Resolves `url`, rendering it first when it is a pull request page.
    pub async fn resolve(&self, url: &str) -> Result<ClusterResolution> {
        if is_pull_request_url(url, self.prow.base_url()) {
            self.resolve_pull_request(url).await
        } else {
            self.resolve_e2e_link(url).await
        }
    }

    /// Renders a pull request, picks its e2e check, and reads the namespace
    /// from that job's log.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The page cannot be rendered or is empty
    /// - The page has no status checks, or none of them is an e2e job
    /// - The e2e link does not name a Prow job run
    /// - The job log has no namespace line
    pub async fn resolve_pull_request(&self, url: &str) -> Result<ClusterResolution> {
        info!("Resolving pull request: {url}");
        StageProgress::header();

        let stage = StageProgress::start("Rendering pull request");
        let html = self.pages.rendered_html(url).await?;
        if html.trim().is_empty() {
            return Err(ProwLinkError::EmptyPage {
                url: url.to_string(),
            });
        }
        stage.finish(format!("{} bytes", html.len()));

        let stage = StageProgress::start("Finding e2e check");
        let checks = extract_check_links(&html);
        if checks.is_empty() {
            return Err(ProwLinkError::NoCheckLinks {
                url: url.to_string(),
            });
        }
        debug!("Found {} status checks: {checks:?}", checks.len());

        let e2e_link = select_e2e_link(&checks).ok_or_else(|| ProwLinkError::NoE2eCheck {
            url: url.to_string(),
            checks: checks.len(),
        })?;
        stage.finish(e2e_link);

        self.trace(url, e2e_link).await
    }

    /// Reads the namespace from the log of the job run `e2e_link` points at,
    /// without touching the browser.
    pub async fn resolve_e2e_link(&self, e2e_link: &str) -> Result<ClusterResolution> {
        info!("Resolving e2e link: {e2e_link}");
        StageProgress::header();

        self.trace(e2e_link, e2e_link).await
    }

    async fn trace(&self, source_url: &str, e2e_link: &str) -> Result<ClusterResolution> {
        let job = derive_job_ref(e2e_link, &self.container)?;
        let log_url = self.prow.log_url(&job);
        debug!("Derived job {job:?}");

        let stage = StageProgress::start("Fetching Prow log");
        let log = self.prow.fetch_log(&job).await?;
        stage.finish(format!("{} bytes", log.len()));

        let stage = StageProgress::start("Extracting namespace");
        let namespace = extract_namespace(&log)
            .ok_or_else(|| ProwLinkError::NamespaceNotFound {
                log_url: log_url.clone(),
            })?
            .to_string();
        stage.finish(&namespace);

        info!("Resolved namespace {namespace} from {log_url}");

        Ok(ClusterResolution {
            source_url: source_url.to_string(),
            e2e_link: e2e_link.to_string(),
            job,
            log_url,
            namespace,
            resolved_at: Utc::now(),
        })
    }
}

/// Whether `url` is a source-control pull request page rather than a link
/// into Prow.
///
/// Pull request pages end in `.../pull/<number>`; Prow view links also
/// contain a `pull` segment, but it is followed by `<org>_<repo>`.
fn is_pull_request_url(url: &str, prow_base_url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };

    if let Ok(prow) = Url::parse(prow_base_url) {
        if parsed.host_str().is_some() && parsed.host_str() == prow.host_str() {
            return false;
        }
    }

    let Some(segments) = parsed.path_segments() else {
        return false;
    };
    let segments: Vec<&str> = segments.collect();

    segments.windows(2).any(|pair| {
        pair[0] == "pull" && !pair[1].is_empty() && pair[1].chars().all(|c| c.is_ascii_digit())
    })
}
