use serde::{Deserialize, Serialize};

use crate::error::{ProwLinkError, Result};

/// Coordinates of a Prow job run's log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRef {
    /// Build identifier (e.g., "1785512874513272832")
    pub id: String,
    /// Prow job name (e.g., "pull-ci-openshift-origin-master-e2e-aws")
    pub job: String,
    /// Pod container whose log is fetched (e.g., "test")
    pub container: String,
}

/// Derives the job reference for an e2e check link.
///
/// The last path segment of the link is the build id and the one before it
/// is the job name, e.g.
/// `https://prow.ci.openshift.org/view/gs/origin-ci-test/pr-logs/pull/org_repo/42/<job>/<id>`.
/// The container is not encoded in the link, so the caller supplies it.
///
/// # Errors
///
/// Returns [`ProwLinkError::MalformedE2eLink`] when the link has fewer than
/// two segments or either of the last two is empty.
pub fn derive_job_ref(e2e_link: &str, container: &str) -> Result<JobRef> {
    let mut segments = e2e_link.rsplit('/');

    let (Some(id), Some(job)) = (segments.next(), segments.next()) else {
        return Err(ProwLinkError::MalformedE2eLink(e2e_link.to_string()));
    };

    if id.is_empty() || job.is_empty() {
        return Err(ProwLinkError::MalformedE2eLink(e2e_link.to_string()));
    }

    Ok(JobRef {
        id: id.to_string(),
        job: job.to_string(),
        container: container.to_string(),
    })
}

/// Builds the Prow log viewer URL for a job run.
///
/// # Arguments
///
/// * `base_url` - Prow deck base URL (e.g., <https://prow.ci.openshift.org>)
/// * `job_ref` - Job run to fetch the log of
///
/// # Returns
///
/// Log URL (e.g., <https://prow.ci.openshift.org/log?container=test&id=12345&job=my-job>)
pub fn log_url(base_url: &str, job_ref: &JobRef) -> String {
    format!(
        "{}/log?container={}&id={}&job={}",
        base_url.trim_end_matches('/'),
        job_ref.container,
        job_ref.id,
        job_ref.job
    )
}
