use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::providers::prow::JobRef;

/// Outcome of tracing a pull request or e2e link down to its test cluster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterResolution {
    /// URL the resolution started from
    pub source_url: String,
    /// Status check link of the e2e job
    pub e2e_link: String,
    /// Prow job run the log was read from
    pub job: JobRef,
    /// Log viewer URL that was fetched
    pub log_url: String,
    /// Namespace announced in the job log
    pub namespace: String,
    pub resolved_at: DateTime<Utc>,
}
