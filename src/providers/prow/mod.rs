mod client;
mod links;
mod namespace;

pub use client::ProwClient;
pub use links::{derive_job_ref, JobRef};
pub use namespace::extract_namespace;
