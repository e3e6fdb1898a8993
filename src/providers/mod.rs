pub mod github;
pub mod prow;
