//! Core domain types shared by the webhook pipeline and the scheduled sweep.

pub mod ids;
pub mod pr;

pub use ids::{CheckRunId, DeliveryId, InstallationId, PrNumber, RepoId, Sha};
pub use pr::{
    CheckConclusion, CheckRunData, CheckRunOutput, CommitData, MergeMethod, PrState,
    PullRequestData, RepositoryRef, ReviewEvent,
};
