//! Governance proposal workflow.
//!
//! One call to [`ProposalWorkflow::submit`] drives a proposal through its whole
//! session lifecycle: Created → Open → Approved → Executed.
//!
//! Key principle: ballots are strictly sequential. Each one is awaited, and
//! the proposal status read back, before the next voter acts, so the point at
//! which quorum was crossed and the voter responsible for any failure are
//! always known.

pub mod error;
pub mod proposal;
pub mod workflow;

pub use error::{GovernanceError, VoteError};
pub use proposal::Proposal;
pub use workflow::{submit_proposal, ProposalWorkflow};
