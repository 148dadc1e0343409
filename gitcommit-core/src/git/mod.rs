//! Git operations for gitcommit
//!
//! This module provides working-tree validation and the four ordered steps:
//! checkout, stage, commit and push.

mod classify;
mod engine;
mod predicates;
mod repo;

pub use classify::{classify_commit, classify_push, StepStatus};
pub use engine::{RepositoryEngine, StepOutcome, DEFAULT_GIT, DEFAULT_REMOTE};
pub use predicates::{
    branch_listing_contains, indicates_clean_tree, indicates_remote_current, CLEAN_TREE_MARKER,
    REMOTE_CURRENT_MARKER,
};
pub use repo::WorkingTree;
