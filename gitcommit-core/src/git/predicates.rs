//! Text predicates over git output
//!
//! Every string the engine matches against git's output lives here. They
//! assume git runs under the C locale (see [`crate::runner::FIXED_LOCALE_ENV`]).

/// Printed by `git commit` when the tree has nothing staged or modified
pub const CLEAN_TREE_MARKER: &str = "nothing to commit";

/// Printed by `git push` on stderr when the remote already has every commit
pub const REMOTE_CURRENT_MARKER: &str = "Everything up-to-date";

/// Whether `git branch --list` output mentions `branch`.
///
/// This is a raw substring test: `feature/x` also matches a listing that only
/// contains `feature/x-old`.
pub fn branch_listing_contains(listing: &str, branch: &str) -> bool {
    listing.contains(branch)
}

/// Whether `git commit` stdout reports a clean working tree
pub fn indicates_clean_tree(stdout: &str) -> bool {
    stdout.contains(CLEAN_TREE_MARKER)
}

/// Whether `git push` stderr reports that nothing needed to be sent
pub fn indicates_remote_current(stderr: &str) -> bool {
    stderr.contains(REMOTE_CURRENT_MARKER)
}
