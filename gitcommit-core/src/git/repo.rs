//! Working-tree detection

use std::path::{Path, PathBuf};

use git2::Repository;

use crate::{Error, Result};

/// A validated, non-bare git working tree
pub struct WorkingTree {
    /// The underlying git2 repository
    repo: Repository,
    /// Path to the working tree root
    root: PathBuf,
}

impl std::fmt::Debug for WorkingTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkingTree")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl WorkingTree {
    /// Open the working tree containing `path`
    ///
    /// Searches upward from `path`, like git itself does when run there.
    /// Bare repositories are rejected because every step needs a checkout.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.is_dir() {
            return Err(Error::NotARepository(format!(
                "{} does not exist or is not a directory",
                path.display()
            )));
        }

        let repo = Repository::discover(path).map_err(|e| {
            if e.code() == git2::ErrorCode::NotFound {
                Error::NotARepository(format!(
                    "{}. Run 'git init' first or point at a cloned repository.",
                    path.display()
                ))
            } else {
                Error::NotARepository(format!("{}: {}", path.display(), e.message()))
            }
        })?;

        let root = repo
            .workdir()
            .ok_or_else(|| {
                Error::NotARepository(format!(
                    "{} is a bare repository",
                    path.display()
                ))
            })?
            .to_path_buf();

        Ok(Self { repo, root })
    }

    /// Get the working tree root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check if the given path is inside a git working tree
    pub fn is_working_tree(path: impl AsRef<Path>) -> bool {
        Self::open(path).is_ok()
    }

    /// Name of the checked-out branch, or `None` for a detached HEAD.
    ///
    /// An unborn branch (fresh repository without commits) is still reported
    /// by name.
    pub fn current_branch(&self) -> Option<String> {
        match self.repo.head() {
            Ok(head) if head.is_branch() => head.shorthand().map(str::to_string),
            Ok(_) => None,
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => self
                .repo
                .find_reference("HEAD")
                .ok()
                .and_then(|r| r.symbolic_target().map(str::to_string))
                .map(|target| target.trim_start_matches("refs/heads/").to_string()),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_missing_path() {
        let err = WorkingTree::open("/nonexistent/path/12345").unwrap_err();
        assert!(matches!(err, Error::NotARepository(_)));
    }

    #[test]
    fn test_open_plain_directory() {
        let temp = TempDir::new().unwrap();
        // A ceiling-less discover could find an enclosing repo; only assert
        // when the temp dir is genuinely outside any repository.
        if Repository::discover(temp.path()).is_err() {
            assert!(!WorkingTree::is_working_tree(temp.path()));
        }
    }

    #[test]
    fn test_open_fresh_repository() {
        let temp = TempDir::new().unwrap();
        let repo = Repository::init(temp.path()).unwrap();
        repo.set_head("refs/heads/trunk").unwrap();

        let tree = WorkingTree::open(temp.path()).unwrap();
        assert_eq!(
            tree.root().canonicalize().unwrap(),
            temp.path().canonicalize().unwrap()
        );
        assert_eq!(tree.current_branch().as_deref(), Some("trunk"));
    }

    #[test]
    fn test_open_from_subdirectory_finds_root() {
        let temp = TempDir::new().unwrap();
        Repository::init(temp.path()).unwrap();
        let nested = temp.path().join("src").join("deep");
        std::fs::create_dir_all(&nested).unwrap();

        let tree = WorkingTree::open(&nested).unwrap();
        assert_eq!(
            tree.root().canonicalize().unwrap(),
            temp.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_open_bare_repository() {
        let temp = TempDir::new().unwrap();
        Repository::init_bare(temp.path()).unwrap();

        let err = WorkingTree::open(temp.path()).unwrap_err();
        assert!(matches!(err, Error::NotARepository(msg) if msg.contains("bare")));
    }
}
