//! Version-control metadata lookup.
//!
//! Only the working-tree root is needed: it anchors the docs directory path
//! used by edit-source links.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use spherexsphinx_shared::{Result, SpherexSphinxError};

/// Locates the version-control root enclosing a directory.
pub trait RepositoryLookup {
    /// Working-tree root of the repository containing `start`.
    fn repository_root(&self, start: &Path) -> Result<PathBuf>;
}

/// Finds the nearest ancestor holding a `.git` entry.
///
/// `.git` may be a directory or, for worktrees and submodules, a file.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitRepositoryLookup;

impl RepositoryLookup for GitRepositoryLookup {
    #[instrument(skip_all, fields(start = %start.display()))]
    fn repository_root(&self, start: &Path) -> Result<PathBuf> {
        let start = start
            .canonicalize()
            .map_err(|e| SpherexSphinxError::io(start, e))?;

        let root = start
            .ancestors()
            .find(|dir| dir.join(".git").exists())
            .ok_or_else(|| {
                SpherexSphinxError::configuration(format!(
                    "{} is not inside a git repository",
                    start.display()
                ))
            })?;

        debug!(root = %root.display(), "found repository root");
        Ok(root.to_path_buf())
    }
}

/// Express `dir` relative to `root` as a `/`-separated path.
///
/// Returns `""` when `dir` is the root itself. Fails when `dir` is not inside
/// `root`.
pub fn relative_doc_path(dir: &Path, root: &Path) -> Result<String> {
    let dir_abs = dir.canonicalize().map_err(|e| SpherexSphinxError::io(dir, e))?;
    let root_abs = root
        .canonicalize()
        .map_err(|e| SpherexSphinxError::io(root, e))?;

    let relative = dir_abs.strip_prefix(&root_abs).map_err(|_| {
        SpherexSphinxError::configuration(format!(
            "working directory {} is not inside repository root {}",
            dir_abs.display(),
            root_abs.display()
        ))
    })?;

    Ok(relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_enclosing_git_dir() {
        let repo = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir(repo.path().join(".git")).expect("mkdir .git");
        let docs = repo.path().join("docs").join("user-guide");
        std::fs::create_dir_all(&docs).expect("mkdir docs");

        let root = GitRepositoryLookup.repository_root(&docs).expect("root");
        assert_eq!(root, repo.path().canonicalize().expect("canonicalize"));
    }

    #[test]
    fn git_file_marks_a_worktree() {
        let repo = tempfile::tempdir().expect("tempdir");
        std::fs::write(repo.path().join(".git"), "gitdir: /elsewhere\n").expect("write");
        let root = GitRepositoryLookup.repository_root(repo.path()).expect("root");
        assert_eq!(root, repo.path().canonicalize().expect("canonicalize"));
    }

    #[test]
    fn relative_path_uses_forward_slashes() {
        let repo = tempfile::tempdir().expect("tempdir");
        let docs = repo.path().join("a").join("b");
        std::fs::create_dir_all(&docs).expect("mkdir");

        assert_eq!(relative_doc_path(&docs, repo.path()).expect("relative"), "a/b");
        assert_eq!(relative_doc_path(repo.path(), repo.path()).expect("relative"), "");
    }

    #[test]
    fn outside_root_is_an_error() {
        let repo = tempfile::tempdir().expect("tempdir");
        let other = tempfile::tempdir().expect("tempdir");
        let err = relative_doc_path(other.path(), repo.path()).unwrap_err();
        assert!(matches!(err, SpherexSphinxError::Configuration { .. }));
    }
}
