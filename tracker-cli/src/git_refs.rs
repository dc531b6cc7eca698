//! Which files under `.git` decide what `HEAD` resolves to. Shared with build.rs.

use std::path::{Path, PathBuf};

/// Paths whose change means a new commit SHA, given the contents of `HEAD`.
///
/// A detached `HEAD` holds the SHA itself. Otherwise the branch ref file moves
/// on each commit, and `packed-refs` holds the ref once git packs it.
pub fn head_watch_paths(git_dir: &Path, head: &str) -> Vec<PathBuf> {
    let mut paths = vec![git_dir.join("HEAD")];
    if let Some(reference) = head.trim().strip_prefix("ref:") {
        paths.push(git_dir.join(reference.trim()));
        paths.push(git_dir.join("packed-refs"));
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_head_watches_its_ref() {
        let git = Path::new("/repo/.git");
        let paths = head_watch_paths(git, "ref: refs/heads/main\n");
        assert_eq!(
            paths,
            vec![
                git.join("HEAD"),
                git.join("refs/heads/main"),
                git.join("packed-refs"),
            ]
        );
    }

    #[test]
    fn test_detached_head_watches_only_head() {
        let git = Path::new("/repo/.git");
        let paths = head_watch_paths(git, "3f2a9c1e5b7d0a4c6e8f1b3d5a7c9e0f2b4d6a8c\n");
        assert_eq!(paths, vec![git.join("HEAD")]);
    }
}
