//! Lazy depth-first walk yielding one decision per entry
//!
//! Built on `walkdir` with links not followed. Entries of a directory are
//! sorted by file name, which makes walkdir read the whole directory listing
//! before yielding any of it: files written next to their sources during a
//! run are never picked up by the same run.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::AegisResult;

use super::policy::{EntryKind, TraversalDecision, TraversalPolicy};

/// One visited entry and the policy's verdict on it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalEntry {
    pub path: PathBuf,
    pub depth: usize,
    pub decision: TraversalDecision,
}

/// Iterator over the decisions for a tree
///
/// Finite and not restartable. The first walk error is yielded as a fatal
/// [`crate::AegisError::Traversal`] and ends the iteration.
pub struct Traversal {
    inner: walkdir::IntoIter,
    policy: TraversalPolicy,
    finished: bool,
}

impl Traversal {
    /// Start walking `root`
    pub fn new(root: impl AsRef<Path>, policy: TraversalPolicy) -> Self {
        let inner = WalkDir::new(root.as_ref())
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        Self {
            inner,
            policy,
            finished: false,
        }
    }
}

impl Iterator for Traversal {
    type Item = AegisResult<TraversalEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let entry = match self.inner.next()? {
            Ok(entry) => entry,
            Err(err) => {
                self.finished = true;
                return Some(Err(err.into()));
            }
        };

        let depth = entry.depth();
        let decision = self.policy.decide(
            entry.file_name(),
            EntryKind::from(entry.file_type()),
            depth == 0,
        );

        if decision == TraversalDecision::SkipExcludedDir {
            self.inner.skip_current_dir();
        }

        tracing::trace!(path = %entry.path().display(), ?decision, "visited");

        Some(Ok(TraversalEntry {
            path: entry.into_path(),
            depth,
            decision,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AegisError;
    use crate::traversal::policy::{ExclusionSet, Mode};
    use std::fs;
    use tempfile::TempDir;

    fn decisions(root: &Path, mode: Mode) -> Vec<(PathBuf, TraversalDecision)> {
        Traversal::new(root, TraversalPolicy::new(mode, ExclusionSet::default()))
            .map(|e| {
                let e = e.unwrap();
                (e.path.strip_prefix(root).unwrap().to_path_buf(), e.decision)
            })
            .collect()
    }

    fn fixture() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("notes.txt"), "hello").unwrap();
        fs::write(root.join("done.aegis"), "sealed").unwrap();
        fs::create_dir_all(root.join("deep/nested/vendor/pkg")).unwrap();
        fs::write(root.join("deep/nested/vendor/pkg/lib.bin"), [0u8; 4]).unwrap();
        fs::write(root.join("deep/nested/keep.md"), "keep").unwrap();
        temp_dir
    }

    #[test]
    fn test_seal_walk() {
        let temp_dir = fixture();
        let found = decisions(temp_dir.path(), Mode::Seal);

        assert!(found.contains(&(PathBuf::from(""), TraversalDecision::Descend)));
        assert!(found.contains(&(PathBuf::from("notes.txt"), TraversalDecision::Include)));
        assert!(found.contains(&(
            PathBuf::from("done.aegis"),
            TraversalDecision::SkipAlreadySealed
        )));
        assert!(found.contains(&(
            PathBuf::from("deep/nested/keep.md"),
            TraversalDecision::Include
        )));
        assert!(found.contains(&(
            PathBuf::from("deep/nested/vendor"),
            TraversalDecision::SkipExcludedDir
        )));
    }

    #[test]
    fn test_excluded_dir_contents_never_visited() {
        let temp_dir = fixture();
        let found = decisions(temp_dir.path(), Mode::Seal);

        assert!(found
            .iter()
            .all(|(path, _)| !path.starts_with("deep/nested/vendor/pkg")));
    }

    #[test]
    fn test_unseal_walk() {
        let temp_dir = fixture();
        let found = decisions(temp_dir.path(), Mode::Unseal);

        assert!(found.contains(&(PathBuf::from("done.aegis"), TraversalDecision::Include)));
        assert!(found.contains(&(
            PathBuf::from("notes.txt"),
            TraversalDecision::SkipNotSealed
        )));
    }

    #[test]
    fn test_walk_order_is_by_name() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["c.txt", "a.txt", "b.txt"] {
            fs::write(temp_dir.path().join(name), name).unwrap();
        }

        let names: Vec<_> = decisions(temp_dir.path(), Mode::Seal)
            .into_iter()
            .filter(|(_, d)| *d == TraversalDecision::Include)
            .map(|(p, _)| p)
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("a.txt"),
                PathBuf::from("b.txt"),
                PathBuf::from("c.txt")
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_not_followed() {
        let temp_dir = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        fs::write(outside.path().join("secret.txt"), "x").unwrap();
        std::os::unix::fs::symlink(outside.path(), temp_dir.path().join("escape")).unwrap();
        std::os::unix::fs::symlink(
            outside.path().join("secret.txt"),
            temp_dir.path().join("link.txt"),
        )
        .unwrap();

        let found = decisions(temp_dir.path(), Mode::Seal);
        assert!(found.contains(&(PathBuf::from("escape"), TraversalDecision::SkipSymlink)));
        assert!(found.contains(&(PathBuf::from("link.txt"), TraversalDecision::SkipSymlink)));
        // Nothing below the linked directory is visited
        assert!(found
            .iter()
            .all(|(p, _)| !(p.starts_with("escape") && p != Path::new("escape"))));
        assert!(!found.iter().any(|(p, _)| p == Path::new("escape/secret.txt")));
    }

    #[test]
    fn test_missing_root_is_fatal_and_ends_walk() {
        let temp_dir = TempDir::new().unwrap();
        let mut walk = Traversal::new(
            temp_dir.path().join("missing"),
            TraversalPolicy::new(Mode::Seal, ExclusionSet::default()),
        );

        let first = walk.next().unwrap();
        assert!(matches!(first, Err(AegisError::Traversal { .. })));
        assert!(walk.next().is_none());
    }

    #[test]
    fn test_single_file_root() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("only.txt");
        fs::write(&file, "x").unwrap();

        let entries: Vec<_> = Traversal::new(
            &file,
            TraversalPolicy::new(Mode::Seal, ExclusionSet::default()),
        )
        .collect::<Result<_, _>>()
        .unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].decision, TraversalDecision::Include);
    }
}
