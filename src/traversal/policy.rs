//! Per-entry traversal decisions
//!
//! The policy is a pure function of an entry's name, kind and mode; it never
//! touches the filesystem, which keeps it testable on its own.

use std::collections::BTreeSet;
use std::ffi::{OsStr, OsString};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::storage::is_temp_file_name;

/// File name suffix that marks a sealed artifact
pub const ARTIFACT_SUFFIX: &str = ".aegis";

/// Directory names skipped by default (version control, dependency caches,
/// build output)
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &[".git", "vendor", "node_modules", "target"];

/// Direction of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Plain files become artifacts
    Seal,
    /// Artifacts become plain files
    Unseal,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Seal => write!(f, "seal"),
            Mode::Unseal => write!(f, "unseal"),
        }
    }
}

/// What the walk does with one entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalDecision {
    /// A directory to walk into
    Descend,
    /// A directory on the exclusion list; nothing below it is visited
    SkipExcludedDir,
    /// A symbolic link; never followed, never transformed
    SkipSymlink,
    /// A socket, FIFO or device node
    SkipSpecial,
    /// Seal mode: already bears the artifact suffix
    SkipAlreadySealed,
    /// Unseal mode: does not bear the artifact suffix
    SkipNotSealed,
    /// A temporary file left behind by an interrupted write
    SkipTempFile,
    /// A file to transform
    Include,
}

impl TraversalDecision {
    /// Whether the entry counts towards the skipped total
    pub fn is_skip(&self) -> bool {
        !matches!(self, Self::Descend | Self::Include)
    }

    /// Short human-readable reason for a skip
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Descend => "directory",
            Self::SkipExcludedDir => "excluded directory",
            Self::SkipSymlink => "symbolic link",
            Self::SkipSpecial => "not a regular file",
            Self::SkipAlreadySealed => "already sealed",
            Self::SkipNotSealed => "not a sealed file",
            Self::SkipTempFile => "leftover temporary file",
            Self::Include => "included",
        }
    }
}

/// Kind of a directory entry, as seen without following links
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Dir,
    File,
    Symlink,
    Other,
}

impl From<std::fs::FileType> for EntryKind {
    fn from(ft: std::fs::FileType) -> Self {
        if ft.is_symlink() {
            EntryKind::Symlink
        } else if ft.is_dir() {
            EntryKind::Dir
        } else if ft.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        }
    }
}

/// Set of directory names that are never descended into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionSet {
    names: BTreeSet<OsString>,
}

impl ExclusionSet {
    /// An empty set: every directory is walked
    pub fn empty() -> Self {
        Self {
            names: BTreeSet::new(),
        }
    }

    /// Build a set from directory names
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Add one directory name
    pub fn insert(&mut self, name: impl Into<OsString>) {
        self.names.insert(name.into());
    }

    /// Check a directory name against the set
    pub fn contains(&self, name: &OsStr) -> bool {
        self.names.contains(name)
    }

    /// Number of names in the set
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate over the names in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &OsStr> {
        self.names.iter().map(OsString::as_os_str)
    }
}

impl Default for ExclusionSet {
    fn default() -> Self {
        Self::from_names(DEFAULT_EXCLUDED_DIRS.iter().copied())
    }
}

/// Check whether a file name bears the artifact suffix
pub fn has_artifact_suffix(name: &OsStr) -> bool {
    name.as_encoded_bytes()
        .ends_with(ARTIFACT_SUFFIX.as_bytes())
}

/// Decides, per entry, whether to descend, skip or include
#[derive(Debug, Clone)]
pub struct TraversalPolicy {
    mode: Mode,
    exclusions: ExclusionSet,
}

impl TraversalPolicy {
    /// Create a policy for one run
    pub fn new(mode: Mode, exclusions: ExclusionSet) -> Self {
        Self { mode, exclusions }
    }

    /// The run direction
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Decide what to do with one entry
    ///
    /// The walk root is always descended, even if its name is excluded: the
    /// caller asked for it by name.
    pub fn decide(&self, name: &OsStr, kind: EntryKind, is_root: bool) -> TraversalDecision {
        match kind {
            EntryKind::Dir if is_root => TraversalDecision::Descend,
            EntryKind::Dir if self.exclusions.contains(name) => TraversalDecision::SkipExcludedDir,
            EntryKind::Dir => TraversalDecision::Descend,
            EntryKind::Symlink => TraversalDecision::SkipSymlink,
            EntryKind::Other => TraversalDecision::SkipSpecial,
            EntryKind::File if is_temp_file_name(name) => TraversalDecision::SkipTempFile,
            EntryKind::File => match (self.mode, has_artifact_suffix(name)) {
                (Mode::Seal, true) => TraversalDecision::SkipAlreadySealed,
                (Mode::Unseal, false) => TraversalDecision::SkipNotSealed,
                _ => TraversalDecision::Include,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seal_policy() -> TraversalPolicy {
        TraversalPolicy::new(Mode::Seal, ExclusionSet::default())
    }

    fn unseal_policy() -> TraversalPolicy {
        TraversalPolicy::new(Mode::Unseal, ExclusionSet::default())
    }

    #[test]
    fn test_default_exclusions() {
        let set = ExclusionSet::default();
        assert_eq!(set.len(), 4);
        for name in [".git", "vendor", "node_modules", "target"] {
            assert!(set.contains(OsStr::new(name)));
        }
        assert!(!set.contains(OsStr::new("src")));
    }

    #[test]
    fn test_excluded_dir_skipped() {
        let policy = seal_policy();
        assert_eq!(
            policy.decide(OsStr::new("vendor"), EntryKind::Dir, false),
            TraversalDecision::SkipExcludedDir
        );
        assert_eq!(
            policy.decide(OsStr::new("src"), EntryKind::Dir, false),
            TraversalDecision::Descend
        );
    }

    #[test]
    fn test_root_always_descended() {
        let policy = seal_policy();
        assert_eq!(
            policy.decide(OsStr::new("vendor"), EntryKind::Dir, true),
            TraversalDecision::Descend
        );
    }

    #[test]
    fn test_excluded_name_on_file_is_not_special() {
        // Exclusions name directories; a file called "target" is still sealed
        let policy = seal_policy();
        assert_eq!(
            policy.decide(OsStr::new("target"), EntryKind::File, false),
            TraversalDecision::Include
        );
    }

    #[test]
    fn test_symlink_and_special_skipped_in_both_modes() {
        for policy in [seal_policy(), unseal_policy()] {
            assert_eq!(
                policy.decide(OsStr::new("link.aegis"), EntryKind::Symlink, false),
                TraversalDecision::SkipSymlink
            );
            assert_eq!(
                policy.decide(OsStr::new("fifo"), EntryKind::Other, false),
                TraversalDecision::SkipSpecial
            );
        }
    }

    #[test]
    fn test_seal_filters_sealed_files() {
        let policy = seal_policy();
        assert_eq!(
            policy.decide(OsStr::new("notes.aegis"), EntryKind::File, false),
            TraversalDecision::SkipAlreadySealed
        );
        assert_eq!(
            policy.decide(OsStr::new("notes.txt"), EntryKind::File, false),
            TraversalDecision::Include
        );
    }

    #[test]
    fn test_unseal_inverse_filter() {
        let policy = unseal_policy();
        assert_eq!(
            policy.decide(OsStr::new("notes.aegis"), EntryKind::File, false),
            TraversalDecision::Include
        );
        assert_eq!(
            policy.decide(OsStr::new("notes.txt"), EntryKind::File, false),
            TraversalDecision::SkipNotSealed
        );
    }

    #[test]
    fn test_leftover_temp_files_skipped_in_both_modes() {
        for policy in [seal_policy(), unseal_policy()] {
            assert_eq!(
                policy.decide(OsStr::new(".aegis-Xy12ab.tmp"), EntryKind::File, false),
                TraversalDecision::SkipTempFile
            );
        }
        // Only the full prefix and suffix pair marks a temp file
        let policy = seal_policy();
        for name in [".aegis-notes.txt", "notes.tmp", "aegis-x.tmp"] {
            assert_eq!(
                policy.decide(OsStr::new(name), EntryKind::File, false),
                TraversalDecision::Include,
                "{}",
                name
            );
        }
    }

    #[test]
    fn test_suffix_is_case_sensitive() {
        assert!(has_artifact_suffix(OsStr::new("a.aegis")));
        assert!(!has_artifact_suffix(OsStr::new("a.AEGIS")));
        assert!(!has_artifact_suffix(OsStr::new("a.aegis.bak")));
    }

    #[test]
    fn test_custom_exclusions() {
        let mut set = ExclusionSet::empty();
        set.insert("build");
        let policy = TraversalPolicy::new(Mode::Seal, set);

        assert_eq!(
            policy.decide(OsStr::new("build"), EntryKind::Dir, false),
            TraversalDecision::SkipExcludedDir
        );
        assert_eq!(
            policy.decide(OsStr::new("vendor"), EntryKind::Dir, false),
            TraversalDecision::Descend
        );
    }

    #[test]
    fn test_skip_classification() {
        assert!(!TraversalDecision::Descend.is_skip());
        assert!(!TraversalDecision::Include.is_skip());
        assert!(TraversalDecision::SkipExcludedDir.is_skip());
        assert!(TraversalDecision::SkipNotSealed.is_skip());
        assert!(TraversalDecision::SkipTempFile.is_skip());
    }
}
