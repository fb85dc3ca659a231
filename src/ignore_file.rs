//! Ignore rules applied while walking component trees
//!
//! An [`IgnoreFile`] holds gitignore-style patterns anchored at the directory
//! containing the ignore file. A denied directory hides its whole subtree.
//!
//! ```
//! use component_tree::ignore_file::IgnoreFile;
//! use std::path::Path;
//!
//! let ignore = IgnoreFile::from_contents("/project", "**/jsconfig.json\nscratch/\n").unwrap();
//! assert!(ignore.denies(Path::new("/project/lwc/jsconfig.json")));
//! assert!(ignore.denies(Path::new("/project/scratch/notes.txt")));
//! assert!(ignore.accepts(Path::new("/project/classes/Foo.cls")));
//! ```

use crate::defaults::{DEFAULT_IGNORE_PATTERNS, IGNORE_FILE_NAME};
use crate::error::Result;
use crate::path::normalize;
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use log::debug;
use std::path::{Component, Path, PathBuf};

/// Gitignore-style deny rules
///
/// The default value denies nothing.
#[derive(Debug, Clone, Default)]
pub struct IgnoreFile {
    matcher: Option<Gitignore>,
    source: Option<PathBuf>,
}

impl IgnoreFile {
    /// Search `start_dir` and its ancestors for an ignore file and load the first one found.
    ///
    /// Returns the empty matcher when no ignore file exists.
    pub fn find_and_create<P: AsRef<Path>>(start_dir: P) -> Result<Self> {
        match find_ignore_file(start_dir.as_ref()) {
            Some(path) => Self::from_file(path),
            None => {
                debug!(
                    "No {} found from {}",
                    IGNORE_FILE_NAME,
                    start_dir.as_ref().display()
                );
                Ok(Self::default())
            }
        }
    }

    /// Load an ignore file; its patterns are anchored at the file's directory
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let root = path.parent().unwrap_or_else(|| Path::new(""));
        let mut ignore = Self::from_contents(root, &contents)?;
        ignore.source = Some(path.to_path_buf());
        debug!("Loaded ignore rules from {}", path.display());
        Ok(ignore)
    }

    /// Build rules from ignore file text anchored at `root`
    pub fn from_contents<P: AsRef<Path>>(root: P, contents: &str) -> Result<Self> {
        let mut builder = GitignoreBuilder::new(root.as_ref());
        for pattern in DEFAULT_IGNORE_PATTERNS {
            builder.add_line(None, pattern)?;
        }
        for line in contents.lines() {
            builder.add_line(None, line)?;
        }
        Ok(Self {
            matcher: Some(builder.build()?),
            source: None,
        })
    }

    /// The ignore file these rules came from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Whether `path` is excluded, either directly or through a denied ancestor
    pub fn denies(&self, path: &Path) -> bool {
        self.denies_entry(path, false)
    }

    pub fn accepts(&self, path: &Path) -> bool {
        !self.denies(path)
    }

    /// Like [`IgnoreFile::denies`], for a path whose kind is known
    ///
    /// Directory-only patterns (`build/`) match only when `is_dir` is set.
    /// `.` and `..` segments are resolved before matching. Rules anchored at
    /// an absolute directory never deny paths outside it.
    pub fn denies_entry(&self, path: &Path, is_dir: bool) -> bool {
        let Some(matcher) = &self.matcher else {
            return false;
        };
        let root = matcher.path();
        let path = if root.is_absolute() {
            absolute_path(path)
        } else {
            normalize(path)
        };
        let relative = match path.strip_prefix(root) {
            Ok(relative) => relative,
            Err(_) if root.is_absolute() => return false,
            Err(_) => path.as_path(),
        };
        if relative.as_os_str().is_empty() {
            return false;
        }
        if matcher.matched(relative, is_dir).is_ignore() {
            return true;
        }
        // Unresolvable `..` segments name no directory of their own
        relative
            .ancestors()
            .skip(1)
            .filter(|ancestor| {
                matches!(ancestor.components().next_back(), Some(Component::Normal(_)))
            })
            .any(|ancestor| matcher.matched(ancestor, true).is_ignore())
    }
}

/// `path` made absolute against the working directory, with `.` and `..` resolved
fn absolute_path(path: &Path) -> PathBuf {
    std::path::absolute(path)
        .map(|absolute| normalize(&absolute))
        .unwrap_or_else(|_| normalize(path))
}

fn find_ignore_file(start_dir: &Path) -> Option<PathBuf> {
    absolute_path(start_dir)
        .ancestors()
        .map(|dir| dir.join(IGNORE_FILE_NAME))
        .find(|candidate| candidate.is_file())
}
