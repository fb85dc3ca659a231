//! Lazy, ignore-filtered walk over a tree container
//!
//! [`Walk`] yields file paths depth-first, in directory listing order. Denied
//! entries are skipped before they are descended into, so nothing below an
//! ignored directory is ever read. Every call to [`Walk::new`] starts a fresh
//! walk, and dropping a walk part way through is always safe.

use crate::error::Result;
use crate::filesystem::TreeContainer;
use crate::ignore_file::IgnoreFile;
use log::trace;
use std::path::{Path, PathBuf};

/// Depth-first iterator of file paths under a start path
///
/// A start path that is not a directory is yielded as-is. A read failure is
/// yielded once and ends the walk.
#[derive(Debug)]
pub struct Walk<'a> {
    tree: &'a dyn TreeContainer,
    ignore: &'a IgnoreFile,
    start: Option<PathBuf>,
    stack: Vec<(PathBuf, std::vec::IntoIter<String>)>,
    failed: bool,
}

impl<'a> Walk<'a> {
    pub fn new(tree: &'a dyn TreeContainer, ignore: &'a IgnoreFile, start: &Path) -> Self {
        Self {
            tree,
            ignore,
            start: Some(start.to_path_buf()),
            stack: Vec::new(),
            failed: false,
        }
    }

    fn descend(&mut self, dir: PathBuf) -> Result<()> {
        let entries = self.tree.read_directory(&dir)?;
        trace!("Walking {} ({} entries)", dir.display(), entries.len());
        self.stack.push((dir, entries.into_iter()));
        Ok(())
    }
}

impl Iterator for Walk<'_> {
    type Item = Result<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        if let Some(start) = self.start.take() {
            if !self.tree.is_directory(&start) {
                return Some(Ok(start));
            }
            if let Err(e) = self.descend(start) {
                self.failed = true;
                return Some(Err(e));
            }
        }

        while let Some((dir, entries)) = self.stack.last_mut() {
            let Some(entry) = entries.next() else {
                self.stack.pop();
                continue;
            };
            let child = dir.join(entry);
            let is_dir = self.tree.is_directory(&child);
            if self.ignore.denies_entry(&child, is_dir) {
                trace!("Ignoring {}", child.display());
                continue;
            }
            if !is_dir {
                return Some(Ok(child));
            }
            if let Err(e) = self.descend(child) {
                self.failed = true;
                return Some(Err(e));
            }
        }
        None
    }
}
