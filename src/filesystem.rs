//! Tree containers the resolver reads component files through
//!
//! Every read the resolver performs goes through the [`TreeContainer`] trait,
//! so the same resolution code runs against a real project on disk
//! ([`DiskTree`]) or against an in-memory mapping ([`VirtualTree`]) built by
//! tests and tooling that never touch the filesystem.

use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Read-only view of a file tree
#[async_trait]
pub trait TreeContainer: Send + Sync + fmt::Debug {
    /// Whether `path` exists and is a directory. Missing paths are not directories.
    fn is_directory(&self, path: &Path) -> bool;

    /// Whether `path` exists at all
    fn exists(&self, path: &Path) -> bool;

    /// Entry names of the directory at `path`, in listing order
    fn read_directory(&self, path: &Path) -> Result<Vec<String>>;

    /// Read the whole file at `path`
    async fn read_file(&self, path: &Path) -> Result<Vec<u8>>;

    /// Blocking counterpart of [`TreeContainer::read_file`]
    fn read_file_sync(&self, path: &Path) -> Result<Vec<u8>>;
}

/// Tree container backed by the local filesystem
///
/// Paths are used as given, so absolute paths work from anywhere and relative
/// paths resolve against the working directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskTree;

impl DiskTree {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TreeContainer for DiskTree {
    fn is_directory(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_directory(&self, path: &Path) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(path)? {
            names.push(entry?.file_name().to_string_lossy().into_owned());
        }
        // read_dir order is platform dependent
        names.sort();
        Ok(names)
    }

    async fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        Ok(tokio::fs::read(path).await?)
    }

    fn read_file_sync(&self, path: &Path) -> Result<Vec<u8>> {
        Ok(std::fs::read(path)?)
    }
}

/// A file to place in a [`VirtualDirectory`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualFile {
    /// File name, relative to the owning directory
    pub name: String,
    /// File content as bytes
    pub data: Vec<u8>,
}

impl VirtualFile {
    /// An empty file
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: Vec::new(),
        }
    }

    /// A file with string content
    pub fn with_content(name: impl Into<String>, content: &str) -> Self {
        Self {
            name: name.into(),
            data: content.as_bytes().to_vec(),
        }
    }
}

/// A directory and the files directly inside it
///
/// Subdirectories are declared as their own `VirtualDirectory`; they are
/// linked into their parent's listing automatically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualDirectory {
    pub dir_path: PathBuf,
    pub children: Vec<VirtualFile>,
}

impl VirtualDirectory {
    pub fn new(dir_path: impl Into<PathBuf>, children: Vec<VirtualFile>) -> Self {
        Self {
            dir_path: dir_path.into(),
            children,
        }
    }
}

#[derive(Debug, Clone)]
enum VirtualEntry {
    File(Vec<u8>),
    Directory(Vec<String>),
}

/// In-memory tree container
///
/// Maps each path to either file bytes or an ordered list of entry names.
/// Directory listings keep insertion order, which makes walks deterministic.
#[derive(Debug, Clone, Default)]
pub struct VirtualTree {
    entries: HashMap<PathBuf, VirtualEntry>,
}

impl VirtualTree {
    /// Build a tree from directory declarations
    pub fn new(directories: Vec<VirtualDirectory>) -> Self {
        let mut tree = Self::default();
        for directory in directories {
            tree.add_directory(&directory.dir_path);
            for file in directory.children {
                tree.add_file(directory.dir_path.join(&file.name), file.data);
            }
        }
        tree
    }

    /// Build a tree of empty files, creating every parent directory
    pub fn from_file_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut tree = Self::default();
        for path in paths {
            tree.add_file(path, Vec::new());
        }
        tree
    }

    /// Add or replace a file, creating missing parent directories
    pub fn add_file<P: AsRef<Path>>(&mut self, path: P, data: Vec<u8>) {
        let path = path.as_ref();
        self.link_into_parent(path);
        self.entries
            .insert(path.to_path_buf(), VirtualEntry::File(data));
    }

    /// Add a file with string content
    pub fn add_file_string<P: AsRef<Path>>(&mut self, path: P, content: &str) {
        self.add_file(path, content.as_bytes().to_vec());
    }

    /// Add an (empty) directory, creating missing parent directories
    pub fn add_directory<P: AsRef<Path>>(&mut self, path: P) {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return;
        }
        if !matches!(self.entries.get(path), Some(VirtualEntry::Directory(_))) {
            self.entries
                .insert(path.to_path_buf(), VirtualEntry::Directory(Vec::new()));
        }
        self.link_into_parent(path);
    }

    /// Number of files in the tree
    pub fn file_count(&self) -> usize {
        self.entries
            .values()
            .filter(|entry| matches!(entry, VirtualEntry::File(_)))
            .count()
    }

    fn link_into_parent(&mut self, path: &Path) {
        let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
            return;
        };
        if parent.as_os_str().is_empty() {
            return;
        }
        self.add_directory(parent);
        let name = name.to_string_lossy().into_owned();
        if let Some(VirtualEntry::Directory(names)) = self.entries.get_mut(parent) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }

    fn file(&self, path: &Path) -> Result<Vec<u8>> {
        match self.entries.get(path) {
            Some(VirtualEntry::File(data)) => Ok(data.clone()),
            Some(VirtualEntry::Directory(_)) => Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::IsADirectory,
                format!("{} is a directory", path.display()),
            ))),
            None => Err(Error::PathNotFound {
                path: path.to_path_buf(),
            }),
        }
    }
}

#[async_trait]
impl TreeContainer for VirtualTree {
    fn is_directory(&self, path: &Path) -> bool {
        matches!(self.entries.get(path), Some(VirtualEntry::Directory(_)))
    }

    fn exists(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    fn read_directory(&self, path: &Path) -> Result<Vec<String>> {
        match self.entries.get(path) {
            Some(VirtualEntry::Directory(names)) => Ok(names.clone()),
            Some(VirtualEntry::File(_)) => Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotADirectory,
                format!("{} is not a directory", path.display()),
            ))),
            None => Err(Error::PathNotFound {
                path: path.to_path_buf(),
            }),
        }
    }

    async fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        self.file(path)
    }

    fn read_file_sync(&self, path: &Path) -> Result<Vec<u8>> {
        self.file(path)
    }
}
