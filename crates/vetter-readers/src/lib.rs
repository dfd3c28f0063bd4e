//! Manifest-to-package readers.
//!
//! A [`Reader`] produces a finite lazy sequence of `(Manifest, Package)`
//! pairs by invoking a callback once per discovered package. The callback
//! can return [`Flow::Stop`] to abort the traversal cleanly.

pub mod dump;
pub mod ecosystems;

use std::path::{Path, PathBuf};

use thiserror::Error;
use vetter_core::{Manifest, ManifestKind, Package};

/// Returned by a reader's callback after each package to control whether
/// traversal continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("root path does not exist or is not readable: {0}")]
    UnreadableRoot(PathBuf),
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

/// A callback invoked once per discovered package.
pub type PackageCallback<'a> = dyn FnMut(&Manifest, &Package) -> Flow + 'a;

pub trait Reader {
    /// Invoke `callback` once per discovered package. Returns an error only
    /// when the reader's root itself could not be read; a single
    /// unparseable manifest is logged and skipped instead of failing the
    /// whole traversal.
    fn enumerate(&self, callback: &mut PackageCallback<'_>) -> Result<(), ReaderError>;
}

/// Maps a filename to the [`ManifestKind`] it should be parsed as.
/// Returns `None` for filenames no parser recognizes.
pub fn recognize_filename(file_name: &str) -> Option<ManifestKind> {
    match file_name {
        "requirements.txt" => Some(ManifestKind::RequirementsTxt),
        "poetry.lock" => Some(ManifestKind::PoetryLock),
        "package-lock.json" => Some(ManifestKind::PackageLockJson),
        "package.json" => Some(ManifestKind::PackageJson),
        "Cargo.lock" => Some(ManifestKind::CargoLock),
        "pom.xml" => Some(ManifestKind::PomXml),
        "go.sum" => Some(ManifestKind::GoSum),
        "Gemfile.lock" => Some(ManifestKind::GemfileLock),
        _ => None,
    }
}

fn parse_manifest(kind: ManifestKind, path: &Path, contents: &str) -> anyhow::Result<Vec<Package>> {
    let manifest_ref = vetter_core::ManifestRef::new(kind, path.to_path_buf());
    match kind {
        ManifestKind::RequirementsTxt => ecosystems::pypi::parse_requirements_txt(contents, &manifest_ref),
        ManifestKind::PoetryLock => ecosystems::pypi::parse_poetry_lock(contents, &manifest_ref),
        ManifestKind::PackageLockJson => ecosystems::npm::parse_package_lock(contents, &manifest_ref),
        ManifestKind::PackageJson => ecosystems::npm::parse_package_json(contents, &manifest_ref),
        ManifestKind::CargoLock => ecosystems::cargo::parse_cargo_lock(contents, &manifest_ref),
        ManifestKind::PomXml => ecosystems::maven::parse_pom_xml(contents, &manifest_ref),
        ManifestKind::GoSum => ecosystems::go::parse_go_sum(contents, &manifest_ref),
        ManifestKind::GemfileLock => ecosystems::gem::parse_gemfile_lock(contents, &manifest_ref),
        ManifestKind::Directory | ManifestKind::Dump => Ok(Vec::new()),
    }
}

/// Reads one or more explicit manifest file paths, detecting each one's
/// kind by filename.
pub struct LockfileReader {
    paths: Vec<PathBuf>,
}

impl LockfileReader {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    fn read_one(&self, path: &Path, callback: &mut PackageCallback<'_>) -> Result<Flow, ReaderError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let Some(kind) = recognize_filename(file_name) else {
            tracing::warn!(path = %path.display(), "unrecognized manifest filename, skipping");
            return Ok(Flow::Continue);
        };

        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(source) => {
                tracing::warn!(path = %path.display(), error = %source, "failed to read manifest, skipping");
                return Ok(Flow::Continue);
            }
        };

        let packages = match parse_manifest(kind, path, &contents) {
            Ok(p) => p,
            Err(source) => {
                tracing::warn!(path = %path.display(), error = %source, "failed to parse manifest, skipping");
                return Ok(Flow::Continue);
            }
        };

        let mut manifest = Manifest::new(kind, path.to_path_buf());
        for package in packages {
            manifest.packages.push(package.clone());
            if callback(&manifest, &package) == Flow::Stop {
                return Ok(Flow::Stop);
            }
        }
        Ok(Flow::Continue)
    }
}

impl Reader for LockfileReader {
    fn enumerate(&self, callback: &mut PackageCallback<'_>) -> Result<(), ReaderError> {
        for path in &self.paths {
            if !path.exists() {
                return Err(ReaderError::UnreadableRoot(path.clone()));
            }
            if self.read_one(path, callback)? == Flow::Stop {
                break;
            }
        }
        Ok(())
    }
}

/// Walks a directory tree, recognizes supported manifests by filename and
/// delegates each one to the same parsing logic as [`LockfileReader`].
pub struct DirectoryReader {
    root: PathBuf,
}

impl DirectoryReader {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn walk(&self, dir: &Path, callback: &mut PackageCallback<'_>) -> Result<Flow, ReaderError> {
        let entries = std::fs::read_dir(dir).map_err(|source| ReaderError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut subdirs = Vec::new();
        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| ReaderError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.is_dir() {
                if path.file_name().and_then(|n| n.to_str()) != Some(".git")
                    && path.file_name().and_then(|n| n.to_str()) != Some("node_modules")
                {
                    subdirs.push(path);
                }
            } else {
                files.push(path);
            }
        }

        let lockfile_reader = LockfileReader::new(files);
        if lockfile_reader.enumerate_inner(callback)? == Flow::Stop {
            return Ok(Flow::Stop);
        }

        for subdir in subdirs {
            if self.walk(&subdir, callback)? == Flow::Stop {
                return Ok(Flow::Stop);
            }
        }
        Ok(Flow::Continue)
    }
}

impl LockfileReader {
    /// Like [`Reader::enumerate`] but returns the [`Flow`] it stopped on
    /// instead of always succeeding, so [`DirectoryReader`] can propagate a
    /// stop signal across directories. Does not error on a missing path —
    /// the directory walk only ever passes files it just listed.
    fn enumerate_inner(&self, callback: &mut PackageCallback<'_>) -> Result<Flow, ReaderError> {
        for path in &self.paths {
            if self.read_one(path, callback)? == Flow::Stop {
                return Ok(Flow::Stop);
            }
        }
        Ok(Flow::Continue)
    }
}

impl Reader for DirectoryReader {
    fn enumerate(&self, callback: &mut PackageCallback<'_>) -> Result<(), ReaderError> {
        if !self.root.is_dir() {
            return Err(ReaderError::UnreadableRoot(self.root.clone()));
        }
        self.walk(&self.root, callback)?;
        Ok(())
    }
}
