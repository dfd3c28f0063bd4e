//! The JSON dump format: a directory of newline-delimited JSON files, one
//! per manifest, each line a serialized [`Package`] (with its [`Insight`]
//! attached if enrichment ran). [`write_dump`] produces it; [`DumpReader`]
//! replays it, bypassing the enricher entirely.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use vetter_core::{Manifest, ManifestKind, Package};

use crate::{Flow, PackageCallback, Reader, ReaderError};

fn dump_file_name(manifest: &Manifest, index: usize) -> String {
    let stem = manifest
        .path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("manifest");
    format!("{index:04}-{stem}.ndjson")
}

/// Writes one NDJSON file per manifest into `dir`, creating it if absent.
pub fn write_dump(dir: &Path, manifests: &[Manifest]) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)?;
    for (index, manifest) in manifests.iter().enumerate() {
        let path = dir.join(dump_file_name(manifest, index));
        let mut file = File::create(&path)?;
        for package in &manifest.packages {
            let line = serde_json::to_string(package)?;
            writeln!(file, "{line}")?;
        }
    }
    Ok(())
}

/// Replays a directory previously produced by [`write_dump`].
pub struct DumpReader {
    dir: PathBuf,
}

impl DumpReader {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

impl Reader for DumpReader {
    fn enumerate(&self, callback: &mut PackageCallback<'_>) -> Result<(), ReaderError> {
        if !self.dir.is_dir() {
            return Err(ReaderError::UnreadableRoot(self.dir.clone()));
        }

        let mut entries: Vec<PathBuf> = std::fs::read_dir(&self.dir)
            .map_err(|source| ReaderError::Io {
                path: self.dir.clone(),
                source,
            })?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("ndjson"))
            .collect();
        entries.sort();

        for path in entries {
            let file = File::open(&path).map_err(|source| ReaderError::Io {
                path: path.clone(),
                source,
            })?;
            let mut manifest = Manifest::new(ManifestKind::Dump, path.clone());
            for line in BufReader::new(file).lines() {
                let line = line.map_err(|source| ReaderError::Io {
                    path: path.clone(),
                    source,
                })?;
                if line.trim().is_empty() {
                    continue;
                }
                let package: Package = serde_json::from_str(&line).map_err(|source| ReaderError::Parse {
                    path: path.clone(),
                    source: source.into(),
                })?;
                manifest.packages.push(package.clone());
                if callback(&manifest, &package) == Flow::Stop {
                    return Ok(());
                }
            }
        }
        Ok(())
    }
}
