//! `requirements.txt` and `poetry.lock` parsing for the PyPI ecosystem.

use serde::Deserialize;
use vetter_core::{Ecosystem, ManifestRef, Package};

/// Parses a `requirements.txt` file. Unpinned requirements (no `==`/`===`)
/// are emitted with an empty version rather than skipped, since the
/// package's *name* is still a fact worth enriching and filtering on.
pub fn parse_requirements_txt(
    contents: &str,
    manifest: &ManifestRef,
) -> anyhow::Result<Vec<Package>> {
    let mut packages = Vec::new();
    for line in contents.lines() {
        if let Some(pkg) = parse_requirement_line(line, manifest) {
            packages.push(pkg);
        }
    }
    Ok(packages)
}

fn parse_requirement_line(line: &str, manifest: &ManifestRef) -> Option<Package> {
    let line = line.split('#').next().unwrap_or("").trim();
    if line.is_empty() || line.starts_with('-') {
        return None;
    }
    // Strip environment markers: `pkg==1.0; python_version >= "3.8"`
    let line = line.split(';').next().unwrap_or("").trim();
    if line.is_empty() {
        return None;
    }

    for op in ["===", "==", "~=", ">=", "<=", "!=", ">", "<"] {
        if let Some((name, version)) = line.split_once(op) {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            let version = if op == "==" || op == "===" {
                version.trim().to_string()
            } else {
                String::new()
            };
            return Some(Package::new(
                Ecosystem::PyPI,
                name,
                version,
                manifest.clone(),
            ));
        }
    }

    Some(Package::new(
        Ecosystem::PyPI,
        line.to_string(),
        String::new(),
        manifest.clone(),
    ))
}

#[derive(Debug, Deserialize)]
struct PoetryLock {
    #[serde(default, rename = "package")]
    packages: Vec<PoetryPackage>,
}

#[derive(Debug, Deserialize)]
struct PoetryPackage {
    name: String,
    version: String,
}

pub fn parse_poetry_lock(contents: &str, manifest: &ManifestRef) -> anyhow::Result<Vec<Package>> {
    let lock: PoetryLock = toml::from_str(contents)?;
    Ok(lock
        .packages
        .into_iter()
        .map(|p| Package::new(Ecosystem::PyPI, p.name, p.version, manifest.clone()))
        .collect())
}
