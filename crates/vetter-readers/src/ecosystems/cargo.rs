//! `Cargo.lock` parsing for the Rust ecosystem.

use serde::Deserialize;
use vetter_core::{Ecosystem, ManifestRef, Package};

#[derive(Debug, Deserialize)]
struct CargoLock {
    #[serde(default, rename = "package")]
    packages: Vec<CargoPackage>,
}

#[derive(Debug, Deserialize)]
struct CargoPackage {
    name: String,
    version: String,
}

pub fn parse_cargo_lock(contents: &str, manifest: &ManifestRef) -> anyhow::Result<Vec<Package>> {
    let lock: CargoLock = toml::from_str(contents)?;
    Ok(lock
        .packages
        .into_iter()
        .map(|p| Package::new(Ecosystem::Cargo, p.name, p.version, manifest.clone()))
        .collect())
}
