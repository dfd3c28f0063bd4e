//! `package-lock.json` and `package.json` parsing for the npm ecosystem.

use std::collections::HashMap;

use serde::Deserialize;
use vetter_core::{Ecosystem, ManifestRef, Package};

#[derive(Debug, Deserialize)]
struct PackageLockJson {
    /// npm v7+ lockfile format: keys are node_modules paths, `""` is the
    /// root project itself.
    #[serde(default)]
    packages: HashMap<String, LockfilePackage>,
    /// Legacy (npm v5/v6) nested format.
    #[serde(default)]
    dependencies: HashMap<String, LockfileDependency>,
}

#[derive(Debug, Deserialize)]
struct LockfilePackage {
    #[serde(default)]
    version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LockfileDependency {
    #[serde(default)]
    version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PackageJson {
    #[serde(default)]
    dependencies: HashMap<String, String>,
    #[serde(default, rename = "devDependencies")]
    dev_dependencies: HashMap<String, String>,
}

/// npm v7+ `packages` map keys a dependency at `node_modules/<name>` or, for
/// scoped packages, `node_modules/@scope/<name>`; the root project itself is
/// keyed `""` and is not a dependency.
fn name_from_packages_key(key: &str) -> Option<String> {
    if key.is_empty() {
        return None;
    }
    let after = key.rsplit("node_modules/").next().unwrap_or(key);
    if after.is_empty() {
        return None;
    }
    Some(after.to_string())
}

pub fn parse_package_lock(contents: &str, manifest: &ManifestRef) -> anyhow::Result<Vec<Package>> {
    let lock: PackageLockJson = serde_json::from_str(contents)?;
    let mut packages = Vec::new();

    if !lock.packages.is_empty() {
        for (key, entry) in lock.packages {
            let Some(name) = name_from_packages_key(&key) else {
                continue;
            };
            let version = entry.version.unwrap_or_default();
            packages.push(Package::new(Ecosystem::Npm, name, version, manifest.clone()));
        }
    } else {
        for (name, entry) in lock.dependencies {
            let version = entry.version.unwrap_or_default();
            packages.push(Package::new(Ecosystem::Npm, name, version, manifest.clone()));
        }
    }

    Ok(packages)
}

/// A bare `package.json` with no lockfile: only direct dependencies are
/// known, and only the declared semver range, not a resolved version.
pub fn parse_package_json(contents: &str, manifest: &ManifestRef) -> anyhow::Result<Vec<Package>> {
    let pkg: PackageJson = serde_json::from_str(contents)?;
    let mut packages = Vec::new();
    for (name, range) in pkg.dependencies.into_iter().chain(pkg.dev_dependencies) {
        packages.push(Package::new(Ecosystem::Npm, name, range, manifest.clone()));
    }
    Ok(packages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vetter_core::ManifestKind;

    fn manifest() -> ManifestRef {
        ManifestRef::new(ManifestKind::PackageLockJson, "package-lock.json")
    }

    #[test]
    fn parses_v7_packages_map() {
        let json = r#"{
            "packages": {
                "": { "version": "1.0.0" },
                "node_modules/left-pad": { "version": "1.3.0" },
                "node_modules/@scope/thing": { "version": "2.0.0" }
            }
        }"#;
        let mut packages = parse_package_lock(json, &manifest()).unwrap();
        packages.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(packages.len(), 2);
        assert_eq!(packages[0].name, "@scope/thing");
        assert_eq!(packages[1].name, "left-pad");
        assert_eq!(packages[1].version, "1.3.0");
    }

    #[test]
    fn parses_legacy_dependencies_map() {
        let json = r#"{
            "dependencies": {
                "left-pad": { "version": "1.3.0" }
            }
        }"#;
        let packages = parse_package_lock(json, &manifest()).unwrap();
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].name, "left-pad");
    }

    #[test]
    fn parses_bare_package_json() {
        let json = r#"{ "dependencies": { "express": "^4.18.0" } }"#;
        let packages = parse_package_json(json, &manifest()).unwrap();
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].name, "express");
        assert_eq!(packages[0].version, "^4.18.0");
    }
}
