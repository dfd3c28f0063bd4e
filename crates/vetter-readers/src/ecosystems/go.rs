//! `go.sum` parsing for the Go ecosystem.

use std::collections::BTreeSet;

use vetter_core::{Ecosystem, ManifestRef, Package};

/// Each module@version appears at least twice in `go.sum`: once for the
/// module zip hash and once for its `go.mod` hash (`<module> <version>/go.mod
/// <hash>`). Both lines name the same dependency, so they are deduplicated
/// by `(module, version)` before emitting packages.
pub fn parse_go_sum(contents: &str, manifest: &ManifestRef) -> anyhow::Result<Vec<Package>> {
    let mut seen = BTreeSet::new();
    let mut packages = Vec::new();

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        let Some(module) = fields.next() else {
            continue;
        };
        let Some(version_field) = fields.next() else {
            continue;
        };
        let version = version_field.trim_end_matches("/go.mod").to_string();
        let key = (module.to_string(), version.clone());
        if seen.insert(key) {
            packages.push(Package::new(
                Ecosystem::Go,
                module.to_string(),
                version,
                manifest.clone(),
            ));
        }
    }

    Ok(packages)
}
