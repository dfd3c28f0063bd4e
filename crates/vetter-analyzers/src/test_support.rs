//! Shared fixtures for this crate's unit tests.
#![cfg(test)]

use vetter_core::{Ecosystem, Manifest, ManifestKind, ManifestRef, Package};

pub fn manifest_fixture() -> Manifest {
    Manifest::new(ManifestKind::RequirementsTxt, "requirements.txt")
}

pub fn package_fixture(name: &str, version: &str) -> Package {
    Package::new(
        Ecosystem::PyPI,
        name,
        version,
        ManifestRef::new(ManifestKind::RequirementsTxt, "requirements.txt"),
    )
}
