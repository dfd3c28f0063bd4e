//! Fuzzes every ecosystem manifest parser directly with arbitrary bytes,
//! looking for panics on malformed lockfiles rather than parse errors
//! (which are expected and propagated as `Err`).

#![no_main]

use libfuzzer_sys::fuzz_target;
use vetter_core::{ManifestKind, ManifestRef};
use vetter_readers::ecosystems::{cargo, gem, go, maven, npm, pypi};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let requirements_ref = ManifestRef::new(ManifestKind::RequirementsTxt, "requirements.txt");
    let _ = pypi::parse_requirements_txt(text, &requirements_ref);

    let poetry_ref = ManifestRef::new(ManifestKind::PoetryLock, "poetry.lock");
    let _ = pypi::parse_poetry_lock(text, &poetry_ref);

    let package_lock_ref = ManifestRef::new(ManifestKind::PackageLockJson, "package-lock.json");
    let _ = npm::parse_package_lock(text, &package_lock_ref);

    let package_json_ref = ManifestRef::new(ManifestKind::PackageJson, "package.json");
    let _ = npm::parse_package_json(text, &package_json_ref);

    let cargo_lock_ref = ManifestRef::new(ManifestKind::CargoLock, "Cargo.lock");
    let _ = cargo::parse_cargo_lock(text, &cargo_lock_ref);

    let pom_ref = ManifestRef::new(ManifestKind::PomXml, "pom.xml");
    let _ = maven::parse_pom_xml(text, &pom_ref);

    let go_sum_ref = ManifestRef::new(ManifestKind::GoSum, "go.sum");
    let _ = go::parse_go_sum(text, &go_sum_ref);

    let gemfile_ref = ManifestRef::new(ManifestKind::GemfileLock, "Gemfile.lock");
    let _ = gem::parse_gemfile_lock(text, &gemfile_ref);
});
