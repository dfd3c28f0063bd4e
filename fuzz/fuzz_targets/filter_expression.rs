//! Fuzzes `FilterProgram::compile` against arbitrary CEL source, and
//! evaluates any program that does compile against a fixed fact — these
//! expressions come from filter/suite files a user controls, so a crash
//! here would be a policy-engine vulnerability, not just a bad input.

#![no_main]

use libfuzzer_sys::fuzz_target;
use vetter_core::{Ecosystem, ManifestKind, ManifestRef, Package};
use vetter_eval::{project, FilterProgram};

fuzz_target!(|data: &[u8]| {
    let Ok(expr) = std::str::from_utf8(data) else {
        return;
    };

    let Ok(program) = FilterProgram::compile("fuzz", expr) else {
        return;
    };

    let package = Package::new(
        Ecosystem::PyPI,
        "django",
        "2.0.0",
        ManifestRef::new(ManifestKind::RequirementsTxt, "requirements.txt"),
    );
    let fact = project(&package);
    let _ = program.evaluate(&fact, true);
});
