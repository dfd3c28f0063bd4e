//! `Gemfile.lock` parsing for the RubyGems ecosystem.

use vetter_core::{Ecosystem, ManifestRef, Package};

/// The `GEM` section's `specs:` block lists each resolved gem at 4-space
/// indentation as `name (version)`, with its own dependencies nested one
/// level deeper (6 spaces) — those nested lines are skipped, they name
/// constraints, not resolved packages.
pub fn parse_gemfile_lock(contents: &str, manifest: &ManifestRef) -> anyhow::Result<Vec<Package>> {
    let mut packages = Vec::new();
    let mut in_gem_section = false;
    let mut in_specs = false;

    for line in contents.lines() {
        if line == "GEM" {
            in_gem_section = true;
            in_specs = false;
            continue;
        }
        if in_gem_section && line.trim_end() == "  specs:" {
            in_specs = true;
            continue;
        }
        if in_gem_section && !line.starts_with(' ') {
            // a new top-level section (PLATFORMS, DEPENDENCIES, ...) ends GEM
            in_gem_section = false;
            in_specs = false;
            continue;
        }
        if !in_specs {
            continue;
        }
        // top-level gem lines are exactly 4 spaces deep; deeper indentation
        // is a nested dependency constraint, not a resolved package.
        let indent = line.len() - line.trim_start().len();
        if indent != 4 {
            continue;
        }
        if let Some(pkg) = parse_spec_line(line.trim(), manifest) {
            packages.push(pkg);
        }
    }

    Ok(packages)
}

fn parse_spec_line(line: &str, manifest: &ManifestRef) -> Option<Package> {
    let open = line.find('(')?;
    let close = line.find(')')?;
    if close <= open {
        return None;
    }
    let name = line[..open].trim().to_string();
    let version = line[open + 1..close].trim().to_string();
    if name.is_empty() {
        return None;
    }
    Some(Package::new(Ecosystem::RubyGems, name, version, manifest.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vetter_core::ManifestKind;

    #[test]
    fn parses_top_level_specs_and_skips_nested_dependencies() {
        let contents = "\
GEM
  remote: https://rubygems.org/
  specs:
    rack (2.2.3)
    rails (7.0.4)
      actioncable (= 7.0.4)
      actionpack (= 7.0.4)

PLATFORMS
  ruby

DEPENDENCIES
  rails (~> 7.0)
";
        let manifest = ManifestRef::new(ManifestKind::GemfileLock, "Gemfile.lock");
        let packages = parse_gemfile_lock(contents, &manifest).unwrap();
        assert_eq!(packages.len(), 2);
        assert_eq!(packages[0].name, "rack");
        assert_eq!(packages[0].version, "2.2.3");
        assert_eq!(packages[1].name, "rails");
        assert_eq!(packages[1].version, "7.0.4");
    }
}
