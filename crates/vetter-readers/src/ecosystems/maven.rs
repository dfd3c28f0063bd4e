//! `pom.xml` parsing for the Maven ecosystem.
//!
//! Only the direct `<dependencies>` declared on the project itself are
//! read; resolving a full reactor build (parent POMs, dependency
//! management imports, transitive resolution) is out of scope.

use quick_xml::events::Event;
use quick_xml::Reader;
use vetter_core::{Ecosystem, ManifestRef, Package};

#[derive(Default)]
struct Dependency {
    group_id: Option<String>,
    artifact_id: Option<String>,
    version: Option<String>,
}

impl Dependency {
    fn into_package(self, manifest: &ManifestRef) -> Option<Package> {
        let group_id = self.group_id?;
        let artifact_id = self.artifact_id?;
        let name = format!("{group_id}:{artifact_id}");
        let version = self.version.unwrap_or_default();
        Some(Package::new(Ecosystem::Maven, name, version, manifest.clone()))
    }
}

pub fn parse_pom_xml(contents: &str, manifest: &ManifestRef) -> anyhow::Result<Vec<Package>> {
    let mut reader = Reader::from_str(contents);
    reader.config_mut().trim_text(true);

    let mut packages = Vec::new();
    let mut tag_stack: Vec<String> = Vec::new();
    let mut current: Option<Dependency> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if name == "dependency" && in_dependencies(&tag_stack) {
                    current = Some(Dependency::default());
                }
                tag_stack.push(name);
            }
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if name == "dependency" {
                    if let Some(dep) = current.take() {
                        if let Some(pkg) = dep.into_package(manifest) {
                            packages.push(pkg);
                        }
                    }
                }
                tag_stack.pop();
            }
            Event::Text(e) => {
                if let Some(dep) = current.as_mut() {
                    let text = e.unescape()?.into_owned();
                    match tag_stack.last().map(String::as_str) {
                        Some("groupId") => dep.group_id = Some(text),
                        Some("artifactId") => dep.artifact_id = Some(text),
                        Some("version") => dep.version = Some(text),
                        _ => {}
                    }
                }
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(packages)
}

/// `<dependency>` only counts as a direct project dependency when it is a
/// child of the top-level `<project><dependencies>`, not one nested under
/// `<dependencyManagement>` or a plugin configuration block.
fn in_dependencies(tag_stack: &[String]) -> bool {
    tag_stack.last().map(String::as_str) == Some("dependencies")
        && !tag_stack.iter().any(|t| t == "dependencyManagement")
}
