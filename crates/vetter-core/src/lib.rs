//! Core types shared across the vetter workspace.
//!
//! This crate has no knowledge of how packages are discovered, enriched,
//! evaluated or reported — it only defines the entities those stages pass
//! between each other: [`Package`], [`Manifest`] and [`Insight`].

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A recognized package registry.
///
/// `Other` preserves whatever string a reader found so unrecognized
/// ecosystems still round-trip through the dump format instead of being
/// dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ecosystem {
    Npm,
    PyPI,
    Cargo,
    Maven,
    Go,
    RubyGems,
    NuGet,
    Other(String),
}

impl Ecosystem {
    pub fn as_str(&self) -> &str {
        match self {
            Ecosystem::Npm => "npm",
            Ecosystem::PyPI => "pypi",
            Ecosystem::Cargo => "cargo",
            Ecosystem::Maven => "maven",
            Ecosystem::Go => "go",
            Ecosystem::RubyGems => "rubygems",
            Ecosystem::NuGet => "nuget",
            Ecosystem::Other(s) => s,
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "npm" => Ecosystem::Npm,
            "pypi" | "pip" => Ecosystem::PyPI,
            "cargo" | "crates.io" => Ecosystem::Cargo,
            "maven" => Ecosystem::Maven,
            "go" | "golang" => Ecosystem::Go,
            "rubygems" | "gem" => Ecosystem::RubyGems,
            "nuget" => Ecosystem::NuGet,
            other => Ecosystem::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of manifest a [`Manifest`] was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ManifestKind {
    RequirementsTxt,
    PoetryLock,
    PackageLockJson,
    PackageJson,
    CargoLock,
    PomXml,
    GoSum,
    GemfileLock,
    /// A directory treated as a single logical project (used by the dump
    /// reader and by directories that contain no recognized lockfile).
    Directory,
    /// A previously produced JSON dump, replayed without re-enrichment.
    Dump,
}

impl ManifestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ManifestKind::RequirementsTxt => "requirements.txt",
            ManifestKind::PoetryLock => "poetry.lock",
            ManifestKind::PackageLockJson => "package-lock.json",
            ManifestKind::PackageJson => "package.json",
            ManifestKind::CargoLock => "Cargo.lock",
            ManifestKind::PomXml => "pom.xml",
            ManifestKind::GoSum => "go.sum",
            ManifestKind::GemfileLock => "Gemfile.lock",
            ManifestKind::Directory => "directory",
            ManifestKind::Dump => "dump",
        }
    }
}

/// Where a package was discovered: the manifest's kind and filesystem path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestRef {
    pub kind: ManifestKind,
    pub path: PathBuf,
}

impl ManifestRef {
    pub fn new(kind: ManifestKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }
}

/// The identity of a package: `(ecosystem, name, version)`.
///
/// Two packages with the same key are the same enrichment subject even if
/// they were discovered in different manifests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageKey {
    pub ecosystem: Ecosystem,
    pub name: String,
    pub version: String,
}

impl std::fmt::Display for PackageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pkg:{}/{}@{}", self.ecosystem, self.name, self.version)
    }
}

/// A package discovered in a manifest, optionally enriched with an
/// [`Insight`].
///
/// `insight` is `None` until enrichment runs (or if enrichment failed or
/// was skipped); it is never partially populated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    pub ecosystem: Ecosystem,
    pub name: String,
    pub version: String,
    pub manifest: ManifestRef,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub insight: Option<Insight>,
}

impl Package {
    pub fn new(
        ecosystem: Ecosystem,
        name: impl Into<String>,
        version: impl Into<String>,
        manifest: ManifestRef,
    ) -> Self {
        Self {
            ecosystem,
            name: name.into(),
            version: version.into(),
            manifest,
            insight: None,
        }
    }

    pub fn key(&self) -> PackageKey {
        PackageKey {
            ecosystem: self.ecosystem.clone(),
            name: self.name.clone(),
            version: self.version.clone(),
        }
    }

    pub fn with_insight(mut self, insight: Insight) -> Self {
        self.insight = Some(insight);
        self
    }
}

/// A file or logical group discovered on disk, carrying the packages found
/// inside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub kind: ManifestKind,
    pub path: PathBuf,
    pub packages: Vec<Package>,
}

impl Manifest {
    pub fn new(kind: ManifestKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
            packages: Vec::new(),
        }
    }

    pub fn manifest_ref(&self) -> ManifestRef {
        ManifestRef::new(self.kind, self.path.clone())
    }
}

/// The scheme a [`SeverityEntry`] reports a score under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeverityScheme {
    #[serde(rename = "CVSSv2")]
    CvssV2,
    #[serde(rename = "CVSSv3")]
    CvssV3,
    Other(String),
}

/// Coarse risk level, ordered `Unknown < Low < Medium < High < Critical` so
/// callers can take the max across a list of severities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Unknown,
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RiskLevel::Unknown => "unknown",
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeverityEntry {
    pub scheme: SeverityScheme,
    pub risk: RiskLevel,
}

/// A known vulnerability affecting a package, as reported by the insights
/// service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vulnerability {
    pub id: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub severities: Vec<SeverityEntry>,
}

impl Vulnerability {
    /// The CVE form of this vulnerability's identity, if it has one: the id
    /// itself when it is already a CVE, otherwise the first CVE-shaped
    /// alias.
    pub fn cve(&self) -> Option<&str> {
        if self.id.starts_with("CVE-") {
            return Some(&self.id);
        }
        self.aliases.iter().map(String::as_str).find(|a| a.starts_with("CVE-"))
    }

    /// The highest risk level across this vulnerability's severities,
    /// `Unknown` if none were reported.
    pub fn max_risk(&self) -> RiskLevel {
        self.severities
            .iter()
            .map(|s| s.risk)
            .max()
            .unwrap_or(RiskLevel::Unknown)
    }
}

/// The kind of host a [`SourceProject`] lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProjectHost {
    Github,
    Unknown,
}

/// Source repository metadata for a package, as reported by the insights
/// service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceProject {
    pub name: String,
    #[serde(rename = "type")]
    pub host: ProjectHost,
    #[serde(default)]
    pub stars: i32,
    #[serde(default)]
    pub forks: i32,
    #[serde(default)]
    pub issues: i32,
}

/// OpenSSF Scorecard signal for a package.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scorecard {
    pub score: f32,
    #[serde(default)]
    pub scores: std::collections::HashMap<String, f32>,
}

/// Enrichment payload attached to a [`Package`] once the enricher has run.
///
/// Every field defaults to its empty form; a missing field from the
/// insights service is not an error, it is simply absent data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Insight {
    #[serde(default)]
    pub vulnerabilities: Vec<Vulnerability>,
    #[serde(default)]
    pub projects: Vec<SourceProject>,
    #[serde(default)]
    pub scorecard: Option<Scorecard>,
    #[serde(default)]
    pub licenses: Vec<String>,
}

impl Insight {
    pub fn is_empty(&self) -> bool {
        self.vulnerabilities.is_empty()
            && self.projects.is_empty()
            && self.scorecard.is_none()
            && self.licenses.is_empty()
    }
}
