//! The Filter Fact: a pure, read-only projection of a [`Package`] plus its
//! [`Insight`] into the nested structure defined by the external fact
//! schema. Field names and numeric types here are a frozen contract —
//! users reference them directly in filter expressions.

use vetter_core::{Package, RiskLevel};

#[derive(Debug, Clone, PartialEq)]
pub struct VulnRef {
    pub id: String,
    pub cve: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VulnBuckets {
    pub all: Vec<VulnRef>,
    pub critical: Vec<VulnRef>,
    pub high: Vec<VulnRef>,
    pub medium: Vec<VulnRef>,
    pub low: Vec<VulnRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PkgFact {
    pub ecosystem: String,
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScorecardFact {
    pub score: f32,
    pub scores: std::collections::HashMap<String, f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectFact {
    pub name: String,
    pub host_type: String,
    pub stars: i32,
    pub forks: i32,
    pub issues: i32,
}

/// The fully projected fact handed to the expression evaluator. Mirrors
/// §6's `pkg`/`vulns`/`scorecard`/`projects`/`licenses` schema exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct Fact {
    pub pkg: PkgFact,
    pub vulns: VulnBuckets,
    pub scorecard: ScorecardFact,
    pub projects: Vec<ProjectFact>,
    pub licenses: Vec<String>,
}

/// Projects a [`Package`] (and its optional [`Insight`]) into a [`Fact`].
/// Pure: never touches the network or the filesystem. A package with no
/// Insight (enrichment absent or failed) projects to empty vuln/project/
/// license/scorecard facts — `pkg.name` is still available.
pub fn project(package: &Package) -> Fact {
    let pkg = PkgFact {
        ecosystem: package.ecosystem.as_str().to_string(),
        name: package.name.clone(),
        version: package.version.clone(),
    };

    let Some(insight) = &package.insight else {
        return Fact {
            pkg,
            vulns: VulnBuckets::default(),
            scorecard: ScorecardFact::default(),
            projects: Vec::new(),
            licenses: Vec::new(),
        };
    };

    let mut vulns = VulnBuckets::default();
    for vuln in &insight.vulnerabilities {
        let entry = VulnRef {
            id: vuln.id.clone(),
            cve: vuln.cve().unwrap_or_default().to_string(),
        };
        vulns.all.push(entry.clone());
        match vuln.max_risk() {
            RiskLevel::Critical => vulns.critical.push(entry),
            RiskLevel::High => vulns.high.push(entry),
            RiskLevel::Medium => vulns.medium.push(entry),
            RiskLevel::Low => vulns.low.push(entry),
            RiskLevel::Unknown => {}
        }
    }

    let scorecard = insight
        .scorecard
        .as_ref()
        .map(|s| ScorecardFact {
            score: s.score,
            scores: s.scores.clone(),
        })
        .unwrap_or_default();

    let projects = insight
        .projects
        .iter()
        .map(|p| ProjectFact {
            name: p.name.clone(),
            host_type: match p.host {
                vetter_core::ProjectHost::Github => "GITHUB".to_string(),
                vetter_core::ProjectHost::Unknown => "UNKNOWN".to_string(),
            },
            stars: p.stars,
            forks: p.forks,
            issues: p.issues,
        })
        .collect();

    Fact {
        pkg,
        vulns,
        scorecard,
        projects,
        licenses: insight.licenses.clone(),
    }
}
