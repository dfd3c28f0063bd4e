//! Binds a [`Fact`] directly into a CEL [`Context`] as native values
//! (maps, lists, ints, strings) rather than round-tripping through JSON —
//! the fact-projection approach the design notes prefer over the source
//! system's JSON-then-generic-map technique.

use std::collections::HashMap;
use std::sync::Arc;

use cel_interpreter::objects::{Key, Map as CelMap};
use cel_interpreter::{Context, Value};

use crate::error::EvalError;
use crate::fact::{Fact, ProjectFact, VulnRef};

fn map_value(entries: Vec<(&str, Value)>) -> Value {
    let mut map = HashMap::with_capacity(entries.len());
    for (k, v) in entries {
        map.insert(Key::String(Arc::new(k.to_string())), v);
    }
    Value::Map(CelMap { map: Arc::new(map) })
}

fn string_value(s: &str) -> Value {
    Value::String(Arc::new(s.to_string()))
}

fn vuln_ref_value(v: &VulnRef) -> Value {
    map_value(vec![("id", string_value(&v.id)), ("cve", string_value(&v.cve))])
}

fn vuln_list_value(refs: &[VulnRef]) -> Value {
    Value::List(Arc::new(refs.iter().map(vuln_ref_value).collect()))
}

fn project_value(p: &ProjectFact) -> Value {
    map_value(vec![
        ("name", string_value(&p.name)),
        ("type", string_value(&p.host_type)),
        ("stars", Value::Int(p.stars as i64)),
        ("forks", Value::Int(p.forks as i64)),
        ("issues", Value::Int(p.issues as i64)),
    ])
}

fn pkg_value(fact: &Fact) -> Value {
    map_value(vec![
        ("ecosystem", string_value(&fact.pkg.ecosystem)),
        ("name", string_value(&fact.pkg.name)),
        ("version", string_value(&fact.pkg.version)),
    ])
}

fn vulns_value(fact: &Fact) -> Value {
    map_value(vec![
        ("all", vuln_list_value(&fact.vulns.all)),
        ("critical", vuln_list_value(&fact.vulns.critical)),
        ("high", vuln_list_value(&fact.vulns.high)),
        ("medium", vuln_list_value(&fact.vulns.medium)),
        ("low", vuln_list_value(&fact.vulns.low)),
    ])
}

fn scorecard_value(fact: &Fact) -> Value {
    let mut scores = HashMap::with_capacity(fact.scorecard.scores.len());
    for (name, score) in &fact.scorecard.scores {
        scores.insert(Key::String(Arc::new(name.clone())), Value::Float(*score as f64));
    }
    map_value(vec![
        ("score", Value::Float(fact.scorecard.score as f64)),
        ("scores", Value::Map(CelMap { map: Arc::new(scores) })),
    ])
}

fn projects_value(fact: &Fact) -> Value {
    Value::List(Arc::new(fact.projects.iter().map(project_value).collect()))
}

fn licenses_value(fact: &Fact) -> Value {
    Value::List(Arc::new(fact.licenses.iter().map(|l| string_value(l)).collect()))
}

/// Builds the evaluation [`Context`] for one [`Fact`], binding the five
/// root variables plus `_` per §4.4's variable contract.
pub fn build_context(fact: &Fact) -> Result<Context<'static>, EvalError> {
    let pkg = pkg_value(fact);
    let vulns = vulns_value(fact);
    let scorecard = scorecard_value(fact);
    let projects = projects_value(fact);
    let licenses = licenses_value(fact);

    let root = map_value(vec![
        ("pkg", pkg.clone()),
        ("vulns", vulns.clone()),
        ("scorecard", scorecard.clone()),
        ("projects", projects.clone()),
        ("licenses", licenses.clone()),
    ]);

    let mut context = Context::default();
    context
        .add_variable("pkg", pkg)
        .map_err(|source| EvalError::Binding(source.to_string()))?;
    context
        .add_variable("vulns", vulns)
        .map_err(|source| EvalError::Binding(source.to_string()))?;
    context
        .add_variable("scorecard", scorecard)
        .map_err(|source| EvalError::Binding(source.to_string()))?;
    context
        .add_variable("projects", projects)
        .map_err(|source| EvalError::Binding(source.to_string()))?;
    context
        .add_variable("licenses", licenses)
        .map_err(|source| EvalError::Binding(source.to_string()))?;
    context
        .add_variable("_", root)
        .map_err(|source| EvalError::Binding(source.to_string()))?;

    Ok(context)
}
