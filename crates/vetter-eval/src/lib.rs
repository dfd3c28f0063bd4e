//! Fact projection and the CEL-based policy expression evaluator.
//!
//! [`fact::project`] turns a [`vetter_core::Package`] into the frozen
//! [`fact::Fact`] schema; [`program::Evaluator`] hosts a bounded set of
//! compiled [`program::FilterProgram`]s and runs them against a `Fact`;
//! [`suite::FilterSuite`] loads a severity-tagged group of filters from
//! YAML.

pub mod error;
pub mod fact;
pub mod program;
pub mod suite;
mod value;

pub use error::{EvalError, Result};
pub use fact::{project, Fact};
pub use program::{EvalMatch, Evaluator, FilterProgram, DEFAULT_MAX_PROGRAMS};
pub use suite::{CheckType, FilterSuite, Severity, SuiteMatch};
