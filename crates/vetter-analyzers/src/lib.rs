//! The Analyzer Chain: the [`Analyzer`] trait, its built-in variants, the
//! process-wide [`Verdict`] tracker, and [`ExceptionSet`] suppression.
//!
//! Analyzers are the bridge between the compiled policy evaluator
//! (`vetter-eval`) and the reporter fan-out (`vetter-reports`): they
//! consume enriched packages, evaluate policy against each one's Filter
//! Fact, and emit [`events::FilterMatchEvent`]s plus verdict state.

pub mod analyzer;
pub mod error;
pub mod events;
pub mod exception_generator;
pub mod exceptions;
pub mod expression_filter;
pub mod expression_suite;
mod test_support;
pub mod verdict;

pub use analyzer::{Analyzer, AnalyzerContext};
pub use error::{AnalyzerError, Result};
pub use events::FilterMatchEvent;
pub use exception_generator::ExceptionGeneratorAnalyzer;
pub use exceptions::{ExceptionRecord, ExceptionSet};
pub use expression_filter::ExpressionFilterAnalyzer;
pub use expression_suite::ExpressionSuiteAnalyzer;
pub use verdict::Verdict;
