use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("filter compile error: {0}")]
    Eval(#[from] vetter_eval::EvalError),
    #[error(transparent)]
    Io(std::io::Error),
    #[error("failed to parse exceptions YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// A fatal analyzer error, as distinct from a non-fatal one logged and
    /// skipped by the scanner driver per §4.3.
    #[error("analyzer {analyzer} failed fatally: {source}")]
    Fatal {
        analyzer: String,
        #[source]
        source: anyhow::Error,
    },
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
