use thiserror::Error;

#[derive(Debug, Error)]
pub enum EvalError {
    #[error("failed to compile filter {name:?}: {source}")]
    Compile {
        name: String,
        #[source]
        source: cel_interpreter::ParseError,
    },
    #[error("filter {name:?} failed to evaluate: {source}")]
    Execution {
        name: String,
        #[source]
        source: cel_interpreter::ExecutionError,
    },
    #[error("filter {name:?} did not evaluate to a boolean result (got {actual})")]
    NonBoolean { name: String, actual: String },
    #[error("failed to bind fact variable into evaluation context: {0}")]
    Binding(String),
    #[error("evaluator already holds the maximum of {max} registered programs")]
    TooManyPrograms { max: usize },
    #[error("failed to read filter suite file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse filter suite file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, EvalError>;
