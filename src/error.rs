use std::path::PathBuf;

use rule_syntax::RuleParseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReasonerError {
    #[error("the reasoner has not been started")]
    NotStarted,
    #[error("the reasoner is already started; stop it before starting again")]
    AlreadyStarted,
    #[error("no rules have been loaded")]
    RulesNotLoaded,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    RuleParse(#[from] RuleParseError),
    #[error("arity mismatch for predicate {predicate}: expected {expected} terms, got {actual}")]
    ArityMismatch {
        predicate: String,
        expected: usize,
        actual: usize,
    },
    #[error("failed to read csv file {path:?}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("malformed edb configuration at line {line}: {text:?}")]
    EdbConfig { line: usize, text: String },
}

pub type Result<T> = std::result::Result<T, ReasonerError>;
