mod engine;
mod evaluation;
mod interning;
mod loading;
mod rewriting;

pub mod error;
pub mod logging;

pub use engine::chase::ChaseReport;
pub use engine::reasoner::Reasoner;
pub use error::ReasonerError;
pub use evaluation::query::{QueryAnswers, QueryTerm, TextAnswers};
pub use interning::dictionary::{ConstantId, PredicateId};
pub use ::rule_syntax::*;
pub use ::rule_syntax_macros::{program, rule};
