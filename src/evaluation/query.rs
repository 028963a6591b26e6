//! Pattern queries against the fact store. A pattern mixes bound constants
//! with variable slots; evaluation scans the predicate's relation lazily and
//! yields one binding per matching tuple. Answers borrow the session, so
//! releasing the evaluator is the drop at the end of the borrow's scope.

use crate::engine::storage::{FactStorage, Tuple};
use crate::interning::dictionary::{ConstantId, Dictionary};

/// One slot of a query pattern. Variables are caller-chosen indices; using
/// the same index in several positions requires those positions to agree
/// (join semantics within the query).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryTerm {
    Constant(ConstantId),
    Variable(usize),
}

/// Positions of the distinct variables in a pattern, in order of first
/// occurrence. Bindings are reported in this order.
pub(crate) fn variable_positions(terms: &[QueryTerm]) -> Vec<(usize, usize)> {
    let mut out: Vec<(usize, usize)> = vec![];
    for (position, term) in terms.iter().enumerate() {
        if let QueryTerm::Variable(index) = term {
            if !out.iter().any(|(seen, _)| seen == index) {
                out.push((*index, position));
            }
        }
    }

    out
}

/// Checks a tuple against a pattern: bound positions must match exactly and
/// repeated variables must take the same value everywhere.
pub(crate) fn pattern_match(terms: &[QueryTerm], tuple: &[ConstantId]) -> bool {
    let mut assigned: Vec<(usize, ConstantId)> = vec![];

    for (term, value) in terms.iter().zip(tuple.iter()) {
        match term {
            QueryTerm::Constant(constant) => {
                if constant != value {
                    return false;
                }
            }
            QueryTerm::Variable(index) => {
                match assigned.iter().find(|(seen, _)| seen == index) {
                    Some((_, existing)) if existing != value => return false,
                    Some(_) => {}
                    None => assigned.push((*index, *value)),
                }
            }
        }
    }

    true
}

/// Lazy answer stream at the integer level. Each item carries the values of
/// the pattern's distinct variables, in order of first occurrence.
pub struct QueryAnswers<'a> {
    terms: Vec<QueryTerm>,
    projection: Vec<(usize, usize)>,
    scan: Option<indexmap::set::Iter<'a, Tuple>>,
}

impl<'a> QueryAnswers<'a> {
    pub(crate) fn new(relation: Option<&'a FactStorage>, terms: Vec<QueryTerm>) -> Self {
        let projection = variable_positions(&terms);

        Self {
            terms,
            projection,
            scan: relation.map(|facts| facts.iter()),
        }
    }

    pub(crate) fn empty(terms: Vec<QueryTerm>) -> Self {
        Self::new(None, terms)
    }
}

impl<'a> Iterator for QueryAnswers<'a> {
    type Item = Vec<ConstantId>;

    fn next(&mut self) -> Option<Self::Item> {
        let scan = self.scan.as_mut()?;

        for tuple in scan {
            if pattern_match(&self.terms, tuple) {
                return Some(
                    self.projection
                        .iter()
                        .map(|(_, position)| tuple[*position])
                        .collect(),
                );
            }
        }

        None
    }
}

/// Text-level answer stream: wraps `QueryAnswers` with id→text translation.
pub struct TextAnswers<'a> {
    pub(crate) inner: QueryAnswers<'a>,
    pub(crate) dictionary: &'a Dictionary,
}

impl<'a> Iterator for TextAnswers<'a> {
    type Item = Vec<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let binding = self.inner.next()?;

        Some(
            binding
                .into_iter()
                .map(|id| {
                    self.dictionary
                        .constant_text(id)
                        .unwrap_or_else(|| format!("_:unknown{}", id))
                })
                .collect(),
        )
    }
}
