use ahash::{HashMap, HashMapExt};
use rule_syntax::{Rule, Term};

use crate::interning::dictionary::{ConstantId, Dictionary, PredicateId};
use crate::engine::storage::Tuple;

#[derive(Ord, PartialOrd, Eq, PartialEq, Clone, Hash, Debug)]
pub enum InternedTerm {
    Variable(usize),
    Constant(ConstantId),
}

#[derive(Ord, PartialOrd, Eq, PartialEq, Clone, Hash, Debug)]
pub struct InternedAtom {
    pub terms: Vec<InternedTerm>,
    pub symbol: PredicateId,
}

impl InternedAtom {
    pub fn has_variable_at_or_above(&self, threshold: usize) -> bool {
        self.terms.iter().any(|term| match term {
            InternedTerm::Variable(index) => *index >= threshold,
            InternedTerm::Constant(_) => false,
        })
    }
}

/// A rule over integer-encoded atoms. Variables are rule-local indices
/// assigned body-first, so an index at or above `body_variable_count`
/// belongs to an existential head variable.
#[derive(Ord, PartialOrd, Eq, PartialEq, Clone, Hash, Debug)]
pub struct InternedRule {
    pub id: usize,
    pub heads: Vec<InternedAtom>,
    pub body: Vec<InternedAtom>,
    pub body_variable_count: usize,
    pub variable_count: usize,
}

impl InternedRule {
    pub fn existential_variables(&self) -> impl Iterator<Item = usize> {
        self.body_variable_count..self.variable_count
    }
}

fn intern_terms(
    terms: &[Term],
    variable_ids: &mut HashMap<String, usize>,
    dictionary: &mut Dictionary,
) -> Vec<InternedTerm> {
    terms
        .iter()
        .map(|term| match term {
            Term::Variable(name) => {
                let next = variable_ids.len();
                InternedTerm::Variable(*variable_ids.entry(name.clone()).or_insert(next))
            }
            Term::Constant(text) => InternedTerm::Constant(dictionary.intern_constant(text)),
        })
        .collect()
}

pub fn intern_rule(rule: &Rule, id: usize, dictionary: &mut Dictionary) -> InternedRule {
    let mut variable_ids: HashMap<String, usize> = HashMap::new();

    // Body atoms first: this gives body variables the low indices, and head
    // variables beyond `body_variable_count` are thereby existential.
    let body = rule
        .body
        .iter()
        .map(|atom| InternedAtom {
            terms: intern_terms(&atom.terms, &mut variable_ids, dictionary),
            symbol: dictionary.intern_predicate(&atom.symbol),
        })
        .collect::<Vec<_>>();
    let body_variable_count = variable_ids.len();

    let heads = rule
        .heads
        .iter()
        .map(|atom| InternedAtom {
            terms: intern_terms(&atom.terms, &mut variable_ids, dictionary),
            symbol: dictionary.intern_predicate(&atom.symbol),
        })
        .collect::<Vec<_>>();

    InternedRule {
        id,
        heads,
        body,
        body_variable_count,
        variable_count: variable_ids.len(),
    }
}

pub type Substitution = (usize, ConstantId);

/// A partial assignment of rule-local variables to constants, built up one
/// body atom at a time while joining.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Rewrite {
    pub inner: Vec<Substitution>,
}

impl Rewrite {
    pub fn get(&self, key: usize) -> Option<ConstantId> {
        for sub in &self.inner {
            if sub.0 == key {
                return Some(sub.1);
            }
        }

        None
    }

    pub fn insert(&mut self, value: Substitution) {
        if self.get(value.0).is_none() {
            self.inner.push(value)
        }
    }

    pub fn extend(&mut self, other: Self) {
        other.inner.into_iter().for_each(|sub| {
            self.insert(sub);
        })
    }

    pub fn apply(&self, atom: &[InternedTerm]) -> Vec<InternedTerm> {
        atom.iter()
            .map(|term| {
                if let InternedTerm::Variable(identifier) = term {
                    if let Some(constant) = self.get(*identifier) {
                        return InternedTerm::Constant(constant);
                    }
                }

                term.clone()
            })
            .collect()
    }

    /// Grounds an atom into a tuple; `None` if some variable is unbound.
    pub fn ground(&self, atom: &[InternedTerm]) -> Option<Tuple> {
        atom.iter()
            .map(|term| match term {
                InternedTerm::Variable(identifier) => self.get(*identifier),
                InternedTerm::Constant(constant) => Some(*constant),
            })
            .collect()
    }
}

/// Matches an atom pattern against a ground tuple, returning the variable
/// substitutions on success. Repeated variables must agree.
pub fn unify(left: &[InternedTerm], right: &[ConstantId]) -> Option<Rewrite> {
    if left.len() != right.len() {
        return None;
    }

    let mut rewrite: Rewrite = Default::default();

    for (left_term, right_constant) in left.iter().zip(right.iter()) {
        match left_term {
            InternedTerm::Constant(constant) if constant != right_constant => return None,
            InternedTerm::Variable(variable) => {
                if let Some(existing) = rewrite.get(*variable) {
                    if existing != *right_constant {
                        return None;
                    }
                } else {
                    rewrite.insert((*variable, *right_constant));
                }
            }
            _ => {}
        }
    }

    Some(rewrite)
}
