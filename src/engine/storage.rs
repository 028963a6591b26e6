use ahash::RandomState;
use indexmap::{IndexMap, IndexSet};

use crate::interning::dictionary::{ConstantId, PredicateId};
use crate::interning::hash::new_random_state;

pub type Tuple = Vec<ConstantId>;
pub type FactStorage = IndexSet<Tuple, RandomState>;

/// The first tuple inserted into a relation fixes its arity.
pub struct Relation {
    pub arity: usize,
    pub facts: FactStorage,
}

/// Raised when a tuple's length disagrees with its relation's arity; the
/// session layer attaches the predicate name before surfacing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArityViolation {
    pub expected: usize,
    pub actual: usize,
}

pub struct RelationStorage {
    pub(crate) inner: IndexMap<PredicateId, Relation, RandomState>,
}

impl RelationStorage {
    pub fn new() -> Self {
        Self {
            inner: IndexMap::with_hasher(new_random_state()),
        }
    }

    /// Adds a tuple, returning whether it was newly added. Inserting an
    /// existing tuple is a no-op; the chase relies on the returned flag to
    /// detect its fixpoint.
    pub fn insert(
        &mut self,
        predicate: PredicateId,
        tuple: Tuple,
    ) -> Result<bool, ArityViolation> {
        if let Some(relation) = self.inner.get_mut(&predicate) {
            if relation.arity != tuple.len() {
                return Err(ArityViolation {
                    expected: relation.arity,
                    actual: tuple.len(),
                });
            }

            return Ok(relation.facts.insert(tuple));
        }

        let mut facts = FactStorage::with_hasher(new_random_state());
        let arity = tuple.len();
        facts.insert(tuple);
        self.inner.insert(predicate, Relation { arity, facts });

        Ok(true)
    }

    pub fn contains(&self, predicate: PredicateId, tuple: &[ConstantId]) -> bool {
        if let Some(relation) = self.inner.get(&predicate) {
            return relation.facts.contains(tuple);
        }

        false
    }

    /// Lazily walks a relation's tuples in a stable order. A fresh call
    /// starts a fresh scan; the borrow rules prevent mutation while one is
    /// in flight.
    pub fn scan(&self, predicate: PredicateId) -> impl Iterator<Item = &Tuple> {
        self.inner
            .get(&predicate)
            .into_iter()
            .flat_map(|relation| relation.facts.iter())
    }

    pub fn arity(&self, predicate: PredicateId) -> Option<usize> {
        self.inner.get(&predicate).map(|relation| relation.arity)
    }

    pub fn relation(&self, predicate: PredicateId) -> Option<&FactStorage> {
        self.inner.get(&predicate).map(|relation| &relation.facts)
    }

    pub fn fact_count(&self) -> usize {
        self.inner.values().map(|relation| relation.facts.len()).sum()
    }
}

impl Default for RelationStorage {
    fn default() -> Self {
        Self::new()
    }
}
