use ahash::RandomState;
use indexmap::IndexSet;

use crate::interning::hash::new_random_state;

/// Predicate names intern to small integers, stable for the session.
pub type PredicateId = usize;

/// Constant identifiers are wide: fact stores hold far more distinct
/// constants than predicates.
pub type ConstantId = u64;

/// Constants at or above this id are skolem-generated witnesses. User
/// constants are interned below it, so the two id spaces never collide.
pub const SKOLEM_BASE: ConstantId = 1 << 63;

/// Identity of a skolem witness: the rule that created it, the existential
/// variable it stands for, and the body binding it was created under.
/// Interning by this key makes fresh-value allocation deterministic: the
/// same rule firing on the same binding always yields the same constant.
pub type SkolemKey = (usize, usize, Vec<ConstantId>);

/// Bidirectional mapping between predicate names / constant texts and their
/// integer ids. Append-only: nothing is ever removed during a session, and
/// ids are positions in insertion-ordered sets, so the mapping is a bijection
/// by construction.
pub struct Dictionary {
    predicates: IndexSet<String, RandomState>,
    constants: IndexSet<String, RandomState>,
    skolems: IndexSet<SkolemKey, RandomState>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self {
            predicates: IndexSet::with_hasher(new_random_state()),
            constants: IndexSet::with_hasher(new_random_state()),
            skolems: IndexSet::with_hasher(new_random_state()),
        }
    }

    pub fn intern_predicate(&mut self, name: &str) -> PredicateId {
        if let Some(id) = self.predicates.get_index_of(name) {
            return id;
        }

        self.predicates.insert_full(name.to_string()).0
    }

    pub fn predicate_id(&self, name: &str) -> Option<PredicateId> {
        self.predicates.get_index_of(name)
    }

    pub fn predicate_name(&self, id: PredicateId) -> Option<&str> {
        self.predicates.get_index(id).map(String::as_str)
    }

    pub fn intern_constant(&mut self, text: &str) -> ConstantId {
        if let Some(id) = self.constants.get_index_of(text) {
            return id as ConstantId;
        }

        self.constants.insert_full(text.to_string()).0 as ConstantId
    }

    /// The `_:sk<n>` form is reserved for skolem witnesses and resolves back
    /// to the reserved id range, so answers containing witnesses can be fed
    /// into later queries.
    pub fn constant_id(&self, text: &str) -> Option<ConstantId> {
        if let Some(rest) = text.strip_prefix("_:sk") {
            let index: usize = rest.parse().ok()?;
            if index < self.skolems.len() {
                return Some(SKOLEM_BASE + index as ConstantId);
            }
            return None;
        }

        self.constants.get_index_of(text).map(|id| id as ConstantId)
    }

    pub fn constant_text(&self, id: ConstantId) -> Option<String> {
        if id >= SKOLEM_BASE {
            let index = (id - SKOLEM_BASE) as usize;
            if index >= self.skolems.len() {
                return None;
            }
            return Some(format!("_:sk{}", index));
        }

        self.constants.get_index(id as usize).cloned()
    }

    pub fn intern_skolem(&mut self, key: SkolemKey) -> ConstantId {
        let index = self.skolems.insert_full(key).0;

        SKOLEM_BASE + index as ConstantId
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}
