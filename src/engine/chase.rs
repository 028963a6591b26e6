//! Semi-naive chase: repeatedly joins rule bodies against the fact store and
//! inserts the grounded heads until a round derives nothing new.
//!
//! Two head semantics are supported. Under the skolem chase every satisfying
//! body binding fires, with existential head variables witnessed by
//! deterministic fresh constants. Under the restricted chase a head atom
//! containing existential variables never introduces a witness: either an
//! existing fact already satisfies it, or the head does not fire for that
//! binding (the oblivious exact-match variant).

use ahash::RandomState;
use indexmap::IndexMap;
use log::{debug, info, trace};

use crate::engine::rewrite::{unify, InternedRule, Rewrite};
use crate::engine::storage::{ArityViolation, FactStorage, RelationStorage, Tuple};
use crate::interning::dictionary::{Dictionary, PredicateId};
use crate::interning::hash::new_random_state;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChaseReport {
    /// Rounds run, including the final empty one that proves the fixpoint.
    pub rounds: usize,
    /// Tuples derived beyond the state the chase started from.
    pub derived: usize,
}

/// An arity violation found while inserting a derived head tuple.
pub(crate) struct HeadArityViolation {
    pub predicate: PredicateId,
    pub violation: ArityViolation,
}

type Deltas = IndexMap<PredicateId, FactStorage, RandomState>;

pub(crate) fn run_chase(
    dictionary: &mut Dictionary,
    storage: &mut RelationStorage,
    rules: &[InternedRule],
    skolem: bool,
) -> Result<ChaseReport, HeadArityViolation> {
    // Round one treats the whole store as the delta, which degenerates to a
    // naive evaluation over the current state.
    let mut deltas: Deltas = IndexMap::with_hasher(new_random_state());
    for (predicate, relation) in &storage.inner {
        deltas.insert(*predicate, relation.facts.clone());
    }

    let mut report = ChaseReport {
        rounds: 0,
        derived: 0,
    };

    loop {
        report.rounds += 1;
        let mut derived: Vec<(PredicateId, Tuple)> = vec![];

        for rule in rules {
            let before = derived.len();
            for binding in satisfy_body(storage, &deltas, rule) {
                fire_heads(dictionary, rule, binding, skolem, &mut derived);
            }
            trace!(
                "rule {} produced {} candidate tuples in round {}",
                rule.id,
                derived.len() - before,
                report.rounds
            );
        }

        let mut fresh: Deltas = IndexMap::with_hasher(new_random_state());
        for (predicate, tuple) in derived {
            let newly_added = storage
                .insert(predicate, tuple.clone())
                .map_err(|violation| HeadArityViolation {
                    predicate,
                    violation,
                })?;
            if newly_added {
                fresh
                    .entry(predicate)
                    .or_insert_with(|| FactStorage::with_hasher(new_random_state()))
                    .insert(tuple);
            }
        }

        let added: usize = fresh.values().map(|facts| facts.len()).sum();
        report.derived += added;
        debug!("chase round {} added {} tuples", report.rounds, added);

        if added == 0 {
            break;
        }
        deltas = fresh;
    }

    info!(
        "chase reached fixpoint after {} rounds, {} tuples derived, {} stored",
        report.rounds,
        report.derived,
        storage.fact_count()
    );

    Ok(report)
}

/// Evaluates a rule body as a conjunctive join, requiring at least one atom
/// to match a tuple from the previous round's delta. Bindings are grown one
/// body atom at a time, unifying the partially-rewritten atom against each
/// candidate tuple.
fn satisfy_body(
    storage: &RelationStorage,
    deltas: &Deltas,
    rule: &InternedRule,
) -> Vec<Rewrite> {
    let mut bindings: Vec<Rewrite> = vec![];

    for delta_position in 0..rule.body.len() {
        let delta_predicate = rule.body[delta_position].symbol;
        let delta_is_empty = deltas
            .get(&delta_predicate)
            .map(|facts| facts.is_empty())
            .unwrap_or(true);
        if delta_is_empty {
            continue;
        }

        let mut partial = vec![Rewrite::default()];
        for (position, atom) in rule.body.iter().enumerate() {
            let mut extended = vec![];

            for binding in &partial {
                let rewritten = binding.apply(&atom.terms);
                let candidates: Box<dyn Iterator<Item = &Tuple>> = if position == delta_position {
                    match deltas.get(&atom.symbol) {
                        Some(facts) => Box::new(facts.iter()),
                        None => Box::new(std::iter::empty()),
                    }
                } else {
                    Box::new(storage.scan(atom.symbol))
                };

                for fact in candidates {
                    if let Some(unification) = unify(&rewritten, fact) {
                        let mut extended_binding = binding.clone();
                        extended_binding.extend(unification);
                        extended.push(extended_binding);
                    }
                }
            }

            partial = extended;
            if partial.is_empty() {
                break;
            }
        }

        bindings.append(&mut partial);
    }

    bindings
}

/// Grounds and emits every head atom for one satisfying body binding. All
/// heads of a multi-head rule share the binding (and, under skolem, the same
/// witnesses), so they are emitted together.
fn fire_heads(
    dictionary: &mut Dictionary,
    rule: &InternedRule,
    mut binding: Rewrite,
    skolem: bool,
    derived: &mut Vec<(PredicateId, Tuple)>,
) {
    if skolem {
        let frontier: Vec<_> = (0..rule.body_variable_count)
            .filter_map(|variable| binding.get(variable))
            .collect();
        for variable in rule.existential_variables() {
            let witness = dictionary.intern_skolem((rule.id, variable, frontier.clone()));
            binding.insert((variable, witness));
        }
    }

    for head in &rule.heads {
        if !skolem && head.has_variable_at_or_above(rule.body_variable_count) {
            // Restricted semantics: if a stored fact already satisfies the
            // bound positions the head is satisfied, otherwise it does not
            // fire. Either way no tuple is produced.
            continue;
        }

        if let Some(tuple) = binding.ground(&head.terms) {
            derived.push((head.symbol, tuple));
        }
    }
}
