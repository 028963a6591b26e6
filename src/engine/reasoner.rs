//! The reasoner: one active session at a time over a dictionary, a fact
//! store and a rule set. A session is started from some EDB source, rules
//! are loaded wholesale, `materialize` runs the chase to fixpoint, and
//! queries stream bindings against whatever the store currently holds.

use std::path::Path;

use log::info;
use rule_syntax::{parse_rule, Program};

use crate::engine::chase::{run_chase, ChaseReport};
use crate::engine::rewrite::{intern_rule, InternedRule};
use crate::engine::storage::RelationStorage;
use crate::error::{ReasonerError, Result};
use crate::evaluation::query::{QueryAnswers, QueryTerm, TextAnswers};
use crate::interning::dictionary::{ConstantId, Dictionary, PredicateId};
use crate::loading::edb;
use crate::rewriting::heads::rewrite_multiple_heads;

struct Session {
    dictionary: Dictionary,
    storage: RelationStorage,
    rules: Option<Vec<InternedRule>>,
}

impl Session {
    fn new() -> Self {
        Self {
            dictionary: Dictionary::new(),
            storage: RelationStorage::new(),
            rules: None,
        }
    }
}

/// A reasoning engine instance. Multiple independent instances may coexist
/// in one process; each holds at most one active session.
///
/// Mutation (starting, loading, materializing) takes `&mut self` while
/// queries take `&self`, so the borrow checker enforces the
/// exclusive-writer/shared-readers discipline: queries never observe a
/// partially-applied chase round.
pub struct Reasoner {
    session: Option<Session>,
}

impl Reasoner {
    pub fn new() -> Self {
        Self { session: None }
    }

    fn session(&self) -> Result<&Session> {
        self.session.as_ref().ok_or(ReasonerError::NotStarted)
    }

    fn session_mut(&mut self) -> Result<&mut Session> {
        self.session.as_mut().ok_or(ReasonerError::NotStarted)
    }

    fn begin(&mut self) -> Result<&mut Session> {
        if self.session.is_some() {
            return Err(ReasonerError::AlreadyStarted);
        }
        Ok(self.session.get_or_insert_with(Session::new))
    }

    /// Starts a session with no initial facts; populate it with `insert`.
    pub fn start_empty(&mut self) -> Result<()> {
        self.begin()?;

        Ok(())
    }

    /// Starts a session from an inline EDB configuration string
    /// (`predicate = file.csv` per line, relative paths resolved against
    /// the working directory).
    pub fn start(&mut self, edb_config: &str) -> Result<()> {
        let session = self.begin()?;
        let outcome = edb::load_config(
            edb_config,
            None,
            &mut session.dictionary,
            &mut session.storage,
        );
        self.finish_start(outcome)
    }

    /// Starts a session from an EDB configuration file; relative CSV paths
    /// are resolved against the file's directory.
    pub fn start_from_config_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let base = path.parent().map(Path::to_path_buf);

        let session = self.begin()?;
        let outcome = edb::load_config(
            &text,
            base.as_deref(),
            &mut session.dictionary,
            &mut session.storage,
        );
        self.finish_start(outcome)
    }

    /// Starts a session from a directory of CSV files, one per predicate.
    pub fn start_from_csv_directory(&mut self, directory: impl AsRef<Path>) -> Result<()> {
        let session = self.begin()?;
        let outcome = edb::load_csv_directory(
            directory.as_ref(),
            &mut session.dictionary,
            &mut session.storage,
        );
        self.finish_start(outcome)
    }

    // A failed load must not leave a half-initialized session behind.
    fn finish_start(&mut self, outcome: Result<usize>) -> Result<()> {
        match outcome {
            Ok(_) => Ok(()),
            Err(error) => {
                self.session = None;
                Err(error)
            }
        }
    }

    /// Stops the session, releasing the dictionary, store and rules.
    /// Idempotent: stopping a stopped reasoner does nothing.
    pub fn stop(&mut self) {
        if self.session.take().is_some() {
            info!("reasoner session stopped");
        }
    }

    pub fn is_started(&self) -> bool {
        self.session.is_some()
    }

    /// Adds one fact to the running session, returning whether it was new.
    pub fn insert(&mut self, predicate: &str, tuple: &[&str]) -> Result<bool> {
        let session = self.session_mut()?;
        let symbol = session.dictionary.intern_predicate(predicate);
        let encoded = tuple
            .iter()
            .map(|text| session.dictionary.intern_constant(text))
            .collect();

        session
            .storage
            .insert(symbol, encoded)
            .map_err(|violation| ReasonerError::ArityMismatch {
                predicate: predicate.to_string(),
                expected: violation.expected,
                actual: violation.actual,
            })
    }

    pub fn predicate_id(&self, name: &str) -> Result<Option<PredicateId>> {
        Ok(self.session()?.dictionary.predicate_id(name))
    }

    pub fn predicate_name(&self, id: PredicateId) -> Result<Option<&str>> {
        Ok(self.session()?.dictionary.predicate_name(id))
    }

    pub fn constant_id(&self, text: &str) -> Result<Option<ConstantId>> {
        Ok(self.session()?.dictionary.constant_id(text))
    }

    pub fn constant_text(&self, id: ConstantId) -> Result<Option<String>> {
        Ok(self.session()?.dictionary.constant_text(id))
    }

    /// Parses and loads rules, replacing any previously loaded set. The load
    /// is all-or-nothing: on a parse error the previous rules stay in place.
    pub fn set_rules(&mut self, rule_texts: &[&str], rewrite_heads: bool) -> Result<()> {
        let mut program: Program = Vec::with_capacity(rule_texts.len());
        for text in rule_texts {
            program.push(parse_rule(text)?);
        }

        self.set_program(program, rewrite_heads)
    }

    /// Loads rules from a file, one per line; blank lines and `#` comments
    /// are skipped.
    pub fn set_rules_from_file(
        &mut self,
        path: impl AsRef<Path>,
        rewrite_heads: bool,
    ) -> Result<()> {
        let text = std::fs::read_to_string(path)?;
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .collect();

        self.set_rules(&lines, rewrite_heads)
    }

    /// Loads an already-built program, replacing the previous rule set.
    pub fn set_program(&mut self, program: Program, rewrite_heads: bool) -> Result<()> {
        let session = self.session_mut()?;
        let program = if rewrite_heads {
            rewrite_multiple_heads(program)
        } else {
            program
        };

        let rules = program
            .iter()
            .enumerate()
            .map(|(id, rule)| intern_rule(rule, id, &mut session.dictionary))
            .collect::<Vec<_>>();
        info!("rule set replaced: {} rules", rules.len());
        session.rules = Some(rules);

        Ok(())
    }

    /// Runs the chase to fixpoint, materializing every derivable fact into
    /// the store. With `skolem` existential head variables are witnessed by
    /// deterministic fresh constants; without it they never fire. Blocking;
    /// re-runnable (a rerun with nothing changed derives nothing).
    ///
    /// A chase failure leaves the store partially derived, so it is fatal to
    /// the session: the session is stopped and must be started afresh.
    pub fn materialize(&mut self, skolem: bool) -> Result<ChaseReport> {
        let session = self.session_mut()?;
        let rules = session.rules.as_ref().ok_or(ReasonerError::RulesNotLoaded)?;

        match run_chase(
            &mut session.dictionary,
            &mut session.storage,
            rules,
            skolem,
        ) {
            Ok(report) => Ok(report),
            Err(head) => {
                let error = ReasonerError::ArityMismatch {
                    predicate: session
                        .dictionary
                        .predicate_name(head.predicate)
                        .unwrap_or("?")
                        .to_string(),
                    expected: head.violation.expected,
                    actual: head.violation.actual,
                };
                self.session = None;
                Err(error)
            }
        }
    }

    /// Integer-level query: scans the predicate's relation and yields one
    /// binding per matching tuple, lazily. An unknown or empty predicate
    /// yields an empty stream; a term-count mismatch against an established
    /// arity is an error.
    pub fn query(
        &self,
        predicate: PredicateId,
        terms: &[QueryTerm],
    ) -> Result<QueryAnswers<'_>> {
        let session = self.session()?;

        if let Some(arity) = session.storage.arity(predicate) {
            if arity != terms.len() {
                return Err(ReasonerError::ArityMismatch {
                    predicate: session
                        .dictionary
                        .predicate_name(predicate)
                        .unwrap_or("?")
                        .to_string(),
                    expected: arity,
                    actual: terms.len(),
                });
            }
        }

        Ok(QueryAnswers::new(
            session.storage.relation(predicate),
            terms.to_vec(),
        ))
    }

    /// Text-level query: a term starting with `?` is a variable (the same
    /// name reused joins within the query); anything else is a constant
    /// looked up in the dictionary without interning. Unknown predicates or
    /// constants yield an empty stream.
    pub fn query_text(&self, predicate: &str, terms: &[&str]) -> Result<TextAnswers<'_>> {
        let session = self.session()?;

        let symbol = session.dictionary.predicate_id(predicate);
        let mut variables: Vec<&str> = vec![];
        let mut pattern: Vec<QueryTerm> = Vec::with_capacity(terms.len());
        let mut unknown_constant = false;

        for term in terms {
            if let Some(name) = term.strip_prefix('?') {
                let index = match variables.iter().position(|seen| *seen == name) {
                    Some(index) => index,
                    None => {
                        variables.push(name);
                        variables.len() - 1
                    }
                };
                pattern.push(QueryTerm::Variable(index));
            } else {
                match session.dictionary.constant_id(term) {
                    Some(id) => pattern.push(QueryTerm::Constant(id)),
                    None => unknown_constant = true,
                }
            }
        }

        let inner = match symbol {
            Some(symbol) if !unknown_constant => self.query(symbol, &pattern)?,
            // Nothing can match a constant the dictionary has never seen.
            _ => QueryAnswers::empty(pattern),
        };

        Ok(TextAnswers {
            inner,
            dictionary: &session.dictionary,
        })
    }
}

impl Default for Reasoner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn edge_path_reasoner() -> Reasoner {
        let mut reasoner = Reasoner::new();
        reasoner.start_empty().unwrap();
        reasoner.insert("edge", &["1", "2"]).unwrap();
        reasoner.insert("edge", &["2", "3"]).unwrap();
        reasoner
            .set_rules(&["path(X, Z) :- edge(X, Y), edge(Y, Z)"], false)
            .unwrap();

        reasoner
    }

    #[test]
    fn test_end_to_end_edge_path() {
        let mut reasoner = edge_path_reasoner();
        reasoner.materialize(false).unwrap();

        let all: HashSet<Vec<String>> = reasoner
            .query_text("path", &["?X", "?Y"])
            .unwrap()
            .collect();
        let expected: HashSet<Vec<String>> =
            vec![vec!["1".to_string(), "3".to_string()]].into_iter().collect();
        assert_eq!(all, expected);

        let bindings: Vec<Vec<String>> = reasoner
            .query_text("path", &["?A", "3"])
            .unwrap()
            .collect();
        assert_eq!(bindings, vec![vec!["1".to_string()]]);
    }

    #[test]
    fn test_query_before_materialization_sees_only_edb() {
        let reasoner = edge_path_reasoner();

        let edges: Vec<Vec<String>> = reasoner
            .query_text("edge", &["?X", "?Y"])
            .unwrap()
            .collect();
        assert_eq!(edges.len(), 2);

        let paths: Vec<Vec<String>> = reasoner
            .query_text("path", &["?X", "?Y"])
            .unwrap()
            .collect();
        assert!(paths.is_empty());
    }

    #[test]
    fn test_materialization_is_idempotent() {
        let mut reasoner = edge_path_reasoner();

        let first = reasoner.materialize(false).unwrap();
        assert_eq!(first.derived, 1);
        let second = reasoner.materialize(false).unwrap();
        assert_eq!(second.derived, 0);
    }

    #[test]
    fn test_materialize_after_adding_facts_redoes_fixpoint() {
        let mut reasoner = edge_path_reasoner();
        reasoner.materialize(false).unwrap();

        reasoner.insert("edge", &["3", "4"]).unwrap();
        reasoner.materialize(false).unwrap();

        let paths: HashSet<Vec<String>> = reasoner
            .query_text("path", &["?X", "?Y"])
            .unwrap()
            .collect();
        assert!(paths.contains(&vec!["2".to_string(), "4".to_string()]));
        assert_eq!(paths.len(), 2);
    }

    #[test]
    fn test_restricted_vs_skolem_divergence() {
        let program = &["hasDoctor(X, D) :- patient(X)"];

        let mut restricted = Reasoner::new();
        restricted.start_empty().unwrap();
        restricted.insert("patient", &["alice"]).unwrap();
        restricted.insert("patient", &["bob"]).unwrap();
        restricted.set_rules(program, false).unwrap();
        restricted.materialize(false).unwrap();
        let restricted_answers: Vec<Vec<String>> = restricted
            .query_text("hasDoctor", &["?P", "?D"])
            .unwrap()
            .collect();
        assert!(restricted_answers.is_empty());

        let mut skolem = Reasoner::new();
        skolem.start_empty().unwrap();
        skolem.insert("patient", &["alice"]).unwrap();
        skolem.insert("patient", &["bob"]).unwrap();
        skolem.set_rules(program, false).unwrap();
        skolem.materialize(true).unwrap();
        let skolem_answers: Vec<Vec<String>> = skolem
            .query_text("hasDoctor", &["?P", "?D"])
            .unwrap()
            .collect();
        assert_eq!(skolem_answers.len(), 2);
        // One fresh witness per distinct binding, disjoint from user text.
        let witnesses: HashSet<&String> =
            skolem_answers.iter().map(|binding| &binding[1]).collect();
        assert_eq!(witnesses.len(), 2);
        assert!(witnesses.iter().all(|w| w.starts_with("_:sk")));
    }

    #[test]
    fn test_skolem_witness_text_is_queryable() {
        let mut reasoner = Reasoner::new();
        reasoner.start_empty().unwrap();
        reasoner.insert("patient", &["alice"]).unwrap();
        reasoner.insert("patient", &["bob"]).unwrap();
        reasoner
            .set_rules(&["hasDoctor(X, D) :- patient(X)"], false)
            .unwrap();
        reasoner.materialize(true).unwrap();

        let bindings: Vec<Vec<String>> = reasoner
            .query_text("hasDoctor", &["alice", "?D"])
            .unwrap()
            .collect();
        assert_eq!(bindings.len(), 1);
        let witness = bindings[0][0].clone();
        assert!(witness.starts_with("_:sk"));

        // The rendered witness binds back to the same fact.
        let round_trip: Vec<Vec<String>> = reasoner
            .query_text("hasDoctor", &["?P", &witness])
            .unwrap()
            .collect();
        assert_eq!(round_trip, vec![vec!["alice".to_string()]]);
    }

    #[test]
    fn test_start_twice_fails_stop_twice_is_noop() {
        let mut reasoner = Reasoner::new();
        reasoner.start_empty().unwrap();

        assert!(matches!(
            reasoner.start_empty(),
            Err(ReasonerError::AlreadyStarted)
        ));

        reasoner.stop();
        reasoner.stop();
        assert!(!reasoner.is_started());

        // After a stop, starting again is fine.
        reasoner.start_empty().unwrap();
        assert!(reasoner.is_started());
    }

    #[test]
    fn test_operations_before_start_fail() {
        let reasoner = Reasoner::new();

        assert!(matches!(
            reasoner.predicate_id("edge"),
            Err(ReasonerError::NotStarted)
        ));
        assert!(matches!(
            reasoner.query_text("edge", &["?X", "?Y"]),
            Err(ReasonerError::NotStarted)
        ));

        let mut reasoner = Reasoner::new();
        assert!(matches!(
            reasoner.set_rules(&["q(X) :- p(X)"], false),
            Err(ReasonerError::NotStarted)
        ));
        assert!(matches!(
            reasoner.materialize(false),
            Err(ReasonerError::NotStarted)
        ));
    }

    #[test]
    fn test_materialize_before_rules_fails() {
        let mut reasoner = Reasoner::new();
        reasoner.start_empty().unwrap();

        assert!(matches!(
            reasoner.materialize(false),
            Err(ReasonerError::RulesNotLoaded)
        ));
    }

    #[test]
    fn test_failed_materialization_is_fatal_to_the_session() {
        let mut reasoner = Reasoner::new();
        reasoner.start_empty().unwrap();
        reasoner.insert("edge", &["1", "2"]).unwrap();
        reasoner.insert("p", &["a"]).unwrap();
        // The second rule derives unary tuples into the binary edge relation.
        reasoner
            .set_rules(&["q(X) :- p(X)", "edge(X) :- p(X)"], false)
            .unwrap();

        assert!(matches!(
            reasoner.materialize(false),
            Err(ReasonerError::ArityMismatch { .. })
        ));

        // The store is partially derived at this point, so the session is
        // gone: nothing can be queried until a fresh start.
        assert!(!reasoner.is_started());
        assert!(matches!(
            reasoner.query_text("q", &["?X"]),
            Err(ReasonerError::NotStarted)
        ));
        reasoner.start_empty().unwrap();
    }

    #[test]
    fn test_rule_load_is_all_or_nothing() {
        let mut reasoner = edge_path_reasoner();

        let result = reasoner.set_rules(
            &["ok(X) :- edge(X, Y)", "broken(X) : edge(X, Y)"],
            false,
        );
        assert!(matches!(result, Err(ReasonerError::RuleParse(_))));

        // The previous rule set is still in force.
        reasoner.materialize(false).unwrap();
        let paths: Vec<Vec<String>> = reasoner
            .query_text("path", &["?X", "?Y"])
            .unwrap()
            .collect();
        assert_eq!(paths.len(), 1);
        assert!(reasoner.predicate_id("ok").unwrap().is_none());
    }

    #[test]
    fn test_dictionary_surface() {
        let reasoner = {
            let mut r = edge_path_reasoner();
            r.materialize(false).unwrap();
            r
        };

        let edge = reasoner.predicate_id("edge").unwrap().unwrap();
        assert_eq!(reasoner.predicate_name(edge).unwrap(), Some("edge"));
        assert_eq!(reasoner.predicate_id("nonexistent").unwrap(), None);

        let one = reasoner.constant_id("1").unwrap().unwrap();
        assert_eq!(reasoner.constant_text(one).unwrap(), Some("1".to_string()));
        assert_eq!(reasoner.constant_id("zebra").unwrap(), None);
    }

    #[test]
    fn test_integer_level_query() {
        let mut reasoner = edge_path_reasoner();
        reasoner.materialize(false).unwrap();

        let edge = reasoner.predicate_id("edge").unwrap().unwrap();
        let two = reasoner.constant_id("2").unwrap().unwrap();

        let answers: Vec<Vec<ConstantId>> = reasoner
            .query(edge, &[QueryTerm::Variable(0), QueryTerm::Constant(two)])
            .unwrap()
            .collect();
        let one = reasoner.constant_id("1").unwrap().unwrap();
        assert_eq!(answers, vec![vec![one]]);
    }

    #[test]
    fn test_query_arity_mismatch() {
        let reasoner = edge_path_reasoner();
        let edge = reasoner.predicate_id("edge").unwrap().unwrap();

        assert!(matches!(
            reasoner.query(edge, &[QueryTerm::Variable(0)]),
            Err(ReasonerError::ArityMismatch { .. })
        ));
    }

    #[test]
    fn test_unknown_predicate_and_constant_yield_empty() {
        let reasoner = edge_path_reasoner();

        let unknown_predicate: Vec<Vec<String>> = reasoner
            .query_text("ghost", &["?X"])
            .unwrap()
            .collect();
        assert!(unknown_predicate.is_empty());

        let unknown_constant: Vec<Vec<String>> = reasoner
            .query_text("edge", &["?X", "99"])
            .unwrap()
            .collect();
        assert!(unknown_constant.is_empty());
    }

    #[test]
    fn test_repeated_query_variable_joins() {
        let mut reasoner = Reasoner::new();
        reasoner.start_empty().unwrap();
        reasoner.insert("likes", &["narcissus", "narcissus"]).unwrap();
        reasoner.insert("likes", &["echo", "narcissus"]).unwrap();

        let self_likers: Vec<Vec<String>> = reasoner
            .query_text("likes", &["?X", "?X"])
            .unwrap()
            .collect();
        assert_eq!(self_likers, vec![vec!["narcissus".to_string()]]);
    }

    #[test]
    fn test_multi_head_rewrite_through_the_engine() {
        let mut reasoner = Reasoner::new();
        reasoner.start_empty().unwrap();
        reasoner.insert("p", &["a"]).unwrap();
        reasoner
            .set_rules(&["q(X), r(X) :- p(X)"], true)
            .unwrap();
        reasoner.materialize(false).unwrap();

        let q: Vec<Vec<String>> = reasoner.query_text("q", &["?X"]).unwrap().collect();
        let r: Vec<Vec<String>> = reasoner.query_text("r", &["?X"]).unwrap().collect();
        assert_eq!(q, vec![vec!["a".to_string()]]);
        assert_eq!(r, vec![vec!["a".to_string()]]);
    }

    #[test]
    fn test_macro_built_program() {
        use rule_syntax_macros::program;

        let tc_program = program! {
            tc(?x, ?y) <- [e(?x, ?y)],
            tc(?x, ?z) <- [e(?x, ?y), tc(?y, ?z)]
        };

        let mut reasoner = Reasoner::new();
        reasoner.start_empty().unwrap();
        for edge in [["1", "2"], ["2", "3"], ["3", "4"]] {
            reasoner.insert("e", &edge).unwrap();
        }
        reasoner.set_program(tc_program, false).unwrap();
        reasoner.materialize(false).unwrap();

        let all: HashSet<Vec<String>> = reasoner
            .query_text("tc", &["?x", "?y"])
            .unwrap()
            .collect();
        let expected: HashSet<Vec<String>> = [
            ["1", "2"], ["2", "3"], ["3", "4"],
            ["1", "3"], ["2", "4"],
            ["1", "4"],
        ]
        .into_iter()
        .map(|pair| pair.into_iter().map(str::to_string).collect())
        .collect();
        assert_eq!(all, expected);
    }

    #[test]
    fn test_macro_built_rule() {
        use rule_syntax_macros::rule;

        let reachability = rule! { reachable(?x, ?y) <- [edge(?x, ?y)] };

        let mut reasoner = Reasoner::new();
        reasoner.start_empty().unwrap();
        reasoner.insert("edge", &["1", "2"]).unwrap();
        reasoner.set_program(vec![reachability], false).unwrap();
        reasoner.materialize(false).unwrap();

        let all: Vec<Vec<String>> = reasoner
            .query_text("reachable", &["?x", "?y"])
            .unwrap()
            .collect();
        assert_eq!(all, vec![vec!["1".to_string(), "2".to_string()]]);
    }

    #[test]
    fn test_csv_directory_scenario() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("prescription.csv")).unwrap();
        writeln!(file, "1,alice,186,x").unwrap();
        writeln!(file, "2,bob,72,y").unwrap();
        drop(file);

        let mut reasoner = Reasoner::new();
        reasoner.start_from_csv_directory(dir.path()).unwrap();

        let answers: Vec<Vec<String>> = reasoner
            .query_text("prescription", &["?ID", "?PATIENT", "186", "?C1"])
            .unwrap()
            .collect();
        assert_eq!(
            answers,
            vec![vec![
                "1".to_string(),
                "alice".to_string(),
                "x".to_string()
            ]]
        );
    }

    #[test]
    fn test_start_from_config_file() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("edge.csv"), "1,2\n2,3\n").unwrap();
        let config_path = dir.path().join("edb.conf");
        let mut config = std::fs::File::create(&config_path).unwrap();
        writeln!(config, "# edb sources").unwrap();
        writeln!(config, "edge = edge.csv").unwrap();
        drop(config);

        let mut reasoner = Reasoner::new();
        reasoner.start_from_config_file(&config_path).unwrap();

        let edges: Vec<Vec<String>> = reasoner
            .query_text("edge", &["?X", "?Y"])
            .unwrap()
            .collect();
        assert_eq!(edges.len(), 2);
    }

    #[test]
    fn test_failed_start_leaves_reasoner_stopped() {
        let mut reasoner = Reasoner::new();
        let result = reasoner.start("edge = /nonexistent/edge.csv");

        assert!(result.is_err());
        assert!(!reasoner.is_started());
        // And a fresh start still works.
        reasoner.start_empty().unwrap();
    }

    #[test]
    fn test_rules_from_file() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let rules_path = dir.path().join("rules.dlog");
        let mut file = std::fs::File::create(&rules_path).unwrap();
        writeln!(file, "# transitive closure").unwrap();
        writeln!(file, "tc(X, Y) :- e(X, Y)").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "tc(X, Z) :- e(X, Y), tc(Y, Z)").unwrap();
        drop(file);

        let mut reasoner = Reasoner::new();
        reasoner.start_empty().unwrap();
        reasoner.insert("e", &["a", "b"]).unwrap();
        reasoner.insert("e", &["b", "c"]).unwrap();
        reasoner.set_rules_from_file(&rules_path, false).unwrap();
        reasoner.materialize(false).unwrap();

        let all: Vec<Vec<String>> = reasoner
            .query_text("tc", &["?X", "?Y"])
            .unwrap()
            .collect();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_insert_arity_mismatch() {
        let mut reasoner = Reasoner::new();
        reasoner.start_empty().unwrap();
        reasoner.insert("edge", &["1", "2"]).unwrap();

        assert!(matches!(
            reasoner.insert("edge", &["1", "2", "3"]),
            Err(ReasonerError::ArityMismatch { .. })
        ));
    }
}
