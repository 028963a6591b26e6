use rule_syntax::{Program, Rule};

/// Splits multi-head rules into single-head rules sharing the same body,
/// when legal. A split is illegal when an existential variable occurs in
/// more than one head atom: the heads must then be emitted together so that
/// they agree on the witness, and the rule is kept whole.
pub fn rewrite_multiple_heads(program: Program) -> Program {
    program
        .into_iter()
        .flat_map(|rule| {
            if rule.heads.len() <= 1 || shares_existential_across_heads(&rule) {
                return vec![rule];
            }

            rule.heads
                .iter()
                .map(|head| Rule {
                    heads: vec![head.clone()],
                    body: rule.body.clone(),
                })
                .collect()
        })
        .collect()
}

fn shares_existential_across_heads(rule: &Rule) -> bool {
    rule.existential_variables().iter().any(|existential| {
        let occurrences = rule
            .heads
            .iter()
            .filter(|head| {
                head.terms
                    .iter()
                    .any(|term| term.variable_name() == Some(existential))
            })
            .count();

        occurrences > 1
    })
}
