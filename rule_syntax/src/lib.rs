use std::fmt::{Debug, Formatter};

mod parser;
pub use parser::{parse_atom, parse_rule, RuleParseError};

#[derive(Ord, PartialOrd, Eq, PartialEq, Clone, Hash)]
pub enum Term {
    Variable(String),
    Constant(String),
}

impl Debug for Term {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Variable(x) => write!(f, "?{}", x),
            Term::Constant(x) => x.fmt(f),
        }
    }
}

impl Term {
    pub fn variable_name(&self) -> Option<&str> {
        match self {
            Term::Variable(name) => Some(name),
            Term::Constant(_) => None,
        }
    }
}

#[derive(Ord, PartialOrd, Eq, PartialEq, Clone, Hash)]
pub struct Atom {
    pub terms: Vec<Term>,
    pub symbol: String,
}

impl Debug for Atom {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(", &self.symbol)?;

        for (index, term) in self.terms.iter().enumerate() {
            write!(f, "{:?}", term)?;
            if index < self.terms.len() - 1 {
                write!(f, ", ")?;
            }
        }

        write!(f, ")")
    }
}

/// A rule with one or more head atoms and a conjunctive body. A head variable
/// that does not occur in the body is existential: under the skolem chase it
/// is witnessed by a fresh constant, under the restricted chase it blocks the
/// head from firing.
#[derive(Ord, PartialOrd, Eq, PartialEq, Clone, Hash)]
pub struct Rule {
    pub heads: Vec<Atom>,
    pub body: Vec<Atom>,
}

impl Debug for Rule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (index, atom) in self.heads.iter().enumerate() {
            write!(f, "{:?}", atom)?;
            if index < self.heads.len() - 1 {
                write!(f, ", ")?;
            }
        }
        write!(f, " <- [")?;
        for (index, atom) in self.body.iter().enumerate() {
            write!(f, "{:?}", atom)?;
            if index < self.body.len() - 1 {
                write!(f, ", ")?;
            }
        }

        write!(f, "]")
    }
}

impl Rule {
    /// Variables that occur in some head atom but nowhere in the body.
    pub fn existential_variables(&self) -> Vec<&str> {
        let mut out: Vec<&str> = vec![];
        for head in &self.heads {
            for term in &head.terms {
                if let Some(name) = term.variable_name() {
                    let in_body = self.body.iter().any(|atom| {
                        atom.terms
                            .iter()
                            .any(|t| t.variable_name() == Some(name))
                    });
                    if !in_body && !out.contains(&name) {
                        out.push(name);
                    }
                }
            }
        }

        out
    }
}

pub type Program = Vec<Rule>;
