//! Rewriting formulas into equivalent ones over smaller sets of operators.
//! Each normal form is reached through the previous one.

use crate::types::*;
use once_cell::sync::Lazy;

fn table(entries: &[(Operator, &str)]) -> OperatorTable {
  let mut table = OperatorTable::default();
  for &(op, template) in entries {
    table[op] = Some(Formula::parse(template))
  }
  table
}

static NOT_AND_OR: Lazy<OperatorTable> = Lazy::new(|| {
  table(&[
    (Operator::T, "(p|~p)"),
    (Operator::F, "(p&~p)"),
    (Operator::Implies, "(~p|q)"),
    (Operator::Xor, "((p&~q)|(~p&q))"),
    (Operator::Iff, "((p&q)|(~p&~q))"),
    (Operator::Nand, "~(p&q)"),
    (Operator::Nor, "~(p|q)"),
  ])
});
static NOT_AND: Lazy<OperatorTable> = Lazy::new(|| table(&[(Operator::Or, "~(~p&~q)")]));
static NAND: Lazy<OperatorTable> =
  Lazy::new(|| table(&[(Operator::And, "((p-&q)-&(p-&q))"), (Operator::Not, "(p-&p)")]));
static IMPLIES_NOT: Lazy<OperatorTable> = Lazy::new(|| table(&[(Operator::And, "~(p->~q)")]));
static IMPLIES_FALSE: Lazy<OperatorTable> = Lazy::new(|| table(&[(Operator::Not, "(p->F)")]));

/// An equivalent formula using only `~`, `&` and `|`.
pub fn to_not_and_or(formula: &Formula) -> Formula { formula.substitute_operators(&NOT_AND_OR) }

/// An equivalent formula using only `~` and `&`.
pub fn to_not_and(formula: &Formula) -> Formula {
  to_not_and_or(formula).substitute_operators(&NOT_AND)
}

/// An equivalent formula using only `-&`.
pub fn to_nand(formula: &Formula) -> Formula { to_not_and(formula).substitute_operators(&NAND) }

/// An equivalent formula using only `->` and `~`.
pub fn to_implies_not(formula: &Formula) -> Formula {
  to_not_and(formula).substitute_operators(&IMPLIES_NOT)
}

/// An equivalent formula using only `->` and `F`.
pub fn to_implies_false(formula: &Formula) -> Formula {
  to_implies_not(formula).substitute_operators(&IMPLIES_FALSE)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::semantics::{all_models, evaluate};
  use quickcheck::{quickcheck, TestResult};
  use std::collections::BTreeSet;

  fn depth(f: &Formula) -> usize {
    1 + f.first().into_iter().chain(f.second()).map(depth).max().unwrap_or(0)
  }

  /// Rewriting constants may introduce the template variable `p`, so
  /// compare over the variables of both formulas.
  fn equivalent(f: &Formula, g: &Formula) -> bool {
    let vars: BTreeSet<Var> = f.variables().into_iter().chain(g.variables()).collect();
    all_models(&vars).all(|m| evaluate(f, &m) == evaluate(g, &m))
  }

  fn uses_only(f: &Formula, ops: &[Operator]) -> bool {
    f.operators().iter().all(|op| ops.contains(op))
  }

  #[test]
  fn examples() {
    let f = Formula::parse("(p->q)");
    assert_eq!(to_not_and_or(&f).to_string(), "(~p|q)");
    assert_eq!(to_not_and(&f).to_string(), "~(~~p&~q)");
    assert_eq!(to_implies_not(&Formula::parse("(x&y)")).to_string(), "~(x->~y)");
    assert_eq!(to_implies_false(&Formula::parse("~x")).to_string(), "(x->F)");
    assert_eq!(to_nand(&Formula::parse("~x")).to_string(), "(x-&x)");
    assert_eq!(to_not_and_or(&Formula::parse("T")).to_string(), "(p|~p)");
  }

  quickcheck! {
    fn not_and_or(f: Formula) -> bool {
      let g = to_not_and_or(&f);
      uses_only(&g, &[Operator::Not, Operator::And, Operator::Or]) && equivalent(&f, &g)
    }

    fn not_and(f: Formula) -> bool {
      let g = to_not_and(&f);
      uses_only(&g, &[Operator::Not, Operator::And]) && equivalent(&f, &g)
    }

    fn nand(f: Formula) -> TestResult {
      // every `&` doubles its operands
      if depth(&f) > 3 {
        return TestResult::discard()
      }
      let g = to_nand(&f);
      TestResult::from_bool(uses_only(&g, &[Operator::Nand]) && equivalent(&f, &g))
    }

    fn implies_not(f: Formula) -> bool {
      let g = to_implies_not(&f);
      uses_only(&g, &[Operator::Implies, Operator::Not]) && equivalent(&f, &g)
    }

    fn implies_false(f: Formula) -> bool {
      let g = to_implies_false(&f);
      uses_only(&g, &[Operator::Implies, Operator::F]) && equivalent(&f, &g)
    }
  }
}
