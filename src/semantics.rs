//! Truth-table semantics: models, evaluation, and the formulas that can be
//! read back off a truth table.

use crate::format::TruthTable;
use crate::proof::InferenceRule;
use crate::types::*;
use std::collections::BTreeSet;

/// An assignment of truth values to variables.
pub type Model = im::OrdMap<Var, bool>;

/// The variables a model assigns.
pub fn model_variables(model: &Model) -> BTreeSet<Var> { model.keys().cloned().collect() }

/// Evaluates `formula` in `model`, which must assign every variable of the formula.
pub fn evaluate(formula: &Formula, model: &Model) -> bool {
  match formula {
    Formula::Const(b) => *b,
    Formula::Var(v) => match model.get(v) {
      Some(&b) => b,
      None => panic!("variable {v} is not assigned by the model"),
    },
    Formula::Not(f) => !evaluate(f, model),
    Formula::Binary { op, first, second } =>
      op.apply(evaluate(first, model), evaluate(second, model)),
  }
}

/// The models over a fixed list of variables, in truth table order.
#[derive(Clone, Debug)]
pub struct AllModels {
  vars: Box<[Var]>,
  next: usize,
  end: usize,
}

impl Iterator for AllModels {
  type Item = Model;

  fn next(&mut self) -> Option<Model> {
    if self.next == self.end {
      return None
    }
    let n = self.next.fresh();
    let last = self.vars.len().wrapping_sub(1);
    let bit = |i: usize| (n >> (last - i)) & 1 != 0;
    Some(self.vars.iter().enumerate().map(|(i, v)| (v.clone(), bit(i))).collect())
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    let len = self.end - self.next;
    (len, Some(len))
  }
}

impl ExactSizeIterator for AllModels {}

/// All `2^n` models over `vars`. The first variable varies slowest, and each
/// variable is `false` before it is `true`.
pub fn all_models(vars: impl IntoIterator<Item = impl AsRef<str>>) -> AllModels {
  let vars: Box<[Var]> = vars.into_iter().map(|v| v.as_ref().into()).collect();
  assert!(vars.len() < usize::BITS as usize, "too many variables for a truth table");
  AllModels { end: 1 << vars.len(), vars, next: 0 }
}

/// The value of `formula` in each of `models`.
pub fn truth_values<'a>(
  formula: &'a Formula, models: impl IntoIterator<Item = Model> + 'a,
) -> impl Iterator<Item = bool> + 'a {
  models.into_iter().map(move |m| evaluate(formula, &m))
}

pub fn truth_table(formula: &Formula) -> TruthTable<'_> { TruthTable(formula) }

pub fn is_tautology(formula: &Formula) -> bool {
  truth_values(formula, all_models(&formula.variables())).all(|b| b)
}

pub fn is_contradiction(formula: &Formula) -> bool { !is_satisfiable(formula) }

pub fn is_satisfiable(formula: &Formula) -> bool {
  truth_values(formula, all_models(&formula.variables())).any(|b| b)
}

fn literal(v: &Var, positive: bool) -> Formula {
  let f = Formula::Var(v.clone());
  if positive {
    f
  } else {
    Formula::not(f)
  }
}

/// Folds `fs` left-associatively with `op`, or returns `None` if it is empty.
fn fold(op: Binop, fs: impl IntoIterator<Item = Formula>) -> Option<Formula> {
  fs.into_iter().reduce(|a, b| Formula::binary(op, a, b))
}

fn table_rows(
  vars: impl IntoIterator<Item = impl AsRef<str>>, values: &[bool],
) -> (Box<[Var]>, impl Iterator<Item = (Model, bool)> + '_) {
  let models = all_models(vars);
  let vars = models.vars.clone();
  assert!(!vars.is_empty(), "a truth table needs at least one variable");
  assert_eq!(models.len(), values.len(), "truth table has the wrong number of rows");
  (vars, models.zip(values.iter().copied()))
}

/// A formula in disjunctive normal form whose truth table over `vars` is
/// `values`, listed in [`all_models`] order.
pub fn synthesize(vars: impl IntoIterator<Item = impl AsRef<str>>, values: &[bool]) -> Formula {
  let (vars, rows) = table_rows(vars, values);
  let clauses = rows.filter(|&(_, b)| b).map(|(m, _)| {
    fold(Binop::And, vars.iter().map(|v| literal(v, m[v]))).expect("nonempty")
  });
  fold(Binop::Or, clauses).unwrap_or_else(|| {
    Formula::and(literal(&vars[0], true), literal(&vars[0], false))
  })
}

/// A formula in conjunctive normal form whose truth table over `vars` is
/// `values`, listed in [`all_models`] order.
pub fn synthesize_cnf(vars: impl IntoIterator<Item = impl AsRef<str>>, values: &[bool]) -> Formula {
  let (vars, rows) = table_rows(vars, values);
  let clauses = rows.filter(|&(_, b)| !b).map(|(m, _)| {
    fold(Binop::Or, vars.iter().map(|v| literal(v, !m[v]))).expect("nonempty")
  });
  fold(Binop::And, clauses).unwrap_or_else(|| {
    Formula::or(literal(&vars[0], true), literal(&vars[0], false))
  })
}

/// Is `rule` respected by `model`, that is, is the conclusion true whenever
/// all the assumptions are?
pub fn evaluate_inference(rule: &InferenceRule, model: &Model) -> bool {
  evaluate(&rule.conclusion, model) || rule.assumptions.iter().any(|a| !evaluate(a, model))
}

/// Is `rule` respected by every model?
pub fn is_sound_inference(rule: &InferenceRule) -> bool {
  all_models(&rule.variables()).all(|m| evaluate_inference(rule, &m))
}
