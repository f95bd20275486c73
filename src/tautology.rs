//! The tautology theorem: every tautology over `->` and `~` has a proof in
//! the axiomatic system, and so does every sound inference rule. Proofs are
//! built by case analysis on the truth table.

use crate::deduction::{combine_proofs, prove_corollary, remove_assumption};
use crate::proof::{InferenceRule, Proof, ProofBuilder};
use crate::semantics::{all_models, evaluate, is_sound_inference, is_tautology, Model};
use crate::types::*;
use crate::{axiomatic_system, Axiom};
use std::collections::BTreeSet;

fn assert_implication_negation(formula: &Formula) {
  assert!(
    formula.operators().iter().all(|op| matches!(op, Operator::Implies | Operator::Not)),
    "{formula} uses operators other than '->' and '~'"
  );
}

/// `x` for each variable true in `model` and `~x` for each false one, by name.
pub fn formulas_capturing_model(model: &Model) -> Vec<Formula> {
  (model.iter())
    .map(|(v, &b)| if b { Formula::Var(v.clone()) } else { Formula::not(Formula::Var(v.clone())) })
    .collect()
}

/// Proves `formula` if it holds in `model` and its negation otherwise, from
/// the formulas capturing the model.
pub fn prove_in_model(formula: &Formula, model: &Model) -> Proof {
  assert_implication_negation(formula);
  let value = evaluate(formula, model);
  match formula {
    Formula::Var(_) => {
      let assumptions = formulas_capturing_model(model);
      let conclusion = if value { formula.clone() } else { Formula::not(formula.clone()) };
      let mut b = ProofBuilder::new();
      b.assumption(conclusion.clone());
      b.finish(InferenceRule::new(assumptions, conclusion), axiomatic_system())
        .constructed("tautology.in_model")
    }
    Formula::Not(g) =>
      if value {
        prove_in_model(g, model)
      } else {
        prove_corollary(&prove_in_model(g, model), Formula::not(formula.clone()), Axiom::Nn.rule())
      },
    Formula::Binary { op: Binop::Implies, first, second } =>
      if !value {
        let first = prove_in_model(first, model);
        let not_second = prove_in_model(&Formula::not((**second).clone()), model);
        combine_proofs(&first, &not_second, Formula::not(formula.clone()), Axiom::Ni.rule())
      } else if !evaluate(first, model) {
        let not_first = prove_in_model(&Formula::not((**first).clone()), model);
        prove_corollary(&not_first, formula.clone(), Axiom::I2.rule())
      } else {
        prove_corollary(&prove_in_model(second, model), formula.clone(), Axiom::I1.rule())
      },
    _ => unreachable!(),
  }
}

/// From proofs of the same conclusion whose last assumptions are `x` and
/// `~x` respectively, a proof without that assumption.
pub fn reduce_assumption(proof_from_affirmation: &Proof, proof_from_negation: &Proof) -> Proof {
  let (aff, neg) = (&proof_from_affirmation.statement, &proof_from_negation.statement);
  assert!(aff.conclusion == neg.conclusion, "proofs have different conclusions");
  let (Some((x, rest1)), Some((not_x, rest2))) =
    (aff.assumptions.split_last(), neg.assumptions.split_last())
  else {
    panic!("proofs must have assumptions")
  };
  assert!(rest1 == rest2, "proofs have different assumptions");
  assert!(*not_x == Formula::not(x.clone()), "{not_x} is not the negation of {x}");
  let from_affirmation = remove_assumption(proof_from_affirmation);
  let from_negation = remove_assumption(proof_from_negation);
  combine_proofs(&from_affirmation, &from_negation, aff.conclusion.clone(), Axiom::R.rule())
}

/// Proves `tautology` from the formulas capturing `model`, which must assign
/// exactly an alphabetically initial segment of its variables.
pub fn prove_tautology(tautology: &Formula, model: &Model) -> Proof {
  assert_implication_negation(tautology);
  assert!(is_tautology(tautology), "{tautology} is not a tautology");
  let vars = tautology.variables();
  assert!(
    vars.iter().zip(model.keys()).all(|(a, b)| a == b),
    "model does not assign a prefix of the variables"
  );
  assert!(model.len() <= vars.len(), "model assigns other variables");
  match vars.iter().nth(model.len()) {
    None => prove_in_model(tautology, model),
    Some(v) => {
      let aff = prove_tautology(tautology, &model.update(v.clone(), true));
      let neg = prove_tautology(tautology, &model.update(v.clone(), false));
      reduce_assumption(&aff, &neg)
    }
  }
}

#[derive(Clone, Debug)]
pub enum ProofOrCounterexample {
  Proof(Proof),
  Counterexample(Model),
}

/// A proof of `formula` without assumptions, or a model in which it fails.
pub fn proof_or_counterexample(formula: &Formula) -> ProofOrCounterexample {
  assert_implication_negation(formula);
  match all_models(&formula.variables()).find(|m| !evaluate(formula, m)) {
    Some(m) => ProofOrCounterexample::Counterexample(m),
    None => ProofOrCounterexample::Proof(prove_tautology(formula, &Model::new())),
  }
}

/// `(a1->(a2->...(an->c)))` for the rule `[a1, ..., an] ==> c`.
pub fn encode_as_formula(rule: &InferenceRule) -> Formula {
  (rule.assumptions.iter().rev())
    .fold(rule.conclusion.clone(), |c, a| Formula::implies(a.clone(), c))
}

/// Proves a sound rule over `->` and `~` in the axiomatic system.
pub fn prove_sound_inference(rule: &InferenceRule) -> Proof {
  assert!(is_sound_inference(rule), "{rule} is not sound");
  rule.assumptions.iter().chain([&rule.conclusion]).for_each(assert_implication_negation);
  let tautology = encode_as_formula(rule);
  let mut b = ProofBuilder::new();
  let mut last = b.splice(&prove_tautology(&tautology, &Model::new()));
  let mut remaining = &tautology;
  for a in &rule.assumptions {
    let Some((_, rest)) = remaining.as_implication() else { unreachable!() };
    let l = b.assumption(a.clone());
    last = b.mp(rest.clone(), l, last);
    remaining = rest;
  }
  b.finish(rule.clone(), axiomatic_system()).constructed("tautology.sound_inference")
}

#[derive(Clone, Debug)]
pub enum ModelOrInconsistency {
  Model(Model),
  Inconsistency(Proof),
}

/// A model of all of `formulas`, or a proof of `~(p->p)` from them.
pub fn model_or_inconsistency(formulas: &[Formula]) -> ModelOrInconsistency {
  formulas.iter().for_each(assert_implication_negation);
  let vars: BTreeSet<Var> = formulas.iter().flat_map(Formula::variables).collect();
  match all_models(&vars).find(|m| formulas.iter().all(|f| evaluate(f, m))) {
    Some(m) => ModelOrInconsistency::Model(m),
    None => ModelOrInconsistency::Inconsistency(prove_sound_inference(&InferenceRule::new(
      formulas.to_vec(),
      Formula::parse("~(p->p)"),
    ))),
  }
}
