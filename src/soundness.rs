//! Soundness of the proof calculus, constructively: a proof of an unsound
//! rule must use an unsound rule somewhere, and a counterexample to the former
//! yields a counterexample to the latter.

use crate::proof::{InferenceRule, Proof};
use crate::semantics::{evaluate, evaluate_inference, Model};

/// Given a model in which `specialization` fails, a model in which `general`
/// fails: each variable of `general` gets the value its image has in `model`.
pub fn rule_nonsoundness_from_specialization_nonsoundness(
  general: &InferenceRule, specialization: &InferenceRule, model: &Model,
) -> Model {
  assert!(!evaluate_inference(specialization, model), "{specialization} holds in the model");
  let Some(map) = general.specialization_map(specialization) else {
    panic!("{specialization} is not a specialization of {general}")
  };
  map.iter().map(|(v, f)| (v.clone(), evaluate(f, model))).collect()
}

/// Given a model in which the statement of the valid `proof` fails, finds a
/// rule used by the proof and a model in which that rule fails.
///
/// Variables that occur only in the middle of the proof are taken to be false.
pub fn nonsound_rule_of_nonsound_proof(proof: &Proof, model: &Model) -> (InferenceRule, Model) {
  assert!(proof.is_valid(), "proof must be valid");
  assert!(!evaluate_inference(&proof.statement, model), "{} holds in the model", proof.statement);
  let mut model = model.clone();
  for line in &proof.lines.0 {
    for v in line.formula.variables() {
      model.entry(v).or_insert(false);
    }
  }
  for (i, line) in proof.lines.enum_iter() {
    if line.is_assumption() || evaluate(&line.formula, &model) {
      continue
    }
    // every earlier line holds, so this step is where truth is lost
    let (Some(rule), Some(instance)) = (line.rule(), proof.rule_for_line(i)) else {
      unreachable!()
    };
    crate::stat("soundness.counterexample");
    let m = rule_nonsoundness_from_specialization_nonsoundness(rule, &instance, &model);
    return (rule.clone(), m)
  }
  unreachable!("the last line of a valid proof fails in the model")
}
