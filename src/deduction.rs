//! Maneuvers that turn valid proofs into new valid proofs: corollaries,
//! combination of two proofs, and the deduction theorem with its consequences.
//!
//! All of them expect valid input and panic on a violated precondition.

use crate::proof::{InferenceRule, Proof, ProofBuilder};
use crate::types::*;
use crate::Axiom;

fn assert_valid(proof: &Proof) {
  if let Err(e) = proof.check() {
    panic!("expected a valid proof: {e}\n{proof}")
  }
}

fn assert_deduction_ready(proof: &Proof) {
  assert_valid(proof);
  assert!(!proof.statement.assumptions.is_empty(), "no assumption to remove");
  for rule in &proof.rules {
    assert!(
      rule == Axiom::Mp.rule() || rule.assumptions.is_empty(),
      "rule {rule} has assumptions and is not MP"
    );
  }
}

/// From a proof of `A`, a proof of `consequent` via `(A->consequent)`, an
/// instance of the assumption-free rule `conditional`.
pub fn prove_corollary(
  antecedent_proof: &Proof, consequent: Formula, conditional: &InferenceRule,
) -> Proof {
  assert_valid(antecedent_proof);
  let imp = Formula::implies(antecedent_proof.statement.conclusion.clone(), consequent.clone());
  assert!(
    InferenceRule::axiom(imp.clone()).is_specialization_of(conditional),
    "{imp} is not an instance of {conditional}"
  );
  let mut b = ProofBuilder::new();
  let last = b.splice(antecedent_proof);
  let cond = b.derive(imp, conditional, []);
  b.mp(consequent.clone(), last, cond);
  let statement = InferenceRule::new(antecedent_proof.statement.assumptions.clone(), consequent);
  let rules = antecedent_proof.rules.update(Axiom::Mp.rule().clone()).update(conditional.clone());
  b.finish(statement, rules).constructed("deduction.corollary")
}

/// From proofs of `A1` and `A2` with the same assumptions and rules, a proof
/// of `consequent` via `(A1->(A2->consequent))`, an instance of the
/// assumption-free rule `double_conditional`.
pub fn combine_proofs(
  antecedent1_proof: &Proof, antecedent2_proof: &Proof, consequent: Formula,
  double_conditional: &InferenceRule,
) -> Proof {
  assert_valid(antecedent1_proof);
  assert_valid(antecedent2_proof);
  let (s1, s2) = (&antecedent1_proof.statement, &antecedent2_proof.statement);
  assert!(s1.assumptions == s2.assumptions, "proofs have different assumptions");
  assert!(antecedent1_proof.rules == antecedent2_proof.rules, "proofs have different rules");
  let inner = Formula::implies(s2.conclusion.clone(), consequent.clone());
  let imp = Formula::implies(s1.conclusion.clone(), inner.clone());
  assert!(
    InferenceRule::axiom(imp.clone()).is_specialization_of(double_conditional),
    "{imp} is not an instance of {double_conditional}"
  );
  let mut b = ProofBuilder::new();
  let l1 = b.splice(antecedent1_proof);
  let l2 = b.splice(antecedent2_proof);
  let cond = b.derive(imp, double_conditional, []);
  let m = b.mp(inner, l1, cond);
  b.mp(consequent.clone(), l2, m);
  let statement = InferenceRule::new(s1.assumptions.clone(), consequent);
  let rules =
    antecedent1_proof.rules.update(Axiom::Mp.rule().clone()).update(double_conditional.clone());
  b.finish(statement, rules).constructed("deduction.combine")
}

/// Proves `(phi->c)` from line `l`, which proves `c`.
fn lift(b: &mut ProofBuilder, phi: &Formula, l: LineId) -> LineId {
  let c = b.formula(l).clone();
  let lifted = Formula::implies(phi.clone(), c.clone());
  let i1 = b.derive(Formula::implies(c, lifted.clone()), Axiom::I1.rule(), []);
  b.mp(lifted, l, i1)
}

/// The deduction theorem: from a proof of `C` whose last assumption is `phi`,
/// a proof of `(phi->C)` from the other assumptions.
///
/// Every line proving some `c` is replaced by lines ending in one that proves
/// `(phi->c)`. An `MP` step from `q` and `(q->c)` uses the `D` instance
/// `((phi->(q->c))->((phi->q)->(phi->c)))` and the latest lines proving its
/// two antecedents.
pub fn remove_assumption(proof: &Proof) -> Proof {
  assert_deduction_ready(proof);
  let Some((phi, rest)) = proof.statement.assumptions.split_last() else { unreachable!() };
  let mut b = ProofBuilder::new();
  for line in &proof.lines.0 {
    let c = &line.formula;
    if rest.contains(c) {
      let l = b.assumption(c.clone());
      lift(&mut b, phi, l);
    } else if c == phi {
      b.derive(Formula::implies(phi.clone(), phi.clone()), Axiom::I0.rule(), []);
    } else if line.rule() == Some(Axiom::Mp.rule()) {
      let q = &proof.lines[line.premises()[0]].formula;
      let to_q = Formula::implies(phi.clone(), q.clone());
      let to_qc = Formula::implies(phi.clone(), Formula::implies(q.clone(), c.clone()));
      let to_c = Formula::implies(phi.clone(), c.clone());
      let tail = Formula::implies(to_q.clone(), to_c.clone());
      let (qc_line, q_line) = (b.expect(&to_qc), b.expect(&to_q));
      let d = b.derive(Formula::implies(to_qc, tail.clone()), Axiom::D.rule(), []);
      let m = b.mp(tail, qc_line, d);
      b.mp(to_c, q_line, m);
    } else {
      // an instance of an assumption-free rule
      let l = b.push(line.clone());
      lift(&mut b, phi, l);
    }
  }
  let conclusion = Formula::implies(phi.clone(), proof.statement.conclusion.clone());
  let statement = InferenceRule::new(rest.to_vec(), conclusion);
  let mut rules = proof.rules.clone();
  rules.extend([Axiom::Mp, Axiom::I0, Axiom::I1, Axiom::D].map(|ax| ax.rule().clone()));
  b.finish(statement, rules).constructed("deduction.remove_assumption")
}

/// From proofs of `A` and `~A` with the same assumptions and rules, a proof
/// of `conclusion`.
pub fn prove_from_opposites(
  proof_of_affirmation: &Proof, proof_of_negation: &Proof, conclusion: Formula,
) -> Proof {
  assert!(
    proof_of_negation.statement.conclusion
      == Formula::not(proof_of_affirmation.statement.conclusion.clone()),
    "proofs are not of a formula and its negation"
  );
  combine_proofs(proof_of_negation, proof_of_affirmation, conclusion, Axiom::I2.rule())
}

/// Reductio ad absurdum: from a proof of `~(p->p)` whose last assumption is
/// `~phi`, a proof of `phi` from the other assumptions.
pub fn prove_by_way_of_contradiction(proof: &Proof) -> Proof {
  let absurd = Formula::parse("~(p->p)");
  assert!(proof.statement.conclusion == absurd, "proof does not conclude {absurd}");
  assert_deduction_ready(proof);
  let Some(phi) = proof.statement.assumptions.last().and_then(Formula::as_negation) else {
    panic!("last assumption of {} is not a negation", proof.statement)
  };
  let phi = phi.clone();
  let p_p = Formula::parse("(p->p)");
  let lifted = remove_assumption(proof);
  let contra =
    prove_corollary(&lifted, Formula::implies(p_p.clone(), phi.clone()), Axiom::N.rule());
  let mut b = ProofBuilder::new();
  let l = b.splice(&contra);
  let i0 = b.derive(p_p, Axiom::I0.rule(), []);
  b.mp(phi.clone(), i0, l);
  let statement = InferenceRule::new(lifted.statement.assumptions.clone(), phi);
  let rules = contra.rules.update(Axiom::I0.rule().clone());
  b.finish(statement, rules).constructed("deduction.contradiction")
}
