use propcalc::deduction::{prove_by_way_of_contradiction, prove_from_opposites, remove_assumption};
use propcalc::semantics::{evaluate, evaluate_inference, is_sound_inference, is_tautology};
use propcalc::soundness::nonsound_rule_of_nonsound_proof;
use propcalc::tautology::{proof_or_counterexample, prove_sound_inference, ProofOrCounterexample};
use propcalc::*;
use quickcheck::{quickcheck, Arbitrary, Gen};

fn f(s: &str) -> Formula { Formula::parse(s) }

fn rule(assumptions: &[&str], conclusion: &str) -> InferenceRule {
  InferenceRule::new(assumptions.iter().map(|s| f(s)).collect(), f(conclusion))
}

/// A formula over `p` and `q` using only `->` and `~`.
#[derive(Clone, Debug)]
struct ImpNeg(Formula);

fn gen_imp_neg(g: &mut Gen, depth: u32) -> Formula {
  match u8::arbitrary(g) % if depth == 0 { 2 } else { 4 } {
    0 => Formula::var("p"),
    1 => Formula::var("q"),
    2 => Formula::not(gen_imp_neg(g, depth - 1)),
    _ => Formula::implies(gen_imp_neg(g, depth - 1), gen_imp_neg(g, depth - 1)),
  }
}

impl Arbitrary for ImpNeg {
  fn arbitrary(g: &mut Gen) -> Self { ImpNeg(gen_imp_neg(g, 3)) }
}

#[test]
fn hypothetical_syllogism() {
  // [(p->q), (q->r), p] ==> r, then discharge `p`
  let mut b = ProofBuilder::new();
  let pq = b.assumption(f("(p->q)"));
  let qr = b.assumption(f("(q->r)"));
  let p = b.assumption(f("p"));
  let q = b.mp(f("q"), p, pq);
  b.mp(f("r"), q, qr);
  let rules = [Axiom::Mp.rule().clone()].into_iter().collect();
  let proof = b.finish(rule(&["(p->q)", "(q->r)", "p"], "r"), rules);
  assert!(proof.is_valid());

  let lemma = remove_assumption(&proof);
  assert_eq!(lemma.statement, rule(&["(p->q)", "(q->r)"], "(p->r)"));

  // use the syllogism as a lemma, then inline it away
  let mut b = ProofBuilder::new();
  let l0 = b.assumption(f("(~x->y)"));
  let l1 = b.assumption(f("(y->~z)"));
  b.derive(f("(~x->~z)"), &lemma.statement, [l0, l1]);
  let rules = [lemma.statement.clone()].into_iter().collect();
  let main = b.finish(rule(&["(~x->y)", "(y->~z)"], "(~x->~z)"), rules);
  assert!(main.is_valid());
  let inlined = inline_proof(&main, &lemma);
  assert!(inlined.is_valid(), "{inlined}");
  assert!(!inlined.rules.contains(&lemma.statement));
  assert!(inlined.rules.iter().all(|r| axiomatic_system().contains(r)));
}

#[test]
fn reductio_in_the_axiomatic_system() {
  // from ~~x derive x: assume ~x, then ~x and ~~x are opposites
  let assumptions = ["~~x", "~x"];
  let restate = |which: &str| {
    let mut b = ProofBuilder::new();
    b.assumption(f(which));
    b.finish(rule(&assumptions, which), axiomatic_system())
  };
  let absurd = prove_from_opposites(&restate("~x"), &restate("~~x"), f("~(p->p)"));
  let proof = prove_by_way_of_contradiction(&absurd);
  assert!(proof.is_valid(), "{proof}");
  assert_eq!(proof.statement, rule(&["~~x"], "x"));
  assert!(proof.rules.iter().all(|r| axiomatic_system().contains(r)));
}

#[test]
fn sound_rules_are_provable_and_unsound_ones_are_caught() {
  let contraposition = rule(&["(p->q)"], "(~q->~p)");
  let proof = prove_sound_inference(&contraposition);
  assert!(proof.is_valid());
  assert_eq!(proof.statement, contraposition);

  // an unsound rule, proved with the help of an unsound lemma
  let converse = rule(&["(p->q)"], "(q->p)");
  assert!(!is_sound_inference(&converse));
  let mut b = ProofBuilder::new();
  let l0 = b.assumption(f("(x->~y)"));
  b.derive(f("(~y->x)"), &converse, [l0]);
  let rules = [converse.clone()].into_iter().collect();
  let proof = b.finish(rule(&["(x->~y)"], "(~y->x)"), rules);
  assert!(proof.is_valid());
  let counter: Model = [(Var::from("x"), false), (Var::from("y"), false)].into_iter().collect();
  assert!(!evaluate_inference(&proof.statement, &counter));
  let (bad, m) = nonsound_rule_of_nonsound_proof(&proof, &counter);
  assert_eq!(bad, converse);
  assert!(!evaluate_inference(&bad, &m));
}

#[test]
fn proofs_survive_json() {
  let proof = prove_sound_inference(&rule(&["p", "~p"], "q"));
  let back = Proof::from_json(&proof.to_json().unwrap()).unwrap();
  assert!(back == proof);
  assert!(back.is_valid());
  assert_eq!(back.to_string(), proof.to_string());
}

quickcheck! {
  fn tautologies_are_proved_and_others_refuted(f: ImpNeg) -> bool {
    let f = f.0;
    match proof_or_counterexample(&f) {
      ProofOrCounterexample::Proof(proof) =>
        is_tautology(&f) && proof.is_valid() && proof.statement == InferenceRule::axiom(f),
      ProofOrCounterexample::Counterexample(m) => !evaluate(&f, &m),
    }
  }
}
