use crate::error::{LineError, ProofError};
use crate::subst::specialize_with;
use crate::types::*;
use crate::{config, stat, vprintln, Axiom};
use serde_derive::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// A rule of inference: from the assumptions, in order, infer the conclusion.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InferenceRule {
  pub assumptions: Vec<Formula>,
  pub conclusion: Formula,
}

impl InferenceRule {
  pub fn new(assumptions: Vec<Formula>, conclusion: Formula) -> Self {
    Self { assumptions, conclusion }
  }

  /// A rule with no assumptions.
  pub fn axiom(conclusion: Formula) -> Self { Self::new(vec![], conclusion) }

  pub fn variables(&self) -> BTreeSet<Var> {
    let mut vars = self.conclusion.variables();
    for a in &self.assumptions {
      vars.extend(a.variables())
    }
    vars
  }

  #[must_use]
  pub fn specialize(&self, map: &Substitution) -> Self {
    Self::new(
      self.assumptions.iter().map(|a| a.substitute_variables(map)).collect(),
      self.conclusion.substitute_variables(map),
    )
  }

  /// The substitution turning `self` into `special`, part by part, if any.
  pub fn specialization_map(&self, special: &InferenceRule) -> Option<Substitution> {
    if self.assumptions.len() != special.assumptions.len() {
      return None
    }
    let map = specialize_with(&self.conclusion, &special.conclusion, Substitution::new())?;
    (self.assumptions.iter().zip(&special.assumptions))
      .try_fold(map, |map, (g, s)| specialize_with(g, s, map))
  }

  pub fn is_specialization_of(&self, general: &InferenceRule) -> bool {
    general.specialization_map(self).is_some()
  }
}

/// Why a line of a proof holds.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Justification {
  /// The line's formula is one of the statement's assumptions.
  Assumption,
  /// The line's formula is the conclusion of an instance of `rule`, whose
  /// assumptions are the formulas on the `premises` lines.
  Rule { rule: InferenceRule, premises: Box<[LineId]> },
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
  pub formula: Formula,
  pub just: Justification,
}

impl Line {
  pub fn assumption(formula: Formula) -> Self { Self { formula, just: Justification::Assumption } }

  pub fn derived(formula: Formula, rule: InferenceRule, premises: Box<[LineId]>) -> Self {
    Self { formula, just: Justification::Rule { rule, premises } }
  }

  pub fn is_assumption(&self) -> bool { matches!(self.just, Justification::Assumption) }

  pub fn rule(&self) -> Option<&InferenceRule> {
    match &self.just {
      Justification::Assumption => None,
      Justification::Rule { rule, .. } => Some(rule),
    }
  }

  pub fn premises(&self) -> &[LineId] {
    match &self.just {
      Justification::Assumption => &[],
      Justification::Rule { premises, .. } => premises,
    }
  }

  /// This line moved down by `offset`, with every back reference following it.
  #[must_use]
  pub fn renumbered(&self, offset: usize) -> Self {
    match &self.just {
      Justification::Assumption => self.clone(),
      Justification::Rule { rule, premises } => Self::derived(
        self.formula.clone(),
        rule.clone(),
        premises.iter().map(|j| j.offset(offset)).collect(),
      ),
    }
  }
}

/// A proof of `statement` from its assumptions, using only `rules`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
  pub statement: InferenceRule,
  pub rules: im::OrdSet<InferenceRule>,
  pub lines: IdxVec<LineId, Line>,
}

impl Proof {
  pub fn new(
    statement: InferenceRule, rules: im::OrdSet<InferenceRule>, lines: IdxVec<LineId, Line>,
  ) -> Self {
    Self { statement, rules, lines }
  }

  /// The concrete rule applied at line `i`: the formulas of its premise lines
  /// to its own formula. `None` for assumption lines and lines citing a line
  /// that does not precede them.
  pub fn rule_for_line(&self, i: LineId) -> Option<InferenceRule> {
    let line = &self.lines[i];
    if line.is_assumption() || line.premises().iter().any(|&j| j >= i) {
      return None
    }
    let assumptions = line.premises().iter().map(|&j| self.lines[j].formula.clone()).collect();
    Some(InferenceRule::new(assumptions, line.formula.clone()))
  }

  pub fn check_line(&self, i: LineId) -> Result<(), LineError> {
    let line = &self.lines[i];
    match &line.just {
      Justification::Assumption =>
        if !self.statement.assumptions.contains(&line.formula) {
          return Err(LineError::AssumptionNotInStatement)
        },
      Justification::Rule { rule, premises } => {
        if !self.rules.contains(rule) {
          return Err(LineError::RuleNotAllowed)
        }
        if let Some(&j) = premises.iter().find(|&&j| j >= i) {
          return Err(LineError::ForwardReference(j))
        }
        match self.rule_for_line(i) {
          Some(inst) if inst.is_specialization_of(rule) => {}
          _ => return Err(LineError::NotASpecialization),
        }
      }
    }
    Ok(())
  }

  pub fn is_line_valid(&self, i: LineId) -> bool { self.check_line(i).is_ok() }

  fn check_inner(&self) -> Result<(), ProofError> {
    let Some(last) = self.lines.0.last() else { return Err(ProofError::Empty) };
    if last.formula != self.statement.conclusion {
      return Err(ProofError::WrongConclusion)
    }
    for (i, _) in self.lines.enum_iter() {
      self.check_line(i).map_err(|e| ProofError::Line(i, e))?
    }
    Ok(())
  }

  /// Checks that every line is justified and that the last line is the
  /// statement's conclusion.
  pub fn check(&self) -> Result<(), ProofError> {
    let res = self.check_inner();
    if let Err(e) = &res {
      stat("proof.invalid");
      vprintln!("invalid proof: {e}\n{self}");
      if config().panic_on_invalid {
        panic!("invalid proof: {e}\n{self}")
      }
    }
    res
  }

  pub fn is_valid(&self) -> bool { self.check().is_ok() }

  /// Asserts that a proof built by a maneuver is valid, when so configured.
  pub(crate) fn constructed(self, maneuver: &'static str) -> Self {
    stat(maneuver);
    let cfg = config();
    if cfg.trace_maneuvers {
      vprintln!("{maneuver}: {} lines, proving {}", self.lines.len(), self.statement);
    }
    if cfg.verify_constructed {
      if let Err(e) = self.check_inner() {
        panic!("{maneuver} produced an invalid proof: {e}\n{self}")
      }
    }
    self
  }
}

/// Accumulates the lines of a new proof, remembering the latest line that
/// proves each formula.
#[derive(Default)]
pub struct ProofBuilder {
  lines: IdxVec<LineId, Line>,
  latest: HashMap<Formula, LineId>,
}

impl ProofBuilder {
  pub fn new() -> Self { Self::default() }

  pub fn len(&self) -> usize { self.lines.len() }

  pub fn is_empty(&self) -> bool { self.lines.is_empty() }

  pub fn push(&mut self, line: Line) -> LineId {
    assert!(line.premises().iter().all(|&j| j < self.lines.peek()), "forward reference");
    let formula = line.formula.clone();
    let i = self.lines.push(line);
    self.latest.insert(formula, i);
    i
  }

  pub fn assumption(&mut self, formula: Formula) -> LineId { self.push(Line::assumption(formula)) }

  pub fn derive(
    &mut self, formula: Formula, rule: &InferenceRule, premises: impl IntoIterator<Item = LineId>,
  ) -> LineId {
    self.push(Line::derived(formula, rule.clone(), premises.into_iter().collect()))
  }

  /// Derives `conclusion` by modus ponens from `antecedent` and
  /// `(antecedent->conclusion)`.
  pub fn mp(&mut self, conclusion: Formula, antecedent: LineId, conditional: LineId) -> LineId {
    self.derive(conclusion, Axiom::Mp.rule(), [antecedent, conditional])
  }

  /// Appends all lines of `proof`, shifting its back references past the
  /// lines already here. Returns the id of its last line.
  pub fn splice(&mut self, proof: &Proof) -> LineId {
    assert!(!proof.lines.is_empty(), "splicing an empty proof");
    let offset = self.lines.len();
    let mut last = self.lines.peek();
    for line in &proof.lines.0 {
      last = self.push(line.renumbered(offset))
    }
    last
  }

  /// The latest line proving `formula`.
  pub fn find(&self, formula: &Formula) -> Option<LineId> { self.latest.get(formula).copied() }

  pub fn expect(&self, formula: &Formula) -> LineId {
    match self.find(formula) {
      Some(i) => i,
      None => panic!("no line proves {formula}"),
    }
  }

  pub fn formula(&self, i: LineId) -> &Formula { &self.lines[i].formula }

  pub fn finish(self, statement: InferenceRule, rules: im::OrdSet<InferenceRule>) -> Proof {
    Proof::new(statement, rules, self.lines)
  }
}

/// Turns a valid proof into a proof of a specialization of its statement.
pub fn prove_specialization(proof: &Proof, specialization: &InferenceRule) -> Proof {
  assert!(proof.is_valid(), "proof must be valid");
  let Some(map) = proof.statement.specialization_map(specialization) else {
    panic!("{specialization} is not a specialization of {}", proof.statement)
  };
  let lines = (proof.lines.0.iter())
    .map(|line| Line { formula: line.formula.substitute_variables(&map), just: line.just.clone() })
    .collect();
  Proof::new(specialization.clone(), proof.rules.clone(), lines).constructed("prove_specialization")
}

/// Replaces the use of `lemma.statement` at line `i` of `main` by a
/// specialization of the lemma's proof. The lemma's rules are added to those
/// of `main`.
pub fn inline_proof_once(main: &Proof, i: LineId, lemma: &Proof) -> Proof {
  let used = &main.lines[i];
  assert!(used.rule() == Some(&lemma.statement), "line {i} does not use the lemma");
  let Some(instance) = main.rule_for_line(i) else { panic!("line {i} has a forward reference") };
  let lemma = prove_specialization(lemma, &instance);
  let mut b = ProofBuilder::new();
  for line in &main.lines[LineId(0)..i] {
    b.push(line.clone());
  }
  for lline in &lemma.lines.0 {
    if lline.is_assumption() {
      // the main proof already has this formula on a premise line of `i`
      let k = instance.assumptions.iter().position(|a| *a == lline.formula).expect("assumption");
      b.push(main.lines[used.premises()[k]].clone());
    } else {
      b.push(lline.renumbered(i.into_usize()));
    }
  }
  let shift = lemma.lines.len() - 1;
  for line in &main.lines.0[i.into_usize() + 1..] {
    let just = match &line.just {
      Justification::Assumption => Justification::Assumption,
      Justification::Rule { rule, premises } => Justification::Rule {
        rule: rule.clone(),
        premises: premises.iter().map(|&j| if j < i { j } else { j.offset(shift) }).collect(),
      },
    };
    b.push(Line { formula: line.formula.clone(), just });
  }
  let rules = main.rules.clone().union(lemma.rules);
  b.finish(main.statement.clone(), rules).constructed("inline_proof_once")
}

/// Replaces every use of `lemma.statement` in `main` by the lemma's proof.
/// The result no longer uses the lemma as a rule.
pub fn inline_proof(main: &Proof, lemma: &Proof) -> Proof {
  let mut proof = main.clone();
  loop {
    let found =
      proof.lines.enum_iter().find(|(_, l)| l.rule() == Some(&lemma.statement)).map(|(i, _)| i);
    let Some(i) = found else { break };
    proof = inline_proof_once(&proof, i, lemma)
  }
  proof.rules = main.rules.without(&lemma.statement).union(lemma.rules.clone());
  proof.constructed("inline_proof")
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::axiomatic_system;

  fn f(s: &str) -> Formula { Formula::parse(s) }

  fn rules(rs: &[&InferenceRule]) -> im::OrdSet<InferenceRule> {
    rs.iter().map(|&r| r.clone()).collect()
  }

  /// `[p] ==> (q->p)` by I1 and MP.
  fn lemma() -> Proof {
    let mut b = ProofBuilder::new();
    let l0 = b.assumption(f("p"));
    let l1 = b.derive(f("(p->(q->p))"), Axiom::I1.rule(), []);
    b.mp(f("(q->p)"), l0, l1);
    let statement = InferenceRule::new(vec![f("p")], f("(q->p)"));
    b.finish(statement, rules(&[Axiom::Mp.rule(), Axiom::I1.rule()]))
  }

  #[test]
  fn specializations() {
    let general = InferenceRule::new(vec![f("p"), f("(p->q)")], f("q"));
    let special = InferenceRule::new(vec![f("~x"), f("(~x->(y|z))")], f("(y|z)"));
    assert!(special.is_specialization_of(&general));
    let map = general.specialization_map(&special).unwrap();
    assert_eq!(general.specialize(&map), special);
    let swapped = InferenceRule::new(vec![f("(~x->(y|z))"), f("~x")], f("(y|z)"));
    assert!(!swapped.is_specialization_of(&general));
    let short = InferenceRule::new(vec![f("~x")], f("(y|z)"));
    assert!(!short.is_specialization_of(&general));
    let vars: Vec<_> = special.variables().into_iter().collect();
    assert_eq!(vars, [Var::from("x"), Var::from("y"), Var::from("z")]);
  }

  #[test]
  fn valid_proof() {
    let proof = lemma();
    assert_eq!(proof.check(), Ok(()));
    let rule = proof.rule_for_line(LineId(2)).unwrap();
    assert_eq!(rule.to_string(), "[p, (p->(q->p))] ==> (q->p)");
    assert_eq!(proof.rule_for_line(LineId(0)), None);
  }

  #[test]
  fn invalid_lines() {
    let good = lemma();
    let mut proof = good.clone();
    proof.statement.assumptions.clear();
    let err = ProofError::Line(LineId(0), LineError::AssumptionNotInStatement);
    assert_eq!(proof.check(), Err(err));

    let mut proof = good.clone();
    proof.rules = rules(&[Axiom::Mp.rule()]);
    assert_eq!(proof.check(), Err(ProofError::Line(LineId(1), LineError::RuleNotAllowed)));

    let mut proof = good.clone();
    let premises = [LineId(0), LineId(2)].into();
    proof.lines[LineId(2)] = Line::derived(f("(q->p)"), Axiom::Mp.rule().clone(), premises);
    let err = ProofError::Line(LineId(2), LineError::ForwardReference(LineId(2)));
    assert_eq!(proof.check(), Err(err));

    let mut proof = good.clone();
    proof.lines[LineId(1)].formula = f("(p->(r->p))");
    assert_eq!(proof.check(), Err(ProofError::Line(LineId(2), LineError::NotASpecialization)));

    let mut proof = good.clone();
    proof.statement.conclusion = f("(r->p)");
    assert_eq!(proof.check(), Err(ProofError::WrongConclusion));

    let proof = Proof::new(good.statement.clone(), good.rules.clone(), IdxVec::new());
    assert_eq!(proof.check(), Err(ProofError::Empty));
    assert!(!proof.is_valid());
  }

  #[test]
  fn builder_tracks_latest_line() {
    let mut b = ProofBuilder::new();
    let l0 = b.assumption(f("p"));
    let l1 = b.assumption(f("q"));
    let l2 = b.assumption(f("p"));
    assert_eq!(b.find(&f("p")), Some(l2));
    assert_eq!(b.expect(&f("q")), l1);
    assert_ne!(l0, l2);
    assert_eq!(b.find(&f("r")), None);
    let last = b.splice(&lemma());
    assert_eq!(last, LineId(5));
    assert_eq!(b.formula(last), &f("(q->p)"));
    assert_eq!(b.len(), 6);
  }

  #[test]
  #[should_panic(expected = "no line proves")]
  fn expect_needs_a_line() {
    let mut b = ProofBuilder::new();
    b.assumption(f("p"));
    b.expect(&f("(p->q)"));
  }

  #[test]
  fn specialized_proof() {
    let spec = InferenceRule::new(vec![f("~x")], f("((y&z)->~x)"));
    let proof = prove_specialization(&lemma(), &spec);
    assert!(proof.is_valid());
    assert_eq!(proof.lines[LineId(1)].formula, f("(~x->((y&z)->~x))"));
  }

  #[test]
  fn inlining() {
    // [x] ==> (y->(z->x)) using the lemma twice
    let lemma = lemma();
    let mut b = ProofBuilder::new();
    let l0 = b.assumption(f("x"));
    let l1 = b.derive(f("(z->x)"), &lemma.statement, [l0]);
    b.derive(f("(y->(z->x))"), &lemma.statement, [l1]);
    let main = b.finish(
      InferenceRule::new(vec![f("x")], f("(y->(z->x))")),
      rules(&[&lemma.statement]),
    );
    assert!(main.is_valid());

    let once = inline_proof_once(&main, LineId(1), &lemma);
    assert!(once.is_valid(), "{once}");
    assert_eq!(once.lines.len(), 5);
    assert_eq!(once.lines[LineId(4)].premises(), [LineId(3)]);

    let full = inline_proof(&main, &lemma);
    assert!(full.is_valid(), "{full}");
    assert_eq!(full.lines.len(), 7);
    assert_eq!(full.lines[LineId(6)].formula, f("(y->(z->x))"));
    assert!(!full.rules.contains(&lemma.statement));
    assert!(full.lines.0.iter().all(|l| l.rule() != Some(&lemma.statement)));
    assert!(full.rules.iter().all(|r| axiomatic_system().contains(r)));
  }
}
