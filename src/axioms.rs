use crate::proof::InferenceRule;
use crate::types::Formula;
use enum_map::{enum_map, Enum, EnumMap};
use once_cell::sync::Lazy;

macro_rules! mk_axioms {
  ($($(#[$attr:meta])* $id:ident($name:literal): [$($a:literal),*] => $c:literal;)*) => {
    /// The axiom schemas of the Hilbert system. Each is a rule over the
    /// schema variables `p`, `q` and `r`.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Enum)]
    pub enum Axiom { $($(#[$attr])* $id,)* }

    static AXIOMS: Lazy<EnumMap<Axiom, InferenceRule>> = Lazy::new(|| enum_map! {
      $(Axiom::$id => InferenceRule::new(vec![$(Formula::parse($a)),*], Formula::parse($c)),)*
    });

    impl Axiom {
      pub fn name(self) -> &'static str {
        match self { $(Axiom::$id => $name,)* }
      }
    }
  };
}

mk_axioms! {
  /// Modus ponens
  Mp("MP"): ["p", "(p->q)"] => "q";
  I0("I0"): [] => "(p->p)";
  I1("I1"): [] => "(q->(p->q))";
  /// Distribution of implication
  D("D"): [] => "((p->(q->r))->((p->q)->(p->r)))";
  /// Ex falso
  I2("I2"): [] => "(~p->(p->q))";
  /// Contraposition
  N("N"): [] => "((~q->~p)->(p->q))";
  Ni("NI"): [] => "(p->(~q->~(p->q)))";
  /// Double negation introduction
  Nn("NN"): [] => "(p->~~p)";
  /// Reasoning by cases
  R("R"): [] => "((q->p)->((~q->p)->p))";
}

impl Axiom {
  pub fn rule(self) -> &'static InferenceRule { &AXIOMS[self] }

  /// The axiom this rule is, verbatim.
  pub fn of_rule(rule: &InferenceRule) -> Option<Axiom> {
    AXIOMS.iter().find(|(_, r)| *r == rule).map(|(ax, _)| ax)
  }
}

/// The rules of the complete axiomatic system for implication and negation.
pub fn axiomatic_system() -> im::OrdSet<InferenceRule> {
  AXIOMS.values().cloned().collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::semantics::is_sound_inference;

  #[test]
  fn axioms_are_sound() {
    for (ax, rule) in AXIOMS.iter() {
      assert!(is_sound_inference(rule), "{} is not sound", ax.name());
      assert_eq!(Axiom::of_rule(rule), Some(ax));
    }
    assert_eq!(axiomatic_system().len(), 9);
  }

  #[test]
  fn lookup() {
    assert_eq!(Axiom::I1.rule().to_string(), "[] ==> (q->(p->q))");
    assert_eq!(Axiom::Mp.rule().assumptions.len(), 2);
    assert_eq!(Axiom::of_rule(&InferenceRule::axiom(Formula::parse("(p->q)"))), None);
    assert_eq!(Axiom::Ni.name(), "NI");
  }
}
