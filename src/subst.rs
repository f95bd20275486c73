use crate::types::*;

struct VarSubst<'a>(&'a Substitution);

impl VisitMut for VarSubst<'_> {
  fn visit_formula(&mut self, f: &mut Formula) {
    match f {
      // the replacement is inserted as is, not visited again
      Formula::Var(v) =>
        if let Some(g) = self.0.get(v) {
          *f = g.clone()
        },
      _ => self.super_visit_formula(f),
    }
  }
}

struct OpSubst<'a>(&'a OperatorTable);

impl VisitMut for OpSubst<'_> {
  fn visit_formula(&mut self, f: &mut Formula) {
    self.super_visit_formula(f);
    let Some(op) = f.root_operator() else { return };
    let Some(template) = &self.0[op] else { return };
    let mut map = Substitution::new();
    if let Some(p) = f.first() {
      map.insert("p".into(), p.clone());
    }
    if let Some(q) = f.second() {
      map.insert("q".into(), q.clone());
    }
    *f = template.substitute_variables(&map)
  }
}

impl Formula {
  /// Replaces every variable in the domain of `map` by its image. Images are
  /// not themselves substituted into.
  #[must_use]
  pub fn substitute_variables(&self, map: &Substitution) -> Formula {
    self.visit_cloned(&mut VarSubst(map))
  }

  /// Rewrites bottom-up every operator (or constant) that has a template in
  /// `table`, binding `p` and `q` in the template to the rewritten operands.
  #[must_use]
  pub fn substitute_operators(&self, table: &OperatorTable) -> Formula {
    self.visit_cloned(&mut OpSubst(table))
  }
}

/// Merges two substitutions, failing if they disagree on a common variable.
pub fn merge_specialization_maps(
  a: Option<Substitution>, b: Option<Substitution>,
) -> Option<Substitution> {
  let (mut a, b) = (a?, b?);
  for (v, f) in b {
    match a.get(&v) {
      Some(g) if *g != f => return None,
      Some(_) => {}
      None => {
        a.insert(v, f);
      }
    }
  }
  Some(a)
}

fn specialize_into(general: &Formula, special: &Formula, map: &mut Substitution) -> bool {
  match (general, special) {
    (Formula::Var(v), _) => match map.get(v) {
      Some(f) => f == special,
      None => {
        map.insert(v.clone(), special.clone());
        true
      }
    },
    (Formula::Const(a), Formula::Const(b)) => a == b,
    (Formula::Not(g), Formula::Not(s)) => specialize_into(g, s, map),
    (
      Formula::Binary { op: op1, first: g1, second: g2 },
      Formula::Binary { op: op2, first: s1, second: s2 },
    ) => op1 == op2 && specialize_into(g1, s1, map) && specialize_into(g2, s2, map),
    _ => false,
  }
}

/// The substitution taking `general` to `special`, if there is one. It is
/// unique, and its domain is exactly the variables of `general`.
pub fn formula_specialization_map(general: &Formula, special: &Formula) -> Option<Substitution> {
  specialize_with(general, special, Substitution::new())
}

/// Like [`formula_specialization_map`], but extending an existing partial map.
pub(crate) fn specialize_with(
  general: &Formula, special: &Formula, mut map: Substitution,
) -> Option<Substitution> {
  specialize_into(general, special, &mut map).then_some(map)
}
