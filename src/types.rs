use enum_map::{Enum, EnumMap};
use std::collections::{BTreeMap, BTreeSet};
use std::marker::PhantomData;
use std::ops::{Index, IndexMut, Range};
use std::sync::Arc;

/// A trait for newtyped integers, that can be used as index types in vectors and sets.
pub trait Idx: Copy + Eq + std::hash::Hash + Ord {
  /// Convert from `T` to `usize`
  fn into_usize(self) -> usize;
  /// Convert from `usize` to `T`
  fn from_usize(_: usize) -> Self;
  /// Generate a fresh variable from a `&mut ID` counter.
  #[must_use]
  fn fresh(&mut self) -> Self {
    let n = *self;
    *self = Self::from_usize(self.into_usize() + 1);
    n
  }
}

impl Idx for usize {
  fn into_usize(self) -> usize { self }
  fn from_usize(n: usize) -> Self { n }
}

/// A vector indexed by a custom indexing type `I`, usually a newtyped integer.
pub struct IdxVec<I, T>(pub Vec<T>, PhantomData<I>);

impl<I, T: std::fmt::Debug> std::fmt::Debug for IdxVec<I, T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { self.0.fmt(f) }
}

impl<I, T: Clone> Clone for IdxVec<I, T> {
  fn clone(&self) -> Self { Self(self.0.clone(), PhantomData) }
}

impl<I, T: PartialEq> PartialEq for IdxVec<I, T> {
  fn eq(&self, other: &Self) -> bool { self.0 == other.0 }
}
impl<I, T: Eq> Eq for IdxVec<I, T> {}

impl<I, T> IdxVec<I, T> {
  /// Construct a new empty [`IdxVec`].
  #[must_use]
  pub const fn new() -> Self { Self(vec![], PhantomData) }

  /// The number of elements in the [`IdxVec`].
  #[must_use]
  pub fn len(&self) -> usize { self.0.len() }

  /// Returns the value that would be returned by the next call to `push`.
  pub fn peek(&self) -> I
  where I: Idx {
    I::from_usize(self.0.len())
  }

  /// Insert a new value at the end of the vector.
  pub fn push(&mut self, val: T) -> I
  where I: Idx {
    let id = self.peek();
    self.0.push(val);
    id
  }

  /// The index of the last element, if any.
  pub fn last_id(&self) -> Option<I>
  where I: Idx {
    self.0.len().checked_sub(1).map(I::from_usize)
  }

  /// An iterator including the indexes, like `iter().enumerate()`, as `I`s.
  pub fn enum_iter(&self) -> impl Iterator<Item = (I, &T)>
  where I: Idx {
    self.0.iter().enumerate().map(|(n, val)| (I::from_usize(n), val))
  }

  /// Returns `true` if the vector contains no elements.
  #[must_use]
  pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl<I, T> From<Vec<T>> for IdxVec<I, T> {
  fn from(vec: Vec<T>) -> Self { Self(vec, PhantomData) }
}

impl<I, T> std::iter::FromIterator<T> for IdxVec<I, T> {
  fn from_iter<J: IntoIterator<Item = T>>(iter: J) -> Self { Vec::from_iter(iter).into() }
}

impl<I, T> Default for IdxVec<I, T> {
  fn default() -> Self { vec![].into() }
}

impl<I: Idx, T> Index<I> for IdxVec<I, T> {
  type Output = T;
  fn index(&self, index: I) -> &Self::Output { &self.0[I::into_usize(index)] }
}

impl<I: Idx, T> IndexMut<I> for IdxVec<I, T> {
  fn index_mut(&mut self, index: I) -> &mut Self::Output { &mut self.0[I::into_usize(index)] }
}

impl<I: Idx, T> Index<Range<I>> for IdxVec<I, T> {
  type Output = [T];
  fn index(&self, r: Range<I>) -> &Self::Output {
    &self.0[I::into_usize(r.start)..I::into_usize(r.end)]
  }
}

impl<I, T: serde::Serialize> serde::Serialize for IdxVec<I, T> {
  fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> { self.0.serialize(s) }
}

impl<'de, I, T: serde::Deserialize<'de>> serde::Deserialize<'de> for IdxVec<I, T> {
  fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
    Vec::deserialize(d).map(Into::into)
  }
}

#[macro_export]
macro_rules! mk_id {
  ($($id:ident,)*) => {
    $(
      #[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
      #[derive(serde_derive::Serialize, serde_derive::Deserialize)]
      #[serde(transparent)]
      pub struct $id(pub u32);
      impl Idx for $id {
        fn from_usize(n: usize) -> Self { Self(n as u32) }
        fn into_usize(self) -> usize { self.0 as usize }
      }
      impl std::fmt::Debug for $id {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { self.0.fmt(f) }
      }
      impl std::fmt::Display for $id {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { self.0.fmt(f) }
      }
    )*
  };
}

mk_id! {
  LineId,
}

impl LineId {
  /// Shift a back reference past `offset` earlier lines.
  #[must_use]
  pub fn offset(self, offset: usize) -> Self { Self::from_usize(self.into_usize() + offset) }
}

/// A variable name, matching `[p-z][0-9]*`. Only a checked name can be made
/// into a `Var`, so every [`Formula::Var`] leaf is well formed.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Var(Arc<str>);

impl Var {
  pub fn new(name: &str) -> Self {
    assert!(Formula::is_variable_name(name), "not a variable name: {name:?}");
    Var(name.into())
  }
}

impl From<&str> for Var {
  fn from(name: &str) -> Self { Var::new(name) }
}

impl std::ops::Deref for Var {
  type Target = str;
  fn deref(&self) -> &str { &self.0 }
}

impl AsRef<str> for Var {
  fn as_ref(&self) -> &str { &self.0 }
}

impl std::borrow::Borrow<str> for Var {
  fn borrow(&self) -> &str { &self.0 }
}

impl std::fmt::Debug for Var {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { self.0.fmt(f) }
}

impl std::fmt::Display for Var {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(&self.0) }
}

/// A variable-to-formula substitution.
pub type Substitution = BTreeMap<Var, Formula>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Enum)]
pub enum Binop {
  And,
  Or,
  Implies,
  Xor,
  Iff,
  Nand,
  Nor,
}

impl Binop {
  pub const ALL: [Binop; 7] =
    [Binop::And, Binop::Or, Binop::Implies, Binop::Xor, Binop::Iff, Binop::Nand, Binop::Nor];

  pub fn symbol(self) -> &'static str {
    match self {
      Binop::And => "&",
      Binop::Or => "|",
      Binop::Implies => "->",
      Binop::Xor => "+",
      Binop::Iff => "<->",
      Binop::Nand => "-&",
      Binop::Nor => "-|",
    }
  }

  pub fn from_symbol(s: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|op| op.symbol() == s)
  }

  /// The truth function of the connective.
  pub fn apply(self, a: bool, b: bool) -> bool {
    match self {
      Binop::And => a && b,
      Binop::Or => a || b,
      Binop::Implies => !a || b,
      Binop::Xor => a != b,
      Binop::Iff => a == b,
      Binop::Nand => !(a && b),
      Binop::Nor => !(a || b),
    }
  }
}

/// Anything that can sit at the root of a non-variable formula.
/// Constants count as nullary operators.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Enum)]
pub enum Operator {
  T,
  F,
  Not,
  And,
  Or,
  Implies,
  Xor,
  Iff,
  Nand,
  Nor,
}

impl From<Binop> for Operator {
  fn from(op: Binop) -> Self {
    match op {
      Binop::And => Operator::And,
      Binop::Or => Operator::Or,
      Binop::Implies => Operator::Implies,
      Binop::Xor => Operator::Xor,
      Binop::Iff => Operator::Iff,
      Binop::Nand => Operator::Nand,
      Binop::Nor => Operator::Nor,
    }
  }
}

impl Operator {
  pub fn symbol(self) -> &'static str {
    match self {
      Operator::T => "T",
      Operator::F => "F",
      Operator::Not => "~",
      Operator::And => Binop::And.symbol(),
      Operator::Or => Binop::Or.symbol(),
      Operator::Implies => Binop::Implies.symbol(),
      Operator::Xor => Binop::Xor.symbol(),
      Operator::Iff => Binop::Iff.symbol(),
      Operator::Nand => Binop::Nand.symbol(),
      Operator::Nor => Binop::Nor.symbol(),
    }
  }
}

/// Templates for [`Formula::substitute_operators`], over the parameters `p` and `q`.
pub type OperatorTable = EnumMap<Operator, Option<Formula>>;

/// An immutable propositional formula. Subtrees are shared, never mutated in place;
/// every transformation builds a new tree.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Formula {
  /// `T` or `F`
  Const(bool),
  Var(Var),
  /// `~first`
  Not(Arc<Formula>),
  /// `(first op second)`
  Binary { op: Binop, first: Arc<Formula>, second: Arc<Formula> },
}

impl Formula {
  pub fn is_variable_name(s: &str) -> bool {
    let mut it = s.bytes();
    matches!(it.next(), Some(b'p'..=b'z')) && it.all(|c| c.is_ascii_digit())
  }

  pub fn is_constant_name(s: &str) -> bool { matches!(s, "T" | "F") }

  pub fn is_unary_name(s: &str) -> bool { s == "~" }

  pub fn is_binary_name(s: &str) -> bool { Binop::from_symbol(s).is_some() }

  pub fn var(name: &str) -> Self { Formula::Var(Var::new(name)) }

  pub fn constant(value: bool) -> Self { Formula::Const(value) }

  #[allow(clippy::should_implement_trait)]
  pub fn not(f: Formula) -> Self { Formula::Not(Arc::new(f)) }

  pub fn binary(op: Binop, first: Formula, second: Formula) -> Self {
    Formula::Binary { op, first: Arc::new(first), second: Arc::new(second) }
  }

  pub fn implies(first: Formula, second: Formula) -> Self {
    Self::binary(Binop::Implies, first, second)
  }

  pub fn and(first: Formula, second: Formula) -> Self { Self::binary(Binop::And, first, second) }

  pub fn or(first: Formula, second: Formula) -> Self { Self::binary(Binop::Or, first, second) }

  /// The operator (or constant) at the root, `None` for a variable.
  pub fn root_operator(&self) -> Option<Operator> {
    match self {
      Formula::Const(true) => Some(Operator::T),
      Formula::Const(false) => Some(Operator::F),
      Formula::Var(_) => None,
      Formula::Not(_) => Some(Operator::Not),
      Formula::Binary { op, .. } => Some((*op).into()),
    }
  }

  pub fn first(&self) -> Option<&Formula> {
    match self {
      Formula::Not(f) | Formula::Binary { first: f, .. } => Some(f),
      _ => None,
    }
  }

  pub fn second(&self) -> Option<&Formula> {
    match self {
      Formula::Binary { second, .. } => Some(second),
      _ => None,
    }
  }

  /// If this is `(a->b)`, returns `(a, b)`.
  pub fn as_implication(&self) -> Option<(&Formula, &Formula)> {
    match self {
      Formula::Binary { op: Binop::Implies, first, second } => Some((first, second)),
      _ => None,
    }
  }

  /// If this is `~a`, returns `a`.
  pub fn as_negation(&self) -> Option<&Formula> {
    match self {
      Formula::Not(f) => Some(f),
      _ => None,
    }
  }

  fn collect_variables(&self, out: &mut BTreeSet<Var>) {
    match self {
      Formula::Const(_) => {}
      Formula::Var(v) => {
        out.insert(v.clone());
      }
      Formula::Not(f) => f.collect_variables(out),
      Formula::Binary { first, second, .. } => {
        first.collect_variables(out);
        second.collect_variables(out)
      }
    }
  }

  /// All variable names occurring in the formula.
  pub fn variables(&self) -> BTreeSet<Var> {
    let mut out = BTreeSet::new();
    self.collect_variables(&mut out);
    out
  }

  fn collect_operators(&self, out: &mut BTreeSet<Operator>) {
    out.extend(self.root_operator());
    if let Some(f) = self.first() {
      f.collect_operators(out)
    }
    if let Some(f) = self.second() {
      f.collect_operators(out)
    }
  }

  /// All operators occurring in the formula, including `T` and `F`.
  pub fn operators(&self) -> BTreeSet<Operator> {
    let mut out = BTreeSet::new();
    self.collect_operators(&mut out);
    out
  }
}

/// A copy-on-write traversal over a formula. Shared subtrees are only
/// copied on the way to a node that actually changes.
pub trait VisitMut {
  fn visit_formula(&mut self, f: &mut Formula) { self.super_visit_formula(f) }

  fn super_visit_formula(&mut self, f: &mut Formula) {
    match f {
      Formula::Const(_) | Formula::Var(_) => {}
      Formula::Not(f) => self.visit_formula(Arc::make_mut(f)),
      Formula::Binary { first, second, .. } => {
        self.visit_formula(Arc::make_mut(first));
        self.visit_formula(Arc::make_mut(second))
      }
    }
  }
}

impl Formula {
  pub fn visit(&mut self, v: &mut impl VisitMut) { v.visit_formula(self) }

  #[must_use]
  pub fn visit_cloned(&self, v: &mut impl VisitMut) -> Self {
    let mut f = self.clone();
    f.visit(v);
    f
  }
}

#[cfg(test)]
pub(crate) mod arbitrary {
  use super::*;
  use quickcheck::{Arbitrary, Gen};

  const VARS: [&str; 5] = ["p", "q", "r", "x1", "z12"];

  fn gen_formula(g: &mut Gen, depth: u32) -> Formula {
    let leaf = depth == 0 || u8::arbitrary(g) % 3 == 0;
    if leaf {
      match u8::arbitrary(g) % 6 {
        0 => Formula::Const(bool::arbitrary(g)),
        _ => Formula::var(g.choose(&VARS).unwrap()),
      }
    } else if bool::arbitrary(g) && bool::arbitrary(g) {
      Formula::not(gen_formula(g, depth - 1))
    } else {
      let op = *g.choose(&Binop::ALL).unwrap();
      Formula::binary(op, gen_formula(g, depth - 1), gen_formula(g, depth - 1))
    }
  }

  impl Arbitrary for Formula {
    fn arbitrary(g: &mut Gen) -> Self { gen_formula(g, 4) }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
      let children: Vec<_> = self.first().into_iter().chain(self.second()).cloned().collect();
      Box::new(children.into_iter())
    }
  }
}
