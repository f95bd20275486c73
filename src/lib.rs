//! Propositional logic: formulas and their parser, truth-table semantics, and
//! a Hilbert-style proof calculus together with the maneuvers that build new
//! proofs out of old ones (the deduction theorem and its corollaries, and the
//! tautology theorem on top of them).
//!
//! ```
//! use propcalc::{deduction, Axiom, Formula, InferenceRule, ProofBuilder};
//!
//! let (p, q) = (Formula::var("p"), Formula::var("q"));
//! let pq = Formula::implies(p.clone(), q.clone());
//! let statement = InferenceRule::new(vec![pq.clone(), p.clone()], q.clone());
//! let mut b = ProofBuilder::new();
//! let l0 = b.assumption(p.clone());
//! let l1 = b.assumption(pq.clone());
//! b.mp(q.clone(), l0, l1);
//! let proof = b.finish(statement, [Axiom::Mp.rule().clone()].into_iter().collect());
//! assert!(proof.is_valid());
//!
//! let lifted = deduction::remove_assumption(&proof);
//! assert!(lifted.is_valid());
//! assert_eq!(lifted.statement.conclusion.to_string(), "(p->q)");
//! ```

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Mutex, RwLock};

mod axioms;
pub mod deduction;
mod error;
mod export;
mod format;
pub mod operators;
mod parser;
mod proof;
pub mod semantics;
pub mod soundness;
mod subst;
pub mod tautology;
mod types;

pub use axioms::*;
pub use error::*;
pub use format::TruthTable;
pub use parser::MAX_DEPTH;
pub use proof::*;
pub use semantics::Model;
pub use subst::{formula_specialization_map, merge_specialization_maps};
pub use types::*;

pub fn stat(s: &'static str) {
  *STATS.lock().unwrap().get_or_insert_with(HashMap::new).entry(s).or_default() += 1;
}

/// Returns the event counters collected by [`stat`] so far, sorted, and resets them.
pub fn take_stats() -> Vec<(&'static str, u32)> {
  let mut vec: Vec<_> = STATS.lock().unwrap().take().unwrap_or_default().into_iter().collect();
  vec.sort();
  vec
}

#[macro_export]
macro_rules! vprintln {
  ($($args:tt)*) => {
    if $crate::verbose() {
      eprintln!($($args)*)
    }
  };
}

static VERBOSE: AtomicBool = AtomicBool::new(false);
pub fn verbose() -> bool { DEBUG && VERBOSE.load(std::sync::atomic::Ordering::SeqCst) }
pub fn set_verbose(b: bool) { VERBOSE.store(b, std::sync::atomic::Ordering::SeqCst) }

static STATS: Mutex<Option<HashMap<&'static str, u32>>> = Mutex::new(None);

const DEBUG: bool = cfg!(debug_assertions);

#[derive(Clone, Debug)]
pub struct Config {
  /// Every proof produced by a maneuver is checked with [`Proof::check`]
  /// before it is handed back.
  pub verify_constructed: bool,
  /// [`Proof::check`] panics on the first bad line instead of returning an error.
  /// Useful to get a backtrace pointing at whoever built the proof.
  pub panic_on_invalid: bool,
  /// Log every maneuver with the sizes of its input and output.
  pub trace_maneuvers: bool,
}

impl Default for Config {
  fn default() -> Self {
    Self { verify_constructed: DEBUG, panic_on_invalid: false, trace_maneuvers: DEBUG }
  }
}

impl Config {
  /// The default configuration adjusted by the `PROPCALC_*` environment variables.
  /// `PROPCALC_VERBOSE` also turns on [`verbose`] output.
  pub fn from_env() -> Self {
    let mut cfg = Self::default();
    if std::env::var("PROPCALC_VERBOSE").is_ok() {
      set_verbose(true)
    }
    cfg.verify_constructed &= std::env::var("PROPCALC_NO_VERIFY").is_err();
    cfg.panic_on_invalid |= std::env::var("PROPCALC_PANIC_ON_INVALID").is_ok();
    cfg
  }
}

static CONFIG: Lazy<RwLock<Config>> = Lazy::new(Default::default);

pub fn config() -> Config { CONFIG.read().unwrap().clone() }

pub fn set_config(cfg: Config) { *CONFIG.write().unwrap() = cfg }
