use crate::proof::{InferenceRule, Justification, Proof};
use crate::semantics::{all_models, evaluate};
use crate::types::*;
use crate::Axiom;
use itertools::Itertools;
use pretty::{Arena, DocAllocator, DocBuilder};
use std::fmt::{self, Write};

const WIDTH: usize = 100;

impl fmt::Display for Formula {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Formula::Const(true) => f.write_char('T'),
      Formula::Const(false) => f.write_char('F'),
      Formula::Var(v) => f.write_str(v),
      Formula::Not(g) => write!(f, "~{g}"),
      Formula::Binary { op, first, second } => write!(f, "({first}{}{second})", op.symbol()),
    }
  }
}

impl fmt::Debug for Formula {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { fmt::Display::fmt(self, f) }
}

impl Formula {
  fn write_polish(&self, out: &mut String) {
    match self {
      Formula::Const(_) | Formula::Var(_) => write!(out, "{self}").unwrap(),
      Formula::Not(g) => {
        out.push('~');
        g.write_polish(out)
      }
      Formula::Binary { op, first, second } => {
        out.push_str(op.symbol());
        first.write_polish(out);
        second.write_polish(out)
      }
    }
  }

  /// The formula in prefix notation, without parentheses.
  pub fn polish(&self) -> String {
    let mut out = String::new();
    self.write_polish(&mut out);
    out
  }
}

impl fmt::Display for InferenceRule {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "[{}] ==> {}", self.assumptions.iter().format(", "), self.conclusion)
  }
}

impl fmt::Debug for InferenceRule {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { fmt::Display::fmt(self, f) }
}

struct Pretty<'a> {
  arena: &'a Arena<'a>,
  comma: Doc<'a>,
}

impl Pretty<'_> {
  fn with<R>(f: impl for<'b> FnOnce(&'b Pretty<'b>) -> R) -> R {
    let arena = Arena::new();
    f(&Pretty { arena: &arena, comma: arena.text(",").append(arena.line()) })
  }
}

impl<'a> std::ops::Deref for Pretty<'a> {
  type Target = &'a Arena<'a>;
  fn deref(&self) -> &Self::Target { &self.arena }
}

type Doc<'a> = DocBuilder<'a, Arena<'a>>;

impl<'a> Pretty<'a> {
  fn commas(&self, docs: impl IntoIterator<Item = Doc<'a>>) -> Doc<'a> {
    self.intersperse(docs, self.comma.clone()).nest(2).group()
  }

  fn rule(&self, rule: &InferenceRule) -> Doc<'a> {
    let assumptions = self.commas(rule.assumptions.iter().map(|f| self.as_string(f)));
    assumptions
      .brackets()
      .append(self.line())
      .append("==> ")
      .append(self.as_string(&rule.conclusion))
      .nest(2)
      .group()
  }

  fn named_rule(&self, rule: &InferenceRule) -> Doc<'a> {
    match Axiom::of_rule(rule) {
      Some(ax) => self.text(format!("{}: ", ax.name())).append(self.rule(rule)),
      None => self.rule(rule),
    }
  }

  fn proof(&self, proof: &Proof) -> Doc<'a> {
    let header = self
      .text("Proof of")
      .append(self.line())
      .append(self.rule(&proof.statement))
      .append(self.line())
      .append("via inference rules:")
      .nest(2)
      .group();
    let rules = self.concat(proof.rules.iter().map(|r| self.hardline().append(self.named_rule(r))));
    let lines = self.concat(proof.lines.enum_iter().map(|(i, line)| {
      let just = match &line.just {
        Justification::Assumption => self.text("(Assumption)"),
        Justification::Rule { rule, premises } => {
          let name = match Axiom::of_rule(rule) {
            Some(ax) => self.text(ax.name()),
            None => self.rule(rule),
          };
          let doc = self.text("(Inference Rule ").append(name);
          let doc = match &**premises {
            [] => doc,
            _ => doc
              .append(self.line())
              .append("on ")
              .append(self.commas(premises.iter().map(|j| self.as_string(j)))),
          };
          doc.append(")").nest(2).group()
        }
      };
      let doc = self
        .text(format!("{i:3}) "))
        .append(self.as_string(&line.formula))
        .append(self.line())
        .append(just)
        .nest(6)
        .group();
      self.hardline().append(doc)
    }));
    header
      .append(rules.nest(2))
      .append(self.hardline())
      .append("Lines:")
      .append(lines)
      .append(self.hardline())
      .append("QED")
  }
}

impl fmt::Display for Proof {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    Pretty::with(|p| p.proof(self).render_fmt(WIDTH, f))
  }
}

impl fmt::Debug for Proof {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { fmt::Display::fmt(self, f) }
}

/// The truth table of a formula, rendered as a markdown table with the
/// variable columns sorted by name.
pub struct TruthTable<'a>(pub &'a Formula);

impl fmt::Display for TruthTable<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let vars = self.0.variables();
    let text = self.0.to_string();
    let tf = |b: bool| if b { 'T' } else { 'F' };
    writeln!(f, "| {} | {text} |", vars.iter().format(" | "))?;
    writeln!(
      f,
      "|-{}-|-{}-|",
      vars.iter().map(|v| "-".repeat(v.len())).format("-|-"),
      "-".repeat(text.len())
    )?;
    for model in all_models(&vars) {
      let cells = vars.iter().map(|v| format!("{:w$}", tf(model[v]), w = v.len()));
      let value = tf(evaluate(self.0, &model));
      writeln!(f, "| {} | {value:w$} |", cells.format(" | "), w = text.len())?;
    }
    Ok(())
  }
}
