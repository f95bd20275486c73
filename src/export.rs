use crate::proof::{Justification, Proof};
use crate::types::Formula;
use crate::Axiom;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use std::io::Write;

const INDENT: usize = 2;

impl Serialize for Formula {
  fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> { s.collect_str(self) }
}

impl<'de> Deserialize<'de> for Formula {
  fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
    let s = String::deserialize(d)?;
    s.parse().map_err(|e| de::Error::custom(format_args!("{s:?}: {e}")))
  }
}

impl Proof {
  /// The proof as JSON, with formulas in their canonical text form.
  pub fn to_json(&self) -> serde_json::Result<String> { serde_json::to_string_pretty(self) }

  /// Reads a proof written by [`Proof::to_json`]. The result is not checked.
  pub fn from_json(s: &str) -> serde_json::Result<Proof> { serde_json::from_str(s) }

  pub fn write_xml(&self, w: impl Write) -> quick_xml::Result<()> {
    let mut w = XmlWriter { w: quick_xml::Writer::new_with_indent(w, b' ', INDENT), pending: None };
    w.w.write_event(Event::Decl(BytesDecl::new("1.0", None, None)))?;
    w.write_proof(self)?;
    w.w.get_mut().write_all(b"\n")?;
    Ok(())
  }
}

struct Elem(BytesStart<'static>);

impl Elem {
  fn attr(&mut self, key: &str, value: impl ToString) {
    self.0.push_attribute((key, &*value.to_string()))
  }
}

struct XmlWriter<W: Write> {
  w: quick_xml::Writer<W>,
  /// A start tag not yet written, so that it can still become an empty tag.
  pending: Option<Elem>,
}

impl<W: Write> XmlWriter<W> {
  fn clear_pending(&mut self) -> quick_xml::Result<()> {
    if let Some(elem) = self.pending.take() {
      self.w.write_event(Event::Start(elem.0))?;
    }
    Ok(())
  }

  fn with(
    &mut self, tag: &'static str, attrs: impl FnOnce(&mut Elem),
    body: impl FnOnce(&mut Self) -> quick_xml::Result<()>,
  ) -> quick_xml::Result<()> {
    self.clear_pending()?;
    attrs(self.pending.insert(Elem(BytesStart::new(tag))));
    body(self)?;
    match self.pending.take() {
      Some(elem) => self.w.write_event(Event::Empty(elem.0)),
      None => self.w.write_event(Event::End(BytesEnd::new(tag))),
    }
  }

  fn with0(
    &mut self, tag: &'static str, body: impl FnOnce(&mut Self) -> quick_xml::Result<()>,
  ) -> quick_xml::Result<()> {
    self.with(tag, |_| {}, body)
  }

  fn formula(
    &mut self, tag: &'static str, attrs: impl FnOnce(&mut Elem), f: &Formula,
  ) -> quick_xml::Result<()> {
    self.with(tag, attrs, |w| {
      w.clear_pending()?;
      w.w.write_event(Event::Text(BytesText::new(&f.to_string())))
    })
  }

  fn write_proof(&mut self, proof: &Proof) -> quick_xml::Result<()> {
    let rules: Vec<_> = proof.rules.iter().collect();
    self.with0("Proof", |w| {
      w.with0("Statement", |w| {
        for a in &proof.statement.assumptions {
          w.formula("Assumption", |_| {}, a)?
        }
        w.formula("Conclusion", |_| {}, &proof.statement.conclusion)
      })?;
      w.with0("Rules", |w| {
        for (nr, rule) in rules.iter().enumerate() {
          let attrs = |e: &mut Elem| {
            e.attr("nr", nr);
            if let Some(ax) = Axiom::of_rule(rule) {
              e.attr("name", ax.name())
            }
          };
          w.with("Rule", attrs, |w| {
            for a in &rule.assumptions {
              w.formula("Assumption", |_| {}, a)?
            }
            w.formula("Conclusion", |_| {}, &rule.conclusion)
          })?
        }
        Ok(())
      })?;
      w.with0("Lines", |w| {
        for (i, line) in proof.lines.enum_iter() {
          let attrs = |e: &mut Elem| {
            e.attr("nr", i);
            if let Justification::Rule { rule, premises } = &line.just {
              if let Some(nr) = rules.iter().position(|r| *r == rule) {
                e.attr("rule", nr)
              }
              e.attr("refs", premises.iter().map(|j| j.to_string()).collect::<Vec<_>>().join(" "))
            }
          };
          w.formula("Line", attrs, &line.formula)?
        }
        Ok(())
      })
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{InferenceRule, ProofBuilder};

  fn mp_proof() -> Proof {
    let (p, q) = (Formula::var("p"), Formula::parse("(q<->r)"));
    let pq = Formula::implies(p.clone(), q.clone());
    let mut b = ProofBuilder::new();
    let l0 = b.assumption(p.clone());
    let l1 = b.assumption(pq.clone());
    b.mp(q.clone(), l0, l1);
    b.finish(InferenceRule::new(vec![p, pq], q), [Axiom::Mp.rule().clone()].into_iter().collect())
  }

  #[test]
  fn formulas_as_strings() {
    let f = Formula::parse("(p->~q)");
    assert_eq!(serde_json::to_string(&f).unwrap(), r#""(p->~q)""#);
    assert_eq!(serde_json::from_str::<Formula>(r#""(p->~q)""#).unwrap(), f);
    assert!(serde_json::from_str::<Formula>(r#""(p->""#).is_err());
  }

  #[test]
  fn json_round_trip() {
    let proof = mp_proof();
    let json = proof.to_json().unwrap();
    assert!(json.contains(r#""(p->(q<->r))""#), "{json}");
    let back = Proof::from_json(&json).unwrap();
    assert!(back == proof);
    assert!(back.is_valid());
  }

  #[test]
  fn xml() {
    let mut out = vec![];
    mp_proof().write_xml(&mut out).unwrap();
    let xml = String::from_utf8(out).unwrap();
    assert!(xml.starts_with(r#"<?xml version="1.0"?>"#), "{xml}");
    assert!(xml.contains(r#"<Rule nr="0" name="MP">"#), "{xml}");
    assert!(xml.contains("<Conclusion>(q&lt;-&gt;r)</Conclusion>"), "{xml}");
    assert!(xml.contains(r#"<Line nr="0">p</Line>"#), "{xml}");
    assert!(xml.contains(r#"<Line nr="2" rule="0" refs="0 1">(q&lt;-&gt;r)</Line>"#), "{xml}");
    assert!(xml.ends_with("</Proof>\n"), "{xml}");
  }
}
