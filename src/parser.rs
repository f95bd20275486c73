//! Text to [`Formula`], in both infix and polish notation.
//!
//! Parsing never panics on malformed input (except in [`Formula::parse`] and
//! [`Formula::parse_polish`], which are only defined on valid strings).

use crate::error::{ParseError, ParseFailure};
use crate::types::{Binop, Formula};
use std::str::FromStr;

/// Splits off the first token of `s`.
///
/// A token starting with `-` is two characters long and one starting with `<`
/// is three; otherwise it is one character, and a variable letter takes all
/// the decimal digits that follow it.
fn next_token(s: &str) -> (&str, &str) {
  let len = match s.as_bytes().first() {
    None => return ("", s),
    Some(b'-') => 2,
    Some(b'<') => 3,
    Some(_) => s.chars().next().map_or(0, char::len_utf8),
  };
  let len = (len.min(s.len())..=s.len()).find(|&i| s.is_char_boundary(i)).unwrap_or(s.len());
  let (tok, _) = s.split_at(len);
  let len = if Formula::is_variable_name(tok) {
    len + s[len..].bytes().take_while(u8::is_ascii_digit).count()
  } else {
    len
  };
  s.split_at(len)
}

type PResult<'a> = Result<(Formula, &'a str), ParseFailure<'a>>;

/// Nesting beyond this many operators is rejected rather than recursed into.
pub const MAX_DEPTH: usize = 500;

fn too_deep(s: &str) -> ParseFailure<'_> { ParseFailure::new(ParseError::TooDeep, s) }

fn infix(s: &str, depth: usize) -> PResult<'_> {
  let (tok, rest) = next_token(s);
  match tok {
    "" => Err(ParseFailure::new(ParseError::Empty, s)),
    "T" => Ok((Formula::Const(true), rest)),
    "F" => Ok((Formula::Const(false), rest)),
    "~" | "(" if depth == 0 => Err(too_deep(s)),
    "~" => {
      let (f, rest) = infix(rest, depth - 1)?;
      Ok((Formula::not(f), rest))
    }
    "(" => {
      let (first, rest) = infix(rest, depth - 1)?;
      let (op, rest2) = next_token(rest);
      let Some(op) = Binop::from_symbol(op) else {
        return Err(ParseFailure::new(ParseError::NotABinaryOperator(op.into()), rest))
      };
      let (second, rest) = infix(rest2, depth - 1)?;
      match rest.strip_prefix(')') {
        Some(rest) => Ok((Formula::binary(op, first, second), rest)),
        None => Err(ParseFailure::new(ParseError::MissingCloseParen, rest)),
      }
    }
    _ if Formula::is_variable_name(tok) => Ok((Formula::Var(tok.into()), rest)),
    _ => Err(ParseFailure::new(ParseError::UnexpectedToken(tok.into()), s)),
  }
}

fn polish(s: &str, depth: usize) -> PResult<'_> {
  let (tok, rest) = next_token(s);
  match tok {
    "" => Err(ParseFailure::new(ParseError::Empty, s)),
    "T" => Ok((Formula::Const(true), rest)),
    "F" => Ok((Formula::Const(false), rest)),
    _ if Formula::is_variable_name(tok) => Ok((Formula::Var(tok.into()), rest)),
    _ if depth == 0 && (tok == "~" || Formula::is_binary_name(tok)) => Err(too_deep(s)),
    "~" => {
      let (f, rest) = polish(rest, depth - 1)?;
      Ok((Formula::not(f), rest))
    }
    _ => match Binop::from_symbol(tok) {
      Some(op) => {
        let (first, rest) = polish(rest, depth - 1)?;
        let (second, rest) = polish(rest, depth - 1)?;
        Ok((Formula::binary(op, first, second), rest))
      }
      None => Err(ParseFailure::new(ParseError::UnexpectedToken(tok.into()), s)),
    },
  }
}

impl Formula {
  /// Parses the longest formula at the front of `s`, returning it along with
  /// the unconsumed suffix. Formulas nested deeper than [`MAX_DEPTH`] fail
  /// with [`ParseError::TooDeep`].
  pub fn parse_prefix(s: &str) -> PResult<'_> { infix(s, MAX_DEPTH) }

  /// Is `s` exactly the text of one formula?
  ///
  /// This takes a single prefix parse, so a juxtaposition like `"pq"` is
  /// rejected even though each piece parses on its own.
  pub fn is_formula(s: &str) -> bool { matches!(Self::parse_prefix(s), Ok((_, ""))) }

  /// Parses a string for which [`Formula::is_formula`] holds.
  pub fn parse(s: &str) -> Self {
    match s.parse() {
      Ok(f) => f,
      Err(e) => panic!("not a formula: {s:?}: {e}"),
    }
  }

  pub fn parse_polish_prefix(s: &str) -> PResult<'_> { polish(s, MAX_DEPTH) }

  pub fn try_parse_polish(s: &str) -> Result<Self, ParseError> {
    match Self::parse_polish_prefix(s) {
      Ok((f, "")) => Ok(f),
      Ok((_, rest)) => Err(ParseError::TrailingInput(rest.into())),
      Err(e) => Err(e.error),
    }
  }

  /// Parses a valid polish notation string.
  pub fn parse_polish(s: &str) -> Self {
    match Self::try_parse_polish(s) {
      Ok(f) => f,
      Err(e) => panic!("not a formula in polish notation: {s:?}: {e}"),
    }
  }
}

impl FromStr for Formula {
  type Err = ParseError;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match Self::parse_prefix(s) {
      Ok((f, "")) => Ok(f),
      Ok((_, rest)) => Err(ParseError::TrailingInput(rest.into())),
      Err(e) => Err(e.error),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use quickcheck::quickcheck;

  #[test]
  fn tokens() {
    assert_eq!(next_token("->q)"), ("->", "q)"));
    assert_eq!(next_token("<->p"), ("<->", "p"));
    assert_eq!(next_token("x12&y"), ("x12", "&y"));
    assert_eq!(next_token("a12"), ("a", "12"));
    assert_eq!(next_token("-"), ("-", ""));
    assert_eq!(next_token("-é"), ("-é", ""));
    assert_eq!(next_token(""), ("", ""));
  }

  #[test]
  fn prefixes() {
    let (f, rest) = Formula::parse_prefix("p3").unwrap();
    assert_eq!((f, rest), (Formula::var("p3"), ""));
    let (f, rest) = Formula::parse_prefix("~x12p").unwrap();
    assert_eq!((f, rest), (Formula::not(Formula::var("x12")), "p"));
    let (f, rest) = Formula::parse_prefix("(p->q))").unwrap();
    assert_eq!(f.to_string(), "(p->q)");
    assert_eq!(rest, ")");
    let (f, rest) = Formula::parse_prefix("((p<->q)-|~T)").unwrap();
    assert_eq!(f.to_string(), "((p<->q)-|~T)");
    assert_eq!(rest, "");
  }

  #[test]
  fn prefix_failures() {
    for s in ["", "~", "(p", "(p&q", "(p~q)", "(p&)", "a", ")", "(p->q", "((p&q)"] {
      assert!(Formula::parse_prefix(s).is_err(), "{s:?} should fail");
    }
    assert_eq!(Formula::parse_prefix("(p&q").unwrap_err().error, ParseError::MissingCloseParen);
    assert_eq!(
      Formula::parse_prefix("(p=q)").unwrap_err().error,
      ParseError::NotABinaryOperator("=".into())
    );
  }

  #[test]
  fn formulas() {
    for s in ["p", "T", "~~F", "(p&q)", "((x1|~y)+(z<->T))", "(p-&(q-|r))"] {
      assert!(Formula::is_formula(s), "{s:?}");
      assert_eq!(Formula::parse(s).to_string(), s);
    }
    for s in ["", "pq", "p)", "(p)", "(p&q&r)", "p q", " p", "(p->q)x"] {
      assert!(!Formula::is_formula(s), "{s:?}");
    }
    assert_eq!("pq".parse::<Formula>(), Err(ParseError::TrailingInput("q".into())));
  }

  #[test]
  fn deep_nesting_fails_cleanly() {
    let opens = "(".repeat(20_000);
    assert!(!Formula::is_formula(&opens));
    assert_eq!(Formula::parse_prefix(&opens).unwrap_err().error, ParseError::TooDeep);
    assert_eq!(Formula::try_parse_polish(&"~".repeat(20_000)), Err(ParseError::TooDeep));
    assert_eq!(Formula::try_parse_polish(&"&".repeat(20_000)), Err(ParseError::TooDeep));

    let nots = format!("{}p", "~".repeat(MAX_DEPTH));
    assert!(Formula::is_formula(&nots));
    assert!(!Formula::is_formula(&format!("~{nots}")));
  }

  #[test]
  #[should_panic]
  fn parse_asserts() { Formula::parse("(p&"); }

  #[test]
  fn polish() {
    let f = Formula::parse("~(~(p->q7)&~T)");
    assert_eq!(f.polish(), "~&~->pq7~T");
    assert_eq!(Formula::parse_polish("~&~->pq7~T"), f);
    assert_eq!(Formula::parse_polish("<->x1-|y2F"), Formula::parse("(x1<->(y2-|F))"));
    assert!(Formula::try_parse_polish("&p").is_err());
    assert!(Formula::try_parse_polish("pq").is_err());
  }

  quickcheck! {
    fn print_parse_round_trip(f: Formula) -> bool {
      let s = f.to_string();
      Formula::is_formula(&s) && Formula::parse(&s) == f
    }

    fn polish_round_trip(f: Formula) -> bool {
      Formula::parse_polish(&f.polish()) == f
    }

    fn proper_prefixes_are_not_formulas(f: Formula) -> bool {
      let s = f.to_string();
      (1..s.len()).filter(|&i| s.is_char_boundary(i)).all(|i| {
        // a variable may be cut between its digits
        !Formula::is_formula(&s[..i]) || s.as_bytes()[i].is_ascii_digit()
      })
    }
  }
}
