use crate::types::LineId;
use std::fmt;

/// Why a string is not (a prefix of) a formula.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
  /// Ran out of input where a formula was expected.
  Empty,
  UnexpectedToken(String),
  NotABinaryOperator(String),
  MissingCloseParen,
  /// Operators nested deeper than [`MAX_DEPTH`](crate::MAX_DEPTH).
  TooDeep,
  /// A formula was parsed but input remains.
  TrailingInput(String),
}

impl fmt::Display for ParseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ParseError::Empty => write!(f, "expected a formula, found end of input"),
      ParseError::UnexpectedToken(tok) => write!(f, "unexpected token '{tok}'"),
      ParseError::NotABinaryOperator(tok) => write!(f, "expected a binary operator, found '{tok}'"),
      ParseError::MissingCloseParen => write!(f, "expected ')'"),
      ParseError::TooDeep => write!(f, "formula nested too deeply"),
      ParseError::TrailingInput(rest) => write!(f, "unexpected input after formula: '{rest}'"),
    }
  }
}

impl std::error::Error for ParseError {}

/// A failed prefix parse. `rest` is wherever the parser gave up, which is not
/// necessarily meaningful to resume from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseFailure<'a> {
  pub error: ParseError,
  pub rest: &'a str,
}

impl<'a> ParseFailure<'a> {
  pub fn new(error: ParseError, rest: &'a str) -> Self { Self { error, rest } }
}

impl fmt::Display for ParseFailure<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.error.fmt(f) }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineError {
  AssumptionNotInStatement,
  RuleNotAllowed,
  /// A premise refers to this line or a later one.
  ForwardReference(LineId),
  /// The cited premises and conclusion are not an instance of the cited rule.
  NotASpecialization,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProofError {
  Empty,
  /// The last line does not prove the statement's conclusion.
  WrongConclusion,
  Line(LineId, LineError),
}

impl fmt::Display for ProofError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ProofError::Empty => write!(f, "proof has no lines"),
      ProofError::WrongConclusion => write!(f, "last line is not the statement's conclusion"),
      ProofError::Line(i, LineError::AssumptionNotInStatement) =>
        write!(f, "line {i}: not an assumption of the statement"),
      ProofError::Line(i, LineError::RuleNotAllowed) => write!(f, "line {i}: rule not allowed"),
      ProofError::Line(i, LineError::ForwardReference(j)) =>
        write!(f, "line {i}: refers to line {j}, which is not earlier"),
      ProofError::Line(i, LineError::NotASpecialization) =>
        write!(f, "line {i}: not a specialization of the cited rule"),
    }
  }
}

impl std::error::Error for ProofError {}
