//! A small atom selection language.
//!
//! Expressions combine clauses with `and`, `or`, `not` and parentheses:
//!
//! ```text
//! name CA
//! name CA and chain A
//! resid 10-40 and not resname GLY
//! (name CA or name CB) and index 0-499
//! ```
//!
//! Supported clauses are `all`, `name`, `resname`, `element`, `chain` (each
//! taking one or more values), `resid` (numbers or `A-B`/`A:B` ranges) and
//! `index` (0-based atom indices or ranges).

use crate::core::models::atom::Atom;
use crate::core::models::topology::Topology;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Selection expression is empty")]
    Empty,
    #[error("Unexpected token '{0}' in selection")]
    UnexpectedToken(String),
    #[error("Unexpected end of selection; expected {0}")]
    UnexpectedEnd(&'static str),
    #[error("Invalid number '{0}' in selection")]
    InvalidNumber(String),
    #[error("Unknown selection keyword '{0}'")]
    UnknownKeyword(String),
}

#[derive(Debug, Clone, PartialEq)]
enum Clause {
    All,
    Name(Vec<String>),
    ResName(Vec<String>),
    Element(Vec<String>),
    Chain(Vec<char>),
    ResId(Vec<(isize, isize)>),
    Index(Vec<(usize, usize)>),
}

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Clause(Clause),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

/// A parsed atom selection. Parse once, then resolve against any topology.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomSelection {
    source: String,
    expr: Expr,
}

impl AtomSelection {
    pub fn parse(input: &str) -> Result<Self, SelectionError> {
        let tokens = tokenize(input);
        if tokens.is_empty() {
            return Err(SelectionError::Empty);
        }
        let mut parser = Parser { tokens, pos: 0 };
        let expr = parser.parse_or()?;
        if let Some(tok) = parser.peek() {
            return Err(SelectionError::UnexpectedToken(tok.to_string()));
        }
        Ok(Self {
            source: input.trim().to_string(),
            expr,
        })
    }

    /// The expression text this selection was parsed from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Resolves the selection to ascending atom indices of `topology`.
    pub fn resolve(&self, topology: &Topology) -> Vec<usize> {
        topology
            .atoms()
            .iter()
            .enumerate()
            .filter(|(index, atom)| self.expr.matches(*index, atom))
            .map(|(index, _)| index)
            .collect()
    }
}

impl FromStr for AtomSelection {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AtomSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Expr {
    fn matches(&self, index: usize, atom: &Atom) -> bool {
        match self {
            Expr::Clause(clause) => clause.matches(index, atom),
            Expr::Not(inner) => !inner.matches(index, atom),
            Expr::And(a, b) => a.matches(index, atom) && b.matches(index, atom),
            Expr::Or(a, b) => a.matches(index, atom) || b.matches(index, atom),
        }
    }
}

impl Clause {
    fn matches(&self, index: usize, atom: &Atom) -> bool {
        match self {
            Clause::All => true,
            Clause::Name(names) => names.iter().any(|n| n == &atom.name),
            Clause::ResName(names) => names.iter().any(|n| n == &atom.residue_name),
            Clause::Element(elements) => elements
                .iter()
                .any(|e| e.eq_ignore_ascii_case(&atom.element)),
            Clause::Chain(chains) => chains.contains(&atom.chain_id),
            Clause::ResId(ranges) => ranges
                .iter()
                .any(|&(lo, hi)| (lo..=hi).contains(&atom.residue_number)),
            Clause::Index(ranges) => ranges.iter().any(|&(lo, hi)| (lo..=hi).contains(&index)),
        }
    }
}

fn tokenize(input: &str) -> Vec<String> {
    input
        .replace('(', " ( ")
        .replace(')', " ) ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn is_reserved(token: &str) -> bool {
    matches!(token, "and" | "or" | "not" | "(" | ")")
}

struct Parser {
    tokens: Vec<String>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&str> {
        self.tokens.get(self.pos).map(String::as_str)
    }

    fn next(&mut self) -> Option<String> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn parse_or(&mut self) -> Result<Expr, SelectionError> {
        let mut lhs = self.parse_and()?;
        while self.peek() == Some("or") {
            self.pos += 1;
            let rhs = self.parse_and()?;
            lhs = Expr::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Expr, SelectionError> {
        let mut lhs = self.parse_factor()?;
        while self.peek() == Some("and") {
            self.pos += 1;
            let rhs = self.parse_factor()?;
            lhs = Expr::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_factor(&mut self) -> Result<Expr, SelectionError> {
        let tok = self
            .next()
            .ok_or(SelectionError::UnexpectedEnd("a selection clause"))?;
        match tok.as_str() {
            "not" => Ok(Expr::Not(Box::new(self.parse_factor()?))),
            "(" => {
                let inner = self.parse_or()?;
                match self.next() {
                    Some(t) if t == ")" => Ok(inner),
                    Some(t) => Err(SelectionError::UnexpectedToken(t)),
                    None => Err(SelectionError::UnexpectedEnd("')'")),
                }
            }
            keyword => self.parse_clause(keyword).map(Expr::Clause),
        }
    }

    fn values(&mut self) -> Result<Vec<String>, SelectionError> {
        let mut values = Vec::new();
        while let Some(tok) = self.peek() {
            if is_reserved(tok) {
                break;
            }
            values.push(tok.to_string());
            self.pos += 1;
        }
        if values.is_empty() {
            return Err(SelectionError::UnexpectedEnd("at least one value"));
        }
        Ok(values)
    }

    fn parse_clause(&mut self, keyword: &str) -> Result<Clause, SelectionError> {
        match keyword.to_ascii_lowercase().as_str() {
            "all" => Ok(Clause::All),
            "name" => Ok(Clause::Name(self.values()?)),
            "resname" => Ok(Clause::ResName(self.values()?)),
            "element" => Ok(Clause::Element(self.values()?)),
            "chain" | "segid" => {
                let values = self.values()?;
                values
                    .into_iter()
                    .map(|v| {
                        let mut chars = v.chars();
                        match (chars.next(), chars.next()) {
                            (Some(c), None) => Ok(c),
                            _ => Err(SelectionError::UnexpectedToken(v)),
                        }
                    })
                    .collect::<Result<_, _>>()
                    .map(Clause::Chain)
            }
            "resid" | "resnum" => self
                .values()?
                .iter()
                .map(|v| parse_range::<isize>(v))
                .collect::<Result<_, _>>()
                .map(Clause::ResId),
            "index" => self
                .values()?
                .iter()
                .map(|v| parse_range::<usize>(v))
                .collect::<Result<_, _>>()
                .map(Clause::Index),
            ")" => Err(SelectionError::UnexpectedToken(keyword.to_string())),
            _ => Err(SelectionError::UnknownKeyword(keyword.to_string())),
        }
    }
}

/// Parses `N`, `A-B` or `A:B`. A leading minus belongs to the first number.
fn parse_range<T>(value: &str) -> Result<(T, T), SelectionError>
where
    T: FromStr + Copy,
{
    let parse = |s: &str| {
        s.parse::<T>()
            .map_err(|_| SelectionError::InvalidNumber(value.to_string()))
    };

    let split_at = value
        .char_indices()
        .skip(1)
        .find(|&(_, c)| c == '-' || c == ':')
        .map(|(i, _)| i);

    match split_at {
        Some(i) => Ok((parse(&value[..i])?, parse(&value[i + 1..])?)),
        None => {
            let n = parse(value)?;
            Ok((n, n))
        }
    }
}
