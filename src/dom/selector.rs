//! CSS selector subset.
//!
//! Supported grammar:
//!
//! - type (`span`), universal (`*`), id (`#about`), class (`.nav__link`)
//! - attributes: `[attr]`, `[attr=v]`, `[attr~=v]`, `[attr^=v]`, `[attr$=v]`, `[attr*=v]`
//! - pseudo-classes: `:first-child`, `:last-child`, `:first-of-type`,
//!   `:last-of-type`, `:nth-child(An+B)`, `:nth-of-type(An+B)`, `:not(compound)`
//! - combinators: descendant (whitespace) and child (`>`)
//! - selector lists separated by `,`

use super::{Document, NodeId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("unexpected end of selector")]
    UnexpectedEnd,

    #[error("unexpected character '{found}' at offset {offset}")]
    Unexpected { found: char, offset: usize },

    #[error("unsupported pseudo-class ':{0}'")]
    UnsupportedPseudo(String),

    #[error("invalid nth expression '{0}'")]
    InvalidNth(String),
}

/// A parsed, comma-separated list of selectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList(Vec<Complex>);

#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    compounds: Vec<Compound>,
    /// `combinators[i]` joins `compounds[i]` and `compounds[i + 1]`.
    combinators: Vec<Combinator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrSelector>,
    pseudos: Vec<Pseudo>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrSelector {
    name: String,
    op: AttrOp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrOp {
    Exists,
    Equals(String),
    Includes(String),
    Prefix(String),
    Suffix(String),
    Substring(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Pseudo {
    NthChild(Nth),
    NthLastChild(Nth),
    NthOfType(Nth),
    NthLastOfType(Nth),
    Not(Box<Compound>),
}

/// `An+B`: matches 1-based positions `p` where `p = a*n + b` for some `n >= 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Nth {
    a: i64,
    b: i64,
}

impl Nth {
    const FIRST: Nth = Nth { a: 0, b: 1 };

    fn matches(&self, position: i64) -> bool {
        if self.a == 0 {
            return position == self.b;
        }
        // Widened so extreme `b` values cannot overflow
        let diff = i128::from(position) - i128::from(self.b);
        let a = i128::from(self.a);
        diff % a == 0 && diff / a >= 0
    }

    fn parse(expr: &str) -> Result<Nth, SelectorError> {
        let compact: String = expr
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        let invalid = || SelectorError::InvalidNth(expr.to_string());

        match compact.as_str() {
            "odd" => return Ok(Nth { a: 2, b: 1 }),
            "even" => return Ok(Nth { a: 2, b: 0 }),
            _ => {}
        }

        match compact.split_once('n') {
            None => compact
                .parse::<i64>()
                .map(|b| Nth { a: 0, b })
                .map_err(|_| invalid()),
            Some((a, b)) => {
                let a = match a {
                    "" | "+" => 1,
                    "-" => -1,
                    other => other.parse::<i64>().map_err(|_| invalid())?,
                };
                let b = if b.is_empty() {
                    0
                } else {
                    b.parse::<i64>().map_err(|_| invalid())?
                };
                Ok(Nth { a, b })
            }
        }
    }
}

impl SelectorList {
    pub fn parse(input: &str) -> Result<SelectorList, SelectorError> {
        let mut parser = Parser {
            chars: input.chars().collect(),
            pos: 0,
        };
        let mut list = Vec::new();
        loop {
            parser.skip_whitespace();
            list.push(parser.complex()?);
            parser.skip_whitespace();
            match parser.peek() {
                None => break,
                Some(',') => parser.pos += 1,
                Some(found) => {
                    return Err(SelectorError::Unexpected {
                        found,
                        offset: parser.pos,
                    })
                }
            }
        }
        Ok(SelectorList(list))
    }

    /// Whether the element `node` matches any selector in the list.
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        doc.element(node).is_some()
            && self
                .0
                .iter()
                .any(|complex| matches_complex(doc, complex, complex.compounds.len() - 1, node))
    }
}

fn matches_complex(doc: &Document, complex: &Complex, index: usize, node: NodeId) -> bool {
    if !matches_compound(doc, &complex.compounds[index], node) {
        return false;
    }
    if index == 0 {
        return true;
    }
    match complex.combinators[index - 1] {
        Combinator::Child => parent_element(doc, node)
            .map(|parent| matches_complex(doc, complex, index - 1, parent))
            .unwrap_or(false),
        Combinator::Descendant => {
            let mut ancestor = parent_element(doc, node);
            while let Some(candidate) = ancestor {
                if matches_complex(doc, complex, index - 1, candidate) {
                    return true;
                }
                ancestor = parent_element(doc, candidate);
            }
            false
        }
    }
}

fn parent_element(doc: &Document, node: NodeId) -> Option<NodeId> {
    doc.parent(node).filter(|parent| doc.element(*parent).is_some())
}

fn matches_compound(doc: &Document, compound: &Compound, node: NodeId) -> bool {
    let Some(el) = doc.element(node) else {
        return false;
    };

    if let Some(tag) = &compound.tag {
        if !el.name.eq_ignore_ascii_case(tag) {
            return false;
        }
    }
    if let Some(id) = &compound.id {
        if doc.attr(node, "id") != Some(id.as_str()) {
            return false;
        }
    }
    if !compound.classes.iter().all(|class| doc.has_class(node, class)) {
        return false;
    }
    if !compound.attrs.iter().all(|attr| matches_attr(doc, attr, node)) {
        return false;
    }
    compound
        .pseudos
        .iter()
        .all(|pseudo| matches_pseudo(doc, pseudo, node))
}

fn matches_attr(doc: &Document, selector: &AttrSelector, node: NodeId) -> bool {
    let Some(value) = doc.attr(node, &selector.name) else {
        return false;
    };
    match &selector.op {
        AttrOp::Exists => true,
        AttrOp::Equals(expected) => value == expected,
        AttrOp::Includes(expected) => value.split_ascii_whitespace().any(|v| v == expected),
        AttrOp::Prefix(expected) => !expected.is_empty() && value.starts_with(expected.as_str()),
        AttrOp::Suffix(expected) => !expected.is_empty() && value.ends_with(expected.as_str()),
        AttrOp::Substring(expected) => !expected.is_empty() && value.contains(expected.as_str()),
    }
}

fn matches_pseudo(doc: &Document, pseudo: &Pseudo, node: NodeId) -> bool {
    match pseudo {
        Pseudo::Not(inner) => !matches_compound(doc, inner, node),
        Pseudo::NthChild(nth) => position(doc, node, false, false).is_some_and(|p| nth.matches(p)),
        Pseudo::NthLastChild(nth) => {
            position(doc, node, false, true).is_some_and(|p| nth.matches(p))
        }
        Pseudo::NthOfType(nth) => position(doc, node, true, false).is_some_and(|p| nth.matches(p)),
        Pseudo::NthLastOfType(nth) => {
            position(doc, node, true, true).is_some_and(|p| nth.matches(p))
        }
    }
}

/// 1-based index of `node` among its element siblings, optionally only
/// counting siblings with the same tag, optionally counting from the end.
fn position(doc: &Document, node: NodeId, same_type: bool, from_end: bool) -> Option<i64> {
    let parent = doc.parent(node)?;
    let name = doc.tag_name(node)?;
    let mut siblings: Vec<NodeId> = doc
        .element_children(parent)
        .filter(|sibling| !same_type || doc.tag_name(*sibling) == Some(name))
        .collect();
    if from_end {
        siblings.reverse();
    }
    siblings
        .iter()
        .position(|sibling| *sibling == node)
        .map(|i| i as i64 + 1)
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_whitespace()) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn expect(&mut self, expected: char) -> Result<(), SelectorError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(found) => Err(SelectorError::Unexpected {
                found,
                offset: self.pos,
            }),
            None => Err(SelectorError::UnexpectedEnd),
        }
    }

    fn unexpected(&self) -> SelectorError {
        match self.peek() {
            Some(found) => SelectorError::Unexpected {
                found,
                offset: self.pos,
            },
            None => SelectorError::UnexpectedEnd,
        }
    }

    fn complex(&mut self) -> Result<Complex, SelectorError> {
        let mut compounds = vec![self.compound()?];
        let mut combinators = Vec::new();

        loop {
            let had_whitespace = self.skip_whitespace();
            let combinator = match self.peek() {
                None | Some(',') | Some(')') => break,
                Some('>') => {
                    self.pos += 1;
                    self.skip_whitespace();
                    Combinator::Child
                }
                Some(_) if had_whitespace => Combinator::Descendant,
                Some(_) => return Err(self.unexpected()),
            };
            combinators.push(combinator);
            compounds.push(self.compound()?);
        }

        Ok(Complex {
            compounds,
            combinators,
        })
    }

    fn compound(&mut self) -> Result<Compound, SelectorError> {
        let mut compound = Compound::default();
        let mut any = false;

        match self.peek() {
            Some('*') => {
                self.pos += 1;
                any = true;
            }
            Some(c) if is_ident_start(c) => {
                compound.tag = Some(self.ident()?.to_ascii_lowercase());
                any = true;
            }
            _ => {}
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    compound.id = Some(self.ident()?);
                }
                Some('.') => {
                    self.pos += 1;
                    compound.classes.push(self.ident()?);
                }
                Some('[') => {
                    self.pos += 1;
                    compound.attrs.push(self.attribute()?);
                }
                Some(':') => {
                    self.pos += 1;
                    compound.pseudos.push(self.pseudo()?);
                }
                _ => break,
            }
            any = true;
        }

        if any {
            Ok(compound)
        } else {
            Err(self.unexpected())
        }
    }

    fn ident(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.unexpected());
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn attribute(&mut self) -> Result<AttrSelector, SelectorError> {
        self.skip_whitespace();
        let name = self.ident()?;
        self.skip_whitespace();

        let op_char = match self.peek() {
            Some(']') => {
                self.pos += 1;
                return Ok(AttrSelector {
                    name,
                    op: AttrOp::Exists,
                });
            }
            Some('=') => None,
            Some(c @ ('~' | '^' | '$' | '*')) => {
                self.pos += 1;
                Some(c)
            }
            _ => return Err(self.unexpected()),
        };
        self.expect('=')?;
        self.skip_whitespace();
        let value = self.attribute_value()?;
        self.skip_whitespace();
        self.expect(']')?;

        let op = match op_char {
            None => AttrOp::Equals(value),
            Some('~') => AttrOp::Includes(value),
            Some('^') => AttrOp::Prefix(value),
            Some('$') => AttrOp::Suffix(value),
            _ => AttrOp::Substring(value),
        };
        Ok(AttrSelector { name, op })
    }

    fn attribute_value(&mut self) -> Result<String, SelectorError> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let start = self.pos;
                while self.peek().is_some_and(|c| c != quote) {
                    self.pos += 1;
                }
                let value: String = self.chars[start..self.pos].iter().collect();
                self.expect(quote)?;
                Ok(value)
            }
            _ => self.ident(),
        }
    }

    fn pseudo(&mut self) -> Result<Pseudo, SelectorError> {
        let name = self.ident()?.to_ascii_lowercase();
        let pseudo = match name.as_str() {
            "first-child" => Pseudo::NthChild(Nth::FIRST),
            "last-child" => Pseudo::NthLastChild(Nth::FIRST),
            "first-of-type" => Pseudo::NthOfType(Nth::FIRST),
            "last-of-type" => Pseudo::NthLastOfType(Nth::FIRST),
            "nth-child" => Pseudo::NthChild(Nth::parse(&self.argument()?)?),
            "nth-last-child" => Pseudo::NthLastChild(Nth::parse(&self.argument()?)?),
            "nth-of-type" => Pseudo::NthOfType(Nth::parse(&self.argument()?)?),
            "nth-last-of-type" => Pseudo::NthLastOfType(Nth::parse(&self.argument()?)?),
            "not" => {
                self.expect('(')?;
                self.skip_whitespace();
                let inner = self.compound()?;
                self.skip_whitespace();
                self.expect(')')?;
                Pseudo::Not(Box::new(inner))
            }
            _ => return Err(SelectorError::UnsupportedPseudo(name)),
        };
        Ok(pseudo)
    }

    /// Raw text between parentheses.
    fn argument(&mut self) -> Result<String, SelectorError> {
        self.expect('(')?;
        let start = self.pos;
        while self.peek().is_some_and(|c| c != ')') {
            self.pos += 1;
        }
        let arg: String = self.chars[start..self.pos].iter().collect();
        self.expect(')')?;
        Ok(arg)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '-' || !c.is_ascii()
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || !c.is_ascii()
}
